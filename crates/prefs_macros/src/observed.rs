//! Code generation for observed mode.
//!
//! Every property gets a shadow storage field plus a get/set/in-place
//! accessor triple routed through the instance's observation registrar.
//! Persistence is synchronous: the setter writes through to the store inside
//! the mutation window, and the in-place guard persists when it closes. No
//! subscription bag or finalizer is needed; observation lifecycle is tied to
//! the registrar itself.

use crate::error::TransformError;
use crate::keys;
use crate::scan::{PropertySpec, simple_type_ident};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

/// Emits the full observed-mode member set for the scanned struct.
///
/// Type-annotation validation happens here, per property, as the accessor
/// triple is synthesized.
pub(crate) fn emit(
    item: &ItemStruct,
    properties: &[PropertySpec],
) -> Result<TokenStream, TransformError> {
    let rt = prefs_macro_utils::runtime_path();
    let ident = &item.ident;
    let vis = &item.vis;
    let attrs = &item.attrs;
    let key_enum_ident = keys::key_enum_ident(ident);

    let mut accessors = Vec::with_capacity(properties.len());
    for property in properties {
        accessors.push(accessor_triple(item, property)?);
    }

    let shadow_fields = properties.iter().map(|property| {
        let shadow = shadow_ident(property);
        let ty = &property.ty;
        let attrs = &property.attrs;
        quote!(#(#attrs)* #shadow: #ty)
    });

    let seeds = properties.iter().map(|property| {
        let shadow = shadow_ident(property);
        let ty = &property.ty;
        let variant = &property.variant;
        let default = &property.default;
        quote! {
            let #shadow: #ty = #rt::store::read_or(
                store.as_ref(),
                #key_enum_ident::#variant.as_str(),
                || #default,
            );
        }
    });

    let shadow_names = properties.iter().map(shadow_ident);

    let key_enum = keys::key_enum(vis, ident, properties);
    let reset = keys::reset_method(vis, properties);

    let new_doc = format!(
        "Creates a `{ident}` backed by `store`, seeding each shadow field \
         from the store with fallback to its declared default. No \
         observation event fires during construction."
    );

    Ok(quote! {
        #(#attrs)*
        #vis struct #ident {
            #(#shadow_fields,)*
            registrar: #rt::observe::ObservationRegistrar,
            store: ::std::sync::Arc<dyn #rt::store::Store>,
        }

        #key_enum

        impl #ident {
            #[doc = #new_doc]
            #vis fn new(store: ::std::sync::Arc<dyn #rt::store::Store>) -> Self {
                #(#seeds)*
                Self {
                    #(#shadow_names,)*
                    registrar: #rt::observe::ObservationRegistrar::new(),
                    store,
                }
            }

            /// The observation registrar tracking reads and mutations of
            /// this instance.
            #vis fn registrar(&self) -> &#rt::observe::ObservationRegistrar {
                &self.registrar
            }

            #(#accessors)*

            #reset

            /// Records a read of `key` with the registrar.
            fn access(&self, key: #key_enum_ident) {
                self.registrar.access(key.as_str());
            }

            /// Runs `mutation` inside a single `WillSet`/`DidSet` pair for
            /// `key`, forwarding to the registrar.
            #vis fn with_mutation<R>(&self, key: #key_enum_ident, mutation: impl FnOnce() -> R) -> R {
                self.registrar.with_mutation(key.as_str(), mutation)
            }
        }
    })
}

/// Synthesizes the get/set/in-place accessor triple for one property.
fn accessor_triple(
    item: &ItemStruct,
    property: &PropertySpec,
) -> Result<TokenStream, TransformError> {
    if simple_type_ident(&property.ty).is_none() {
        return Err(TransformError::TypeAnnotationMissing {
            name: property.ident.to_string(),
            span: property.span,
        });
    }

    let rt = prefs_macro_utils::runtime_path();
    let vis = &item.vis;
    let key_enum_ident = keys::key_enum_ident(&item.ident);

    let name = &property.ident;
    let ty = &property.ty;
    let variant = &property.variant;
    let shadow = shadow_ident(property);
    let setter = format_ident!("set_{}", name);
    let in_place = format_ident!("{}_mut", name);

    let getter_doc = format!("Returns the current `{name}` value, recording the read.");
    let setter_doc = format!(
        "Sets `{name}` inside a mutation window, writing the new value \
         through to the store."
    );
    let in_place_doc = format!(
        "Opens an in-place mutation window over `{name}`; the value is \
         persisted and observers see exactly one notification pair when the \
         guard drops."
    );

    Ok(quote! {
        #[doc = #getter_doc]
        #vis fn #name(&self) -> &#ty {
            self.access(#key_enum_ident::#variant);
            &self.#shadow
        }

        #[doc = #setter_doc]
        #vis fn #setter(&mut self, value: #ty) {
            // Field-precise borrows: the mutation closure writes the shadow
            // field while the registrar is borrowed for the window.
            let slot = &mut self.#shadow;
            let store = &self.store;
            self.registrar.with_mutation(#key_enum_ident::#variant.as_str(), || {
                *slot = value;
                #rt::store::persist(store.as_ref(), #key_enum_ident::#variant.as_str(), &*slot);
            });
        }

        #[doc = #in_place_doc]
        #vis fn #in_place(&mut self) -> #rt::observe::MutationGuard<'_, #ty> {
            self.registrar.access(#key_enum_ident::#variant.as_str());
            #rt::observe::MutationGuard::with_store(
                &mut self.#shadow,
                &self.registrar,
                #key_enum_ident::#variant.as_str(),
                self.store.as_ref(),
            )
        }
    })
}

fn shadow_ident(property: &PropertySpec) -> syn::Ident {
    format_ident!("_{}", property.ident)
}

#[cfg(test)]
mod tests {
    use crate::error::TransformError;
    use crate::scan::{Mode, scan};
    use syn::{ItemStruct, parse_quote};

    fn expand(item: ItemStruct) -> Result<String, TransformError> {
        let properties = scan(&item, Mode::Observed).expect("scan should succeed");
        super::emit(&item, &properties).map(|tokens| tokens.to_string())
    }

    #[test]
    fn emits_shadow_field_and_access_before_read() {
        let tokens = expand(parse_quote! {
            pub struct Demo {
                #[setting(default = 42)]
                foo: i64,
            }
        })
        .expect("emit should succeed");

        assert!(tokens.contains("_foo : i64"));

        let getter_start = tokens.find("fn foo").expect("getter");
        let getter = &tokens[getter_start..];
        let access = getter.find("access").expect("getter records the read");
        let read = getter.find("& self . _foo").expect("getter returns shadow");
        assert!(access < read, "access must be recorded before the read");
    }

    #[test]
    fn setter_persists_inside_mutation_window() {
        let tokens = expand(parse_quote! {
            pub struct Demo {
                #[setting(default = 42)]
                foo: i64,
            }
        })
        .expect("emit should succeed");

        let setter_start = tokens.find("fn set_foo").expect("setter");
        let setter = &tokens[setter_start..];
        assert!(setter.contains("with_mutation"));
        assert!(setter.contains("persist"));
    }

    #[test]
    fn composite_type_fails_at_accessor_synthesis() {
        let err = expand(parse_quote! {
            pub struct Demo {
                #[setting(default = Vec::new())]
                foo: Vec<String>,
            }
        })
        .expect_err("emit should fail");

        match err {
            TransformError::TypeAnnotationMissing { name, .. } => assert_eq!(name, "foo"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_subscription_bag_or_drop_in_observed_mode() {
        let tokens = expand(parse_quote! {
            pub struct Demo {
                #[setting(default = 42)]
                foo: i64,
            }
        })
        .expect("emit should succeed");

        assert!(!tokens.contains("SubscriptionBag"));
        assert!(!tokens.contains("Drop"));
        assert!(tokens.contains("ObservationRegistrar"));
    }
}
