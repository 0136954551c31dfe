//! Code generation for plain mode.
//!
//! Persistence is decoupled from the setters: every setter publishes the new
//! value on its property's channel, and a non-public `subscribe` step wires
//! each channel to a store write. Teardown drains the subscription bag so no
//! notification fires after the instance starts dropping.

use crate::keys;
use crate::scan::PropertySpec;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

/// Emits the full plain-mode member set for the scanned struct.
pub(crate) fn emit(item: &ItemStruct, properties: &[PropertySpec]) -> TokenStream {
    let rt = prefs_macro_utils::runtime_path();
    let ident = &item.ident;
    let vis = &item.vis;
    let attrs = &item.attrs;
    let key_enum_ident = keys::key_enum_ident(ident);

    let data_fields = properties.iter().map(|property| {
        let name = &property.ident;
        let ty = &property.ty;
        let attrs = &property.attrs;
        quote!(#(#attrs)* #name: #ty)
    });

    let channel_fields = properties.iter().map(|property| {
        let channel = channel_ident(property);
        let ty = &property.ty;
        quote!(#channel: #rt::channel::Publisher<#ty>)
    });

    let seeds = properties.iter().map(|property| {
        let name = &property.ident;
        let ty = &property.ty;
        let variant = &property.variant;
        let default = &property.default;
        quote! {
            let #name: #ty = #rt::store::read_or(
                store.as_ref(),
                #key_enum_ident::#variant.as_str(),
                || #default,
            );
        }
    });

    let field_inits = properties.iter().map(|property| {
        let name = &property.ident;
        let channel = channel_ident(property);
        quote! {
            #name,
            #channel: #rt::channel::Publisher::new(),
        }
    });

    let accessors = properties.iter().map(|property| {
        let name = &property.ident;
        let ty = &property.ty;
        let channel = channel_ident(property);
        let setter = format_ident!("set_{}", name);
        let getter_doc = format!("Returns the current `{name}` value.");
        let setter_doc = format!(
            "Sets `{name}` and publishes the new value on its change channel."
        );
        let channel_doc = format!("The change-broadcast channel for `{name}`.");
        quote! {
            #[doc = #getter_doc]
            #vis fn #name(&self) -> &#ty {
                &self.#name
            }

            #[doc = #setter_doc]
            #vis fn #setter(&mut self, value: #ty) {
                self.#name = value;
                self.#channel.publish(&self.#name);
            }

            #[doc = #channel_doc]
            #vis fn #channel(&self) -> &#rt::channel::Publisher<#ty> {
                &self.#channel
            }
        }
    });

    let subscriptions = properties.iter().map(|property| {
        let channel = channel_ident(property);
        let ty = &property.ty;
        let variant = &property.variant;
        quote! {
            let store = ::std::sync::Arc::clone(&self.store);
            self.subscriptions.insert(self.#channel.subscribe(move |value: &#ty| {
                #rt::store::persist(store.as_ref(), #key_enum_ident::#variant.as_str(), value);
            }));
        }
    });

    let key_enum = keys::key_enum(vis, ident, properties);
    let reset = keys::reset_method(vis, properties);

    let new_doc = format!(
        "Creates a `{ident}` backed by `store`, seeding each setting from \
         the store with fallback to its declared default, then wiring change \
         subscriptions."
    );

    quote! {
        #(#attrs)*
        #vis struct #ident {
            #(#data_fields,)*
            #(#channel_fields,)*
            subscriptions: #rt::channel::SubscriptionBag,
            store: ::std::sync::Arc<dyn #rt::store::Store>,
        }

        #key_enum

        impl #ident {
            #[doc = #new_doc]
            #vis fn new(store: ::std::sync::Arc<dyn #rt::store::Store>) -> Self {
                #(#seeds)*
                let mut settings = Self {
                    #(#field_inits)*
                    subscriptions: #rt::channel::SubscriptionBag::new(),
                    store,
                };
                settings.subscribe();
                settings
            }

            #(#accessors)*

            #reset

            fn subscribe(&mut self) {
                #(#subscriptions)*
            }
        }

        impl ::core::ops::Drop for #ident {
            fn drop(&mut self) {
                self.subscriptions.cancel_all();
            }
        }
    }
}

fn channel_ident(property: &PropertySpec) -> syn::Ident {
    format_ident!("{}_channel", property.ident)
}
