//! Shared synthesizers: key enumeration and reset method.
//!
//! Both emitters append these members unchanged; only the accessor and
//! initialization strategy differs between modes.

use crate::scan::PropertySpec;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Visibility};

/// Returns the key-enumeration ident for the annotated struct, e.g.
/// `AppSettingsKey` for `AppSettings`.
pub(crate) fn key_enum_ident(struct_ident: &Ident) -> Ident {
    format_ident!("{}Key", struct_ident)
}

/// Synthesizes the key enumeration for the property list.
///
/// One variant per property, declaration order, with `as_str` returning the
/// raw field name (the persistence-store key) and `ALL` listing every
/// variant in the same order. Total: an empty property list yields an empty
/// enumeration.
pub(crate) fn key_enum(
    vis: &Visibility,
    struct_ident: &Ident,
    properties: &[PropertySpec],
) -> TokenStream {
    let enum_ident = key_enum_ident(struct_ident);
    let enum_doc = format!("Persistence-store keys for [`{struct_ident}`].");
    let count = properties.len();

    let variants = properties.iter().map(|property| {
        let variant = &property.variant;
        let doc = format!("Key for the `{}` setting.", property.ident);
        quote! {
            #[doc = #doc]
            #variant
        }
    });

    let all_variants = properties.iter().map(|property| {
        let variant = &property.variant;
        quote!(Self::#variant)
    });

    let as_str_arms = properties.iter().map(|property| {
        let variant = &property.variant;
        let name = property.ident.to_string();
        quote!(Self::#variant => #name)
    });

    quote! {
        #[doc = #enum_doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #vis enum #enum_ident {
            #(#variants,)*
        }

        impl #enum_ident {
            /// Every key, in declaration order.
            #vis const ALL: [Self; #count] = [#(#all_variants),*];

            /// The raw store key: exactly the field name.
            #vis fn as_str(&self) -> &'static str {
                match *self {
                    #(#as_str_arms,)*
                }
            }
        }
    }
}

/// Synthesizes the reset method.
///
/// Each property is assigned back to its captured default through the
/// generated setter, in declaration order, so the mode's publish or persist
/// semantics apply to reset exactly as to any other mutation.
pub(crate) fn reset_method(vis: &Visibility, properties: &[PropertySpec]) -> TokenStream {
    let assignments = properties.iter().map(|property| {
        let setter = format_ident!("set_{}", property.ident);
        let default = &property.default;
        quote!(self.#setter(#default);)
    });

    quote! {
        /// Restores every setting to its captured default value.
        #vis fn reset(&mut self) {
            #(#assignments)*
        }
    }
}
