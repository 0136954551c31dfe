//! Shared utilities for prefs procedural macro crates.
//!
//! Provides crate-path resolution so that generated code emits correct
//! fully-qualified paths regardless of whether the consumer depends on
//! `prefs_runtime` directly or on the `prefs` umbrella re-export.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Returns a [`TokenStream`] path to the `prefs_runtime` crate.
///
/// Resolution order:
/// 1. Direct dependency (possibly renamed in `Cargo.toml`).
/// 2. Indirect access via the `prefs` umbrella crate (`prefs::prefs_runtime`).
/// 3. Fallback to the literal crate name (compile error will point the user
///    to the missing dependency).
pub fn runtime_path() -> TokenStream {
    const NAME: &str = "prefs_runtime";

    match crate_name(NAME) {
        Ok(FoundCrate::Itself) => {
            let ident = format_ident!("{}", NAME);
            quote!(#ident)
        }
        Ok(FoundCrate::Name(found)) => {
            let ident = format_ident!("{}", found);
            quote!(#ident)
        }
        Err(_) => match crate_name("prefs") {
            Ok(FoundCrate::Name(found)) => {
                let prefs = format_ident!("{}", found);
                let ident = format_ident!("{}", NAME);
                quote!(#prefs::#ident)
            }
            _ => {
                let ident = format_ident!("{}", NAME);
                quote!(#ident)
            }
        },
    }
}
