//! Procedural macros generating persistence-backed, observable settings
//! types.
//!
//! This crate provides the `#[settings]` attribute macro. Most users depend
//! on `prefs_runtime` (or the `prefs` umbrella crate), which re-exports it
//! next to the runtime types the generated code plugs into.

mod error;
mod keys;
mod observed;
mod plain;
mod scan;
mod transform;

use darling::FromMeta;
use darling::ast::NestedMeta;
use darling::util::Flag;
use proc_macro::TokenStream;
use syn::{ItemStruct, parse_macro_input};

use crate::scan::Mode;

/// Parsed arguments for the macro.
#[derive(FromMeta)]
struct SettingsArgs {
    /// Generate registrar-based observation instead of change channels.
    #[darling(default)]
    observed: Flag,
}

impl SettingsArgs {
    fn mode(&self) -> Mode {
        if self.observed.is_present() {
            Mode::Observed
        } else {
            Mode::Plain
        }
    }
}

/// Turns a struct of `#[setting(default = ...)]` fields into a
/// persistence-backed, observable settings type.
///
/// For every field the macro captures the declared type and default
/// expression, then synthesizes a key enumeration (`{Name}Key`, one variant
/// per field, raw string value equal to the field name), a constructor
/// seeding each setting from the store with fallback to its default, typed
/// accessors, and a `reset` method restoring every default in declaration
/// order.
///
/// # Plain mode
///
/// ```ignore
/// use prefs_runtime::settings;
///
/// #[settings]
/// pub struct AppSettings {
///     #[setting(default = "system")]
///     theme: String,
///     #[setting(default = 14)]
///     font_size: i64,
/// }
/// ```
///
/// Setters publish on a per-property change channel; an internal `subscribe`
/// step wires each channel to a store write, and dropping the instance
/// cancels every subscription.
///
/// # Observed mode
///
/// ```ignore
/// #[settings(observed)]
/// pub struct AppSettings {
///     #[setting(default = "system")]
///     theme: String,
/// }
/// ```
///
/// Each field becomes a shadow storage field (`_theme`) behind a
/// get/set/in-place accessor triple routed through an observation registrar;
/// the setter writes through to the store inside the mutation window.
///
/// # Errors
///
/// Validation failures are compile errors attributed to the offending field:
/// a field without `#[setting(default = ...)]`, a field whose type is not a
/// simple type identifier, or two fields sharing a name. Generation is
/// all-or-nothing; no partial expansion is emitted.
#[proc_macro_attribute]
pub fn settings(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = match NestedMeta::parse_meta_list(args.into()) {
        Ok(list) => match SettingsArgs::from_list(&list) {
            Ok(args) => args,
            Err(err) => return err.write_errors().into(),
        },
        Err(err) => return darling::Error::from(err).write_errors().into(),
    };

    let item = parse_macro_input!(item as ItemStruct);

    match transform::transform(&item, args.mode()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_syn().to_compile_error().into(),
    }
}
