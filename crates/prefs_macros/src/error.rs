//! Validation errors raised by the transformation engine.
//!
//! All variants are fatal to the whole transformation: no partial output is
//! emitted, and each converts into a [`syn::Error`] attributed to the
//! offending field so the compiler diagnostic points at the right source
//! location.

use proc_macro2::Span;

/// A validation failure encountered while transforming a declaration.
#[derive(Debug)]
pub(crate) enum TransformError {
    /// A member could not be parsed as `name [: Type] = defaultExpr`:
    /// unnamed field, tuple or unit struct, or a field without
    /// `#[setting(default = ...)]`.
    UnknownVariable { span: Span },

    /// The property's type is not a simple type identifier, so the typed
    /// store round-trip cannot be generated for it.
    TypeAnnotationMissing { name: String, span: Span },

    /// Two properties share a name; the key enumeration would no longer be
    /// a bijection with the property set.
    DuplicateProperty { name: String, span: Span },

    /// The declaration uses a construct the engine does not support, such
    /// as generic parameters.
    Unsupported { message: String, span: Span },
}

impl TransformError {
    /// Converts the error into a compiler diagnostic.
    pub(crate) fn into_syn(self) -> syn::Error {
        match self {
            Self::UnknownVariable { span } => syn::Error::new(
                span,
                "unable to parse variable declaration: \
                 settings fields must be named and carry `#[setting(default = ...)]`",
            ),
            Self::TypeAnnotationMissing { name, span } => syn::Error::new(
                span,
                format!("a simple type annotation is required; please provide one for `{name}`"),
            ),
            Self::DuplicateProperty { name, span } => syn::Error::new(
                span,
                format!("duplicate setting name `{name}`: storage keys must be unique"),
            ),
            Self::Unsupported { message, span } => syn::Error::new(span, message),
        }
    }
}
