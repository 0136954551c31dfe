//! Member scanning and validation.
//!
//! Walks the annotated struct's field list in declaration order and extracts
//! one [`PropertySpec`] per stored property. Scanning is the shared front of
//! both emitters; everything mode-specific happens afterwards.

use crate::error::TransformError;
use proc_macro2::Span;
use quote::format_ident;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, ExprLit, Field, Fields, Ident, ItemStruct, Lit, PathArguments, Type};

/// Which generation variant the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Channel-based persistence with a subscription bag.
    Plain,
    /// Registrar-based observation with write-through persistence.
    Observed,
}

/// One stored property scanned from the input declaration.
#[derive(Debug)]
pub(crate) struct PropertySpec {
    /// Field identifier, e.g. `font_size`.
    pub ident: Ident,
    /// Key-enumeration variant ident, e.g. `FontSize`.
    pub variant: Ident,
    /// Declared field type. Guaranteed simple in plain mode; observed mode
    /// re-validates during accessor synthesis.
    pub ty: Type,
    /// Captured default expression, normalized (see [`normalize_default`]).
    pub default: Expr,
    /// Field attributes other than `#[setting]`, preserved on the emitted
    /// field.
    pub attrs: Vec<Attribute>,
    /// Span used for diagnostics attributed to this property.
    pub span: Span,
}

/// Scans the struct's members into an ordered property list.
///
/// Plain mode validates type annotations here; observed mode defers that
/// check to accessor synthesis. Duplicate names are rejected in both modes.
pub(crate) fn scan(item: &ItemStruct, mode: Mode) -> Result<Vec<PropertySpec>, TransformError> {
    if let Some(param) = item.generics.params.first() {
        return Err(TransformError::Unsupported {
            message: "#[settings] does not support generic parameters".to_string(),
            span: param.span(),
        });
    }

    let fields = match &item.fields {
        Fields::Named(named) => &named.named,
        Fields::Unnamed(_) | Fields::Unit => {
            return Err(TransformError::UnknownVariable {
                span: item.ident.span(),
            });
        }
    };

    let mut properties: Vec<PropertySpec> = Vec::with_capacity(fields.len());
    for field in fields {
        let spec = scan_field(field, mode)?;
        if properties.iter().any(|p| p.ident == spec.ident) {
            return Err(TransformError::DuplicateProperty {
                name: spec.ident.to_string(),
                span: spec.span,
            });
        }
        properties.push(spec);
    }

    Ok(properties)
}

fn scan_field(field: &Field, mode: Mode) -> Result<PropertySpec, TransformError> {
    let span = field.span();
    let ident = field
        .ident
        .clone()
        .ok_or(TransformError::UnknownVariable { span })?;

    let default = setting_default(field)?.ok_or(TransformError::UnknownVariable { span })?;

    if mode == Mode::Plain && simple_type_ident(&field.ty).is_none() {
        return Err(TransformError::TypeAnnotationMissing {
            name: ident.to_string(),
            span: field.ty.span(),
        });
    }

    let variant = format_ident!("{}", to_pascal_case(&ident.to_string()), span = ident.span());
    let default = normalize_default(default);
    let attrs = field
        .attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("setting"))
        .cloned()
        .collect();

    Ok(PropertySpec {
        ident,
        variant,
        ty: field.ty.clone(),
        default,
        attrs,
        span,
    })
}

/// Extracts the expression from `#[setting(default = ...)]`, if present.
fn setting_default(field: &Field) -> Result<Option<Expr>, TransformError> {
    let span = field.span();
    for attr in &field.attrs {
        if !attr.path().is_ident("setting") {
            continue;
        }

        let mut default = None;
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                default = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported `setting` option; expected `default = ...`"))
            }
        });
        if parsed.is_err() {
            return Err(TransformError::UnknownVariable { span });
        }
        return Ok(default);
    }
    Ok(None)
}

/// Returns the type's identifier when it is a *simple type identifier*:
/// a single path segment without generic arguments.
pub(crate) fn simple_type_ident(ty: &Type) -> Option<&Ident> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() || type_path.path.segments.len() != 1 {
        return None;
    }
    let segment = type_path.path.segments.first()?;
    match segment.arguments {
        PathArguments::None => Some(&segment.ident),
        _ => None,
    }
}

/// Normalizes a captured default expression.
///
/// A bare string literal is rewritten to `"...".to_string()` so it satisfies
/// an owned `String` field; every other expression is captured verbatim and
/// must already evaluate to the field type.
fn normalize_default(default: Expr) -> Expr {
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(lit), ..
    }) = &default
    {
        return syn::parse_quote!(#lit.to_string());
    }
    default
}

/// Converts `snake_case` to `PascalCase` for key-enumeration variants.
pub(crate) fn to_pascal_case(input: &str) -> String {
    input
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}
