//! The declaration transformation engine.
//!
//! [`transform`] is the single entry shared by both modes: scan and validate
//! the member list, then hand the ordered property list to the requested
//! emitter. It is a pure function of its input — no state survives a call,
//! and the same declaration always expands to the same token stream.

use crate::error::TransformError;
use crate::scan::{Mode, scan};
use crate::{observed, plain};
use proc_macro2::TokenStream;
use syn::ItemStruct;

/// Transforms the annotated struct into its generated member set.
///
/// All-or-nothing: any validation failure aborts the whole transformation
/// with no partial output.
pub(crate) fn transform(item: &ItemStruct, mode: Mode) -> Result<TokenStream, TransformError> {
    let properties = scan(item, mode)?;
    match mode {
        Mode::Plain => Ok(plain::emit(item, &properties)),
        Mode::Observed => observed::emit(item, &properties),
    }
}
