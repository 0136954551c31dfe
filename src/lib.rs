//! Persistence-backed, observable settings types generated at compile time.
//!

/// Runtime collaborators and the `#[settings]` attribute macro.
pub use prefs_runtime;

pub use prefs_runtime::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use prefs_runtime::prelude::*;
}
