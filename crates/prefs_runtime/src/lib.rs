//! Runtime collaborators for generated settings types.
//!
//! This crate provides everything the code generated by [`settings`] plugs
//! into:
//!
//! - [`store`] — Key-value persistence ([`Store`](store::Store),
//!   [`MemoryStore`](store::MemoryStore), typed read/write helpers).
//! - [`observe`] — Observation registrar and mutation guard for observed
//!   mode.
//! - [`channel`] — Per-property change-broadcast channels and the
//!   subscription bag for plain mode.
//!
//! # Attribute Macro
//!
//! The [`settings`] attribute macro turns a plain struct whose fields carry
//! `#[setting(default = ...)]` into a persistence-backed, observable
//! settings type:
//!
//! ```
//! use std::sync::Arc;
//! use prefs_runtime::settings;
//! use prefs_runtime::store::{MemoryStore, Store};
//!
//! #[settings]
//! pub struct AppSettings {
//!     #[setting(default = "system")]
//!     theme: String,
//!     #[setting(default = 14)]
//!     font_size: i64,
//! }
//!
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//! let mut settings = AppSettings::new(Arc::clone(&store));
//! assert_eq!(settings.theme(), "system");
//!
//! // Setters publish on the property's channel; the generated subscription
//! // forwards every published value into the store.
//! settings.set_font_size(16);
//! assert_eq!(store.get(AppSettingsKey::FontSize.as_str()), Some(serde_json::json!(16)));
//!
//! // Reset restores every captured default, in declaration order.
//! settings.reset();
//! assert_eq!(*settings.font_size(), 14);
//! ```
//!
//! Observed mode (`#[settings(observed)]`) generates accessor triples that
//! route through an [`ObservationRegistrar`](observe::ObservationRegistrar)
//! instead of channels; see the macro documentation for details.

pub mod channel;
pub mod observe;
pub mod store;

// Re-export the attribute macro.
pub use prefs_macros::settings;

/// Re-export of common types for easy access.
pub mod prelude {
    pub use crate::channel::{Publisher, Subscription, SubscriptionBag};
    pub use crate::observe::{MutationGuard, ObservationEvent, ObservationRegistrar, ObserverId};
    pub use crate::settings;
    pub use crate::store::{MemoryStore, Store, StoreError};
}
