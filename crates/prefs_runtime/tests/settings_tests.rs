//! Integration tests for the `#[settings]` attribute macro in plain mode.
use std::sync::Arc;

use parking_lot::Mutex;
use prefs_runtime::settings;
use prefs_runtime::store::{MemoryStore, Store};
use serde_json::json;

#[settings]
struct EditorSettings {
    #[setting(default = "monospace")]
    font_family: String,
    #[setting(default = 12)]
    font_size: i64,
    #[setting(default = true)]
    word_wrap: bool,
}

// No properties is legal: the key enumeration is empty and reset is a no-op.
#[settings]
struct Bare {}

fn memory_store() -> (Arc<MemoryStore>, Arc<dyn Store>) {
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn Store> = memory.clone();
    (memory, store)
}

#[test]
fn defaults_apply_on_empty_store() {
    let (memory, store) = memory_store();
    let settings = EditorSettings::new(store);

    assert_eq!(settings.font_family(), "monospace");
    assert_eq!(*settings.font_size(), 12);
    assert!(*settings.word_wrap());

    // Seeding only reads; nothing is written until a setter runs.
    assert!(memory.is_empty());
}

#[test]
fn key_enumeration_matches_declaration_order() {
    assert_eq!(
        EditorSettingsKey::ALL,
        [
            EditorSettingsKey::FontFamily,
            EditorSettingsKey::FontSize,
            EditorSettingsKey::WordWrap,
        ]
    );
    assert_eq!(EditorSettingsKey::FontFamily.as_str(), "font_family");
    assert_eq!(EditorSettingsKey::FontSize.as_str(), "font_size");
    assert_eq!(EditorSettingsKey::WordWrap.as_str(), "word_wrap");
}

#[test]
fn setter_updates_value_and_store() {
    let (memory, store) = memory_store();
    let mut settings = EditorSettings::new(store);

    settings.set_font_size(16);

    assert_eq!(*settings.font_size(), 16);
    assert_eq!(
        memory.get(EditorSettingsKey::FontSize.as_str()),
        Some(json!(16))
    );
}

#[test]
fn stored_values_survive_reconstruction() {
    let (_, store) = memory_store();

    {
        let mut settings = EditorSettings::new(Arc::clone(&store));
        settings.set_font_family("serif".to_string());
        settings.set_word_wrap(false);
    }

    let settings = EditorSettings::new(store);
    assert_eq!(settings.font_family(), "serif");
    assert_eq!(*settings.font_size(), 12);
    assert!(!*settings.word_wrap());
}

#[test]
fn mismatched_store_shape_falls_back_to_default() {
    let (memory, store) = memory_store();
    memory.set(EditorSettingsKey::FontSize.as_str(), json!("sixteen"));

    let settings = EditorSettings::new(store);
    assert_eq!(*settings.font_size(), 12);
}

#[test]
fn reset_restores_defaults_and_persists_them() {
    let (memory, store) = memory_store();
    let mut settings = EditorSettings::new(store);

    settings.set_font_family("serif".to_string());
    settings.set_font_size(16);
    settings.set_word_wrap(false);
    settings.reset();

    assert_eq!(settings.font_family(), "monospace");
    assert_eq!(*settings.font_size(), 12);
    assert!(*settings.word_wrap());
    assert_eq!(
        memory.get(EditorSettingsKey::FontSize.as_str()),
        Some(json!(12))
    );
    assert_eq!(
        memory.get(EditorSettingsKey::FontFamily.as_str()),
        Some(json!("monospace"))
    );
}

#[test]
fn reset_is_idempotent() {
    let (memory, store) = memory_store();
    let mut settings = EditorSettings::new(store);

    settings.set_font_size(16);
    settings.reset();
    let after_first = memory.get(EditorSettingsKey::FontSize.as_str());
    settings.reset();

    assert_eq!(*settings.font_size(), 12);
    assert_eq!(memory.get(EditorSettingsKey::FontSize.as_str()), after_first);
}

#[test]
fn external_subscriber_sees_every_change() {
    let (_, store) = memory_store();
    let mut settings = EditorSettings::new(store);

    let seen: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = settings
        .font_size_channel()
        .subscribe(move |value: &i64| sink.lock().push(*value));

    settings.set_font_size(14);
    settings.set_font_size(18);

    assert_eq!(*seen.lock(), vec![14, 18]);
    subscription.cancel();
}

#[test]
fn cancelled_subscriber_sees_nothing_further() {
    let (_, store) = memory_store();
    let mut settings = EditorSettings::new(store);

    let seen: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = settings
        .font_size_channel()
        .subscribe(move |value: &i64| sink.lock().push(*value));

    settings.set_font_size(14);
    subscription.cancel();
    settings.set_font_size(18);

    assert_eq!(*seen.lock(), vec![14]);
}

#[test]
fn empty_struct_generates_empty_key_enumeration() {
    let (memory, store) = memory_store();
    let mut bare = Bare::new(store);

    assert!(BareKey::ALL.is_empty());
    bare.reset();
    assert!(memory.is_empty());
}
