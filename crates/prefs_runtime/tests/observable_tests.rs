//! Integration tests for the `#[settings(observed)]` attribute macro.
use std::sync::Arc;

use parking_lot::Mutex;
use prefs_runtime::observe::{ObservationEvent, ObserverId};
use prefs_runtime::settings;
use prefs_runtime::store::{MemoryStore, Store};
use serde_json::json;

#[settings(observed)]
struct PlayerSettings {
    #[setting(default = 0.5)]
    volume: f64,
    #[setting(default = false)]
    muted: bool,
}

type EventLog = Arc<Mutex<Vec<(String, ObservationEvent)>>>;

fn observed_player() -> (Arc<MemoryStore>, PlayerSettings, EventLog, ObserverId) {
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn Store> = memory.clone();
    let player = PlayerSettings::new(store);

    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let id = player
        .registrar()
        .observe(move |key, event| sink.lock().push((key.to_string(), event)));

    (memory, player, log, id)
}

#[test]
fn construction_emits_no_events() {
    let (_, _player, log, _) = observed_player();
    assert!(log.lock().is_empty());
}

#[test]
fn getter_records_an_access() {
    let (_, player, log, _) = observed_player();

    let volume = *player.volume();

    assert_eq!(volume, 0.5);
    assert_eq!(
        *log.lock(),
        vec![("volume".to_string(), ObservationEvent::Access)]
    );
}

#[test]
fn setter_brackets_the_write_and_persists() {
    let (memory, mut player, log, _) = observed_player();

    player.set_volume(0.8);

    assert_eq!(
        *log.lock(),
        vec![
            ("volume".to_string(), ObservationEvent::WillSet),
            ("volume".to_string(), ObservationEvent::DidSet),
        ]
    );
    assert_eq!(
        memory.get(PlayerSettingsKey::Volume.as_str()),
        Some(json!(0.8))
    );
}

#[test]
fn mutation_guard_persists_when_dropped() {
    let (memory, mut player, log, _) = observed_player();

    {
        let mut volume = player.volume_mut();
        *volume = 0.25;
        // Nothing is persisted while the window is open.
        assert!(memory.get(PlayerSettingsKey::Volume.as_str()).is_none());
    }

    assert_eq!(
        memory.get(PlayerSettingsKey::Volume.as_str()),
        Some(json!(0.25))
    );
    assert_eq!(
        *log.lock(),
        vec![
            ("volume".to_string(), ObservationEvent::Access),
            ("volume".to_string(), ObservationEvent::WillSet),
            ("volume".to_string(), ObservationEvent::DidSet),
        ]
    );
}

#[test]
fn removed_observer_receives_nothing() {
    let (_, mut player, log, id) = observed_player();

    assert!(player.registrar().remove(id));
    player.set_muted(true);

    assert!(log.lock().is_empty());
}

#[test]
fn stored_values_survive_reconstruction() {
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn Store> = memory.clone();

    {
        let mut player = PlayerSettings::new(Arc::clone(&store));
        player.set_volume(0.9);
        player.set_muted(true);
    }

    let player = PlayerSettings::new(store);
    assert_eq!(*player.volume(), 0.9);
    assert!(*player.muted());
}

#[test]
fn reset_emits_one_pair_per_property_in_order() {
    let (memory, mut player, log, _) = observed_player();

    player.reset();

    assert_eq!(
        *log.lock(),
        vec![
            ("volume".to_string(), ObservationEvent::WillSet),
            ("volume".to_string(), ObservationEvent::DidSet),
            ("muted".to_string(), ObservationEvent::WillSet),
            ("muted".to_string(), ObservationEvent::DidSet),
        ]
    );
    assert_eq!(
        memory.get(PlayerSettingsKey::Volume.as_str()),
        Some(json!(0.5))
    );
    assert_eq!(
        memory.get(PlayerSettingsKey::Muted.as_str()),
        Some(json!(false))
    );
}

#[test]
fn with_mutation_helper_forwards_to_the_registrar() {
    let (_, player, log, _) = observed_player();

    let result = player.with_mutation(PlayerSettingsKey::Muted, || 7);

    assert_eq!(result, 7);
    assert_eq!(
        *log.lock(),
        vec![
            ("muted".to_string(), ObservationEvent::WillSet),
            ("muted".to_string(), ObservationEvent::DidSet),
        ]
    );
}

#[test]
fn observer_may_reenter_during_notification() {
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn Store> = memory.clone();
    let player = Arc::new(Mutex::new(PlayerSettings::new(store)));

    let reads: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reads);
    let reentrant = Arc::clone(&player);
    player.lock().registrar().observe(move |key, event| {
        if key == "muted" && event == ObservationEvent::DidSet {
            // Re-entering the registrar from a callback must not deadlock.
            if let Some(settings) = reentrant.try_lock() {
                sink.lock().push(*settings.volume());
            }
        }
    });

    player.lock().set_muted(true);
    // The instance lock is held by the mutating caller, so the re-entrant
    // read is skipped, but the notification itself must complete.
    assert!(reads.lock().is_empty());
    assert_eq!(memory.get(PlayerSettingsKey::Muted.as_str()), Some(json!(true)));
}
