//! Example settings client.
//!
//! Walks through both generated flavors: a plain settings type whose setters
//! broadcast on per-property channels (with a subscription forwarding every
//! change into the store), and an observed type that routes accesses and
//! mutations through an observation registrar.
//!
//! # Usage
//!
//! ```bash
//! settings_demo
//! ```

use std::sync::Arc;

use prefs_runtime::channel::SubscriptionBag;
use prefs_runtime::settings;
use prefs_runtime::store::{MemoryStore, Store};
use tracing::info;

#[settings]
struct ExampleSettings {
    #[setting(default = "bar")]
    foo: String,
    #[setting(default = 42)]
    bar: i64,
}

#[settings(observed)]
struct PlayerSettings {
    #[setting(default = 0.5)]
    volume: f64,
    #[setting(default = false)]
    muted: bool,
}

fn print_settings(settings: &ExampleSettings, store: &dyn Store) {
    info!(foo = %settings.foo(), bar = settings.bar(), "current values");
    for key in ExampleSettingsKey::ALL {
        info!(key = key.as_str(), stored = ?store.get(key.as_str()));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let mut settings = ExampleSettings::new(Arc::clone(&store));

    info!("before setting ------");
    print_settings(&settings, store.as_ref());

    info!("after setting ------");
    settings.set_foo("baz".to_string());
    settings.set_bar(10);
    print_settings(&settings, store.as_ref());

    info!("reset ------");
    settings.reset();
    print_settings(&settings, store.as_ref());

    // External observers subscribe to the same channels the persistence
    // hook uses. Dropping the bag cancels them.
    let mut subscriptions = SubscriptionBag::new();
    subscriptions.insert(settings.foo_channel().subscribe(|foo: &String| {
        info!(%foo, "changed foo");
    }));
    subscriptions.insert(settings.bar_channel().subscribe(|bar: &i64| {
        info!(bar, "changed bar");
    }));

    settings.set_foo("update_foo".to_string());
    settings.set_bar(45);

    info!("observed ------");
    let mut player = PlayerSettings::new(Arc::clone(&store));
    let observer = player.registrar().observe(|key, event| {
        info!(key, ?event, "observation");
    });

    player.set_volume(0.8);
    *player.muted_mut() = true;
    info!(volume = player.volume(), muted = player.muted());

    player.registrar().remove(observer);
    player.reset();
}
