mod common;

use brutal_notes_core::{
    HapticKind, HostBridge, HostEnvironment, NoteStore, NotesConfig, StorageAdapter, WebApp,
};
use common::{CloudBehavior, FakeHost, RecordingHaptics, ScriptedCloudStorage};
use std::sync::Arc;

fn host_with(behavior: CloudBehavior) -> (Arc<FakeHost>, Arc<RecordingHaptics>) {
    let haptics = Arc::new(RecordingHaptics::default());
    let host = Arc::new(FakeHost {
        storage: Some(Arc::new(ScriptedCloudStorage::new(behavior))),
        haptics: Some(haptics.clone()),
        ..FakeHost::default()
    });
    (host, haptics)
}

fn bridge_for(host: Arc<FakeHost>) -> HostBridge {
    let webapp: Arc<dyn WebApp> = host;
    HostBridge::initialize(Some(webapp), &NotesConfig::default())
}

#[tokio::test]
async fn genuine_host_gets_chrome_setup_in_order() {
    let (host, _) = host_with(CloudBehavior::Healthy);
    let bridge = bridge_for(host.clone());

    assert_eq!(bridge.environment(), HostEnvironment::Host);
    assert!(bridge.is_ready());
    assert!(bridge.error().is_none());
    assert_eq!(
        *host.calls.lock().unwrap(),
        vec![
            "expand".to_string(),
            "header:#161616".to_string(),
            "background:#161616".to_string(),
            "ready".to_string(),
        ]
    );
}

#[tokio::test]
async fn setup_failure_is_recorded_but_bridge_is_ready() {
    let host = Arc::new(FakeHost {
        fail_expand: true,
        storage: Some(Arc::new(ScriptedCloudStorage::new(CloudBehavior::Healthy))),
        ..FakeHost::default()
    });
    let bridge = bridge_for(host);

    assert!(bridge.is_ready());
    assert_eq!(bridge.error(), Some("viewport locked"));
    assert!(!bridge.has_storage());
    assert_eq!(bridge.get("brutal_notes").await, None);
}

#[tokio::test]
async fn healthy_host_storage_round_trips() {
    let (host, _) = host_with(CloudBehavior::Healthy);
    let bridge = bridge_for(host);

    assert_eq!(bridge.get("brutal_notes").await, None);
    assert!(bridge.set("brutal_notes", "[]").await);
    assert_eq!(bridge.get("brutal_notes").await.as_deref(), Some("[]"));
    assert!(bridge.remove("brutal_notes").await);
    assert_eq!(bridge.list_keys().await, vec!["brutal_notes".to_string()]);
}

#[tokio::test]
async fn callback_errors_resolve_to_empty_results() {
    let (host, _) = host_with(CloudBehavior::Failing);
    let bridge = bridge_for(host);

    assert_eq!(bridge.get("k").await, None);
    assert!(!bridge.set("k", "v").await);
    assert!(!bridge.remove("k").await);
    assert!(bridge.list_keys().await.is_empty());
}

#[tokio::test]
async fn dropped_callbacks_resolve_to_empty_results() {
    let (host, _) = host_with(CloudBehavior::Silent);
    let bridge = bridge_for(host);

    assert_eq!(bridge.get("k").await, None);
    assert!(!bridge.set("k", "v").await);
    assert!(bridge.list_keys().await.is_empty());
}

#[tokio::test]
async fn host_without_capabilities_degrades_quietly() {
    let bridge = bridge_for(Arc::new(FakeHost::default()));

    assert!(bridge.is_ready());
    assert!(bridge.error().is_none());
    assert!(!bridge.has_storage());
    assert_eq!(bridge.get("k").await, None);
    assert!(!bridge.set("k", "v").await);
    assert!(!bridge.remove("k").await);
    assert!(bridge.list_keys().await.is_empty());
    bridge.trigger_haptic(HapticKind::Heavy);
}

#[tokio::test]
async fn haptic_kinds_map_to_impact_or_notification() {
    let (host, haptics) = host_with(CloudBehavior::Healthy);
    let bridge = bridge_for(host);

    for kind in [
        HapticKind::Light,
        HapticKind::Medium,
        HapticKind::Heavy,
        HapticKind::Success,
        HapticKind::Warning,
        HapticKind::Error,
    ] {
        bridge.trigger_haptic(kind);
    }

    assert_eq!(
        *haptics.cues.lock().unwrap(),
        vec![
            "impact:light",
            "impact:medium",
            "impact:heavy",
            "notification:success",
            "notification:warning",
            "notification:error",
        ]
    );
}

#[tokio::test]
async fn store_over_failing_host_keeps_notes_in_memory() {
    let (host, haptics) = host_with(CloudBehavior::Failing);
    let mut store = NoteStore::new(bridge_for(host), &NotesConfig::default());

    store.add("offline", "still here").await;

    assert_eq!(store.notes().len(), 1);
    assert!(!store.save().await);
    assert_eq!(
        *haptics.cues.lock().unwrap(),
        vec!["notification:success".to_string()]
    );
}
