#![allow(dead_code)]

use async_trait::async_trait;
use brutal_notes_core::{
    CloudStorage, HapticFeedback, HapticKind, HostCallback, HostError, HostResult, ImpactStyle,
    NotificationType, StorageAdapter, WebApp,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Adapter whose `get` answers come from a script; `set` is recorded.
#[derive(Default)]
pub struct ScriptedAdapter {
    gets: Mutex<VecDeque<Option<String>>>,
    get_calls: Mutex<Vec<Instant>>,
    writes: Mutex<Vec<String>>,
    haptics: Mutex<Vec<HapticKind>>,
    reject_writes: bool,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_writes() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    pub fn with_gets(responses: Vec<Option<String>>) -> Self {
        Self {
            gets: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn get_calls(&self) -> Vec<Instant> {
        self.get_calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last_write(&self) -> Option<String> {
        self.writes.lock().unwrap().last().cloned()
    }

    pub fn haptics(&self) -> Vec<HapticKind> {
        self.haptics.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageAdapter for ScriptedAdapter {
    async fn get(&self, _key: &str) -> Option<String> {
        self.get_calls.lock().unwrap().push(Instant::now());
        self.gets.lock().unwrap().pop_front().flatten()
    }

    async fn set(&self, _key: &str, value: &str) -> bool {
        self.writes.lock().unwrap().push(value.to_string());
        !self.reject_writes
    }

    async fn remove(&self, _key: &str) -> bool {
        !self.reject_writes
    }

    async fn list_keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn trigger_haptic(&self, kind: HapticKind) {
        self.haptics.lock().unwrap().push(kind);
    }
}

/// How `ScriptedCloudStorage` answers every callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudBehavior {
    Healthy,
    Failing,
    /// Drops the callback without invoking it.
    Silent,
}

/// Callback-based storage that answers synchronously.
pub struct ScriptedCloudStorage {
    behavior: CloudBehavior,
    value: Mutex<Option<String>>,
}

impl ScriptedCloudStorage {
    pub fn new(behavior: CloudBehavior) -> Self {
        Self {
            behavior,
            value: Mutex::new(None),
        }
    }

    fn answer<T>(&self, callback: HostCallback<T>, value: T) {
        match self.behavior {
            CloudBehavior::Healthy => callback(None, value),
            CloudBehavior::Failing => callback(Some(HostError::new("storage offline")), value),
            CloudBehavior::Silent => drop(callback),
        }
    }
}

impl CloudStorage for ScriptedCloudStorage {
    fn get_item(&self, _key: &str, callback: HostCallback<String>) {
        let value = self.value.lock().unwrap().clone().unwrap_or_default();
        self.answer(callback, value);
    }

    fn set_item(&self, _key: &str, value: &str, callback: HostCallback<bool>) {
        if self.behavior == CloudBehavior::Healthy {
            *self.value.lock().unwrap() = Some(value.to_string());
        }
        self.answer(callback, true);
    }

    fn remove_item(&self, _key: &str, callback: HostCallback<bool>) {
        self.answer(callback, true);
    }

    fn get_keys(&self, callback: HostCallback<Vec<String>>) {
        self.answer(callback, vec!["brutal_notes".to_string()]);
    }
}

/// Haptic sink that records every cue as a string.
#[derive(Default)]
pub struct RecordingHaptics {
    pub cues: Mutex<Vec<String>>,
}

impl HapticFeedback for RecordingHaptics {
    fn impact_occurred(&self, style: ImpactStyle) {
        self.cues
            .lock()
            .unwrap()
            .push(format!("impact:{}", style.as_str()));
    }

    fn notification_occurred(&self, kind: NotificationType) {
        self.cues
            .lock()
            .unwrap()
            .push(format!("notification:{}", kind.as_str()));
    }
}

/// Fake genuine host recording chrome calls.
#[derive(Default)]
pub struct FakeHost {
    pub calls: Mutex<Vec<String>>,
    pub storage: Option<Arc<ScriptedCloudStorage>>,
    pub haptics: Option<Arc<RecordingHaptics>>,
    pub fail_expand: bool,
}

impl FakeHost {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl WebApp for FakeHost {
    fn ready(&self) -> HostResult<()> {
        self.record("ready".to_string());
        Ok(())
    }

    fn expand(&self) -> HostResult<()> {
        if self.fail_expand {
            return Err(HostError::new("viewport locked"));
        }
        self.record("expand".to_string());
        Ok(())
    }

    fn set_header_color(&self, color: &str) -> HostResult<()> {
        self.record(format!("header:{color}"));
        Ok(())
    }

    fn set_background_color(&self, color: &str) -> HostResult<()> {
        self.record(format!("background:{color}"));
        Ok(())
    }

    fn cloud_storage(&self) -> Option<Arc<dyn CloudStorage>> {
        let storage: Arc<dyn CloudStorage> = self.storage.clone()?;
        Some(storage)
    }

    fn haptic_feedback(&self) -> Option<Arc<dyn HapticFeedback>> {
        let haptics: Arc<dyn HapticFeedback> = self.haptics.clone()?;
        Some(haptics)
    }
}
