//! Local stand-in for the mini app host.
//!
//! # Responsibility
//! - Offer the same callback-shaped storage API as the real host.
//! - Mirror every write into `LocalKvStore` so notes survive restarts.
//! - Log chrome and haptic calls instead of driving real UI.
//!
//! # Invariants
//! - The in-memory map is the source of truth; a failed mirror write is
//!   logged and never fails the call.
//! - Callbacks run on the next scheduling tick when a tokio runtime is
//!   available, inline otherwise.

use crate::host::local_store::LocalKvStore;
use crate::host::{
    CloudStorage, HapticFeedback, HostCallback, HostError, HostResult, ImpactStyle,
    NotificationType, WebApp,
};
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory key/value store with an optional persistent mirror.
pub struct FallbackCloudStorage {
    entries: Mutex<BTreeMap<String, String>>,
    mirror: Option<LocalKvStore>,
}

impl FallbackCloudStorage {
    /// Creates the store and eagerly imports all non-empty mirror entries.
    pub fn new(mirror: Option<LocalKvStore>) -> Self {
        let mut entries = BTreeMap::new();
        if let Some(store) = mirror.as_ref() {
            match store.entries() {
                Ok(rows) => {
                    for (key, value) in rows.into_iter().filter(|(_, value)| !value.is_empty()) {
                        entries.insert(key, value);
                    }
                    info!(
                        "event=fallback_import module=host status=ok entries={}",
                        entries.len()
                    );
                }
                Err(err) => warn!(
                    "event=fallback_import module=host status=error error={}",
                    err
                ),
            }
        }

        Self {
            entries: Mutex::new(entries),
            mirror,
        }
    }

    /// Store without a persistent mirror.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, HostError> {
        self.entries
            .lock()
            .map_err(|_| HostError::new("fallback storage lock poisoned"))
    }

    fn mirror_put(&self, key: &str, value: &str) {
        if let Some(store) = self.mirror.as_ref() {
            if let Err(err) = store.put(key, value) {
                warn!(
                    "event=fallback_mirror module=host status=error op=put key={} error={}",
                    key, err
                );
            }
        }
    }

    fn mirror_delete(&self, key: &str) {
        if let Some(store) = self.mirror.as_ref() {
            if let Err(err) = store.delete(key) {
                warn!(
                    "event=fallback_mirror module=host status=error op=delete key={} error={}",
                    key, err
                );
            }
        }
    }
}

impl CloudStorage for FallbackCloudStorage {
    fn get_item(&self, key: &str, callback: HostCallback<String>) {
        match self.entries() {
            Ok(entries) => {
                let value = entries.get(key).cloned().unwrap_or_default();
                complete_later(callback, None, value);
            }
            Err(err) => complete_later(callback, Some(err), String::new()),
        }
    }

    fn set_item(&self, key: &str, value: &str, callback: HostCallback<bool>) {
        match self.entries() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
                drop(entries);
                self.mirror_put(key, value);
                complete_later(callback, None, true);
            }
            Err(err) => complete_later(callback, Some(err), false),
        }
    }

    fn remove_item(&self, key: &str, callback: HostCallback<bool>) {
        match self.entries() {
            Ok(mut entries) => {
                entries.remove(key);
                drop(entries);
                self.mirror_delete(key);
                complete_later(callback, None, true);
            }
            Err(err) => complete_later(callback, Some(err), false),
        }
    }

    fn get_keys(&self, callback: HostCallback<Vec<String>>) {
        match self.entries() {
            Ok(entries) => {
                let keys = entries.keys().cloned().collect();
                complete_later(callback, None, keys);
            }
            Err(err) => complete_later(callback, Some(err), Vec::new()),
        }
    }
}

fn complete_later<T: Send + 'static>(
    callback: HostCallback<T>,
    error: Option<HostError>,
    value: T,
) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move { callback(error, value) });
        }
        Err(_) => callback(error, value),
    }
}

/// Haptic sink that only records the requested cue in the log.
#[derive(Debug, Default)]
pub struct LoggingHaptics;

impl HapticFeedback for LoggingHaptics {
    fn impact_occurred(&self, style: ImpactStyle) {
        info!("event=haptic module=host kind=impact style={}", style.as_str());
    }

    fn notification_occurred(&self, kind: NotificationType) {
        info!(
            "event=haptic module=host kind=notification type={}",
            kind.as_str()
        );
    }
}

/// Fallback mini app used when no genuine host is detected.
///
/// Haptic cues are written to the log instead of being dropped.
pub struct FallbackWebApp {
    storage: Arc<FallbackCloudStorage>,
    haptics: Arc<LoggingHaptics>,
}

impl FallbackWebApp {
    pub fn new(storage: FallbackCloudStorage) -> Self {
        Self {
            storage: Arc::new(storage),
            haptics: Arc::new(LoggingHaptics),
        }
    }

    /// Builds the fallback host, mirroring into `mirror_path` when given.
    ///
    /// A mirror that cannot be opened is logged and skipped; storage then
    /// lives in memory only.
    pub fn open(mirror_path: Option<&std::path::Path>) -> Self {
        let mirror = mirror_path.and_then(|path| match LocalKvStore::open(path) {
            Ok(store) => Some(store),
            Err(err) => {
                warn!(
                    "event=fallback_mirror module=host status=error op=open path={} error={}",
                    path.display(),
                    err
                );
                None
            }
        });
        Self::new(FallbackCloudStorage::new(mirror))
    }
}

impl WebApp for FallbackWebApp {
    fn ready(&self) -> HostResult<()> {
        info!("event=webapp_ready module=host env=fallback");
        Ok(())
    }

    fn expand(&self) -> HostResult<()> {
        info!("event=webapp_expand module=host env=fallback");
        Ok(())
    }

    fn set_header_color(&self, color: &str) -> HostResult<()> {
        info!("event=webapp_header_color module=host env=fallback color={color}");
        Ok(())
    }

    fn set_background_color(&self, color: &str) -> HostResult<()> {
        info!("event=webapp_background_color module=host env=fallback color={color}");
        Ok(())
    }

    fn cloud_storage(&self) -> Option<Arc<dyn CloudStorage>> {
        let storage: Arc<dyn CloudStorage> = self.storage.clone();
        Some(storage)
    }

    fn haptic_feedback(&self) -> Option<Arc<dyn HapticFeedback>> {
        let haptics: Arc<dyn HapticFeedback> = self.haptics.clone();
        Some(haptics)
    }
}

#[cfg(test)]
mod tests {
    use super::FallbackCloudStorage;
    use crate::host::local_store::LocalKvStore;
    use crate::host::CloudStorage;
    use std::sync::{Arc, Mutex};

    #[test]
    fn completes_inline_without_runtime() {
        let storage = FallbackCloudStorage::in_memory();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        storage.set_item(
            "k",
            "v",
            Box::new(move |error, ok| {
                *sink.lock().expect("sink lock") = Some((error.is_none(), ok));
            }),
        );
        assert_eq!(*seen.lock().expect("seen lock"), Some((true, true)));
    }

    #[test]
    fn missing_key_resolves_to_empty_string() {
        let storage = FallbackCloudStorage::in_memory();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        storage.get_item(
            "missing",
            Box::new(move |error, value| {
                *sink.lock().expect("sink lock") = Some((error.is_none(), value));
            }),
        );
        assert_eq!(
            *seen.lock().expect("seen lock"),
            Some((true, String::new()))
        );
    }

    #[test]
    fn import_skips_empty_mirror_values() {
        let mirror = LocalKvStore::open_in_memory().expect("mirror");
        mirror.put("full", "x").expect("put full");
        mirror.put("empty", "").expect("put empty");

        let storage = FallbackCloudStorage::new(Some(mirror));
        let keys = Arc::new(Mutex::new(Vec::new()));
        let sink = keys.clone();
        storage.get_keys(Box::new(move |_, value| {
            *sink.lock().expect("sink lock") = value;
        }));
        assert_eq!(*keys.lock().expect("keys lock"), vec!["full".to_string()]);
    }
}
