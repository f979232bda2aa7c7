//! Note store: CRUD over the in-memory collection plus retrying load.
//!
//! # Responsibility
//! - Keep the newest-first note collection and the loading flag.
//! - Persist the full collection through `StorageAdapter` after mutations.
//! - Publish snapshots for observers.
//!
//! # Invariants
//! - New notes are prepended; edits never reposition a note.
//! - Unknown ids make `update`/`toggle` a silent no-op.
//! - `load` replaces state only when stored content differs.

use crate::bridge::{HapticKind, StorageAdapter};
use crate::config::NotesConfig;
use crate::model::note::{Note, NotePatch, NoteStats};
use crate::store::clock::{Clock, SystemClock};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Knobs for one `NoteStore::load` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Leave the loading flag untouched (background refresh).
    pub silent: bool,
    /// Attempt count; `None` uses the configured default.
    pub retries: Option<u32>,
}

impl LoadOptions {
    pub fn silent() -> Self {
        Self {
            silent: true,
            retries: None,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// Result of one `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored collection differed and replaced memory; carries its length.
    Replaced(usize),
    /// Stored collection matched memory.
    Unchanged,
    /// All attempts returned nothing usable.
    NoData,
}

/// Observer view published after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesSnapshot {
    pub notes: Vec<Note>,
    pub loading: bool,
}

impl NotesSnapshot {
    pub fn stats(&self) -> NoteStats {
        NoteStats::from_notes(&self.notes)
    }
}

pub struct NoteStore<A: StorageAdapter> {
    adapter: A,
    clock: Arc<dyn Clock>,
    storage_key: String,
    default_retries: u32,
    retry_base_delay: Duration,
    notes: Vec<Note>,
    loading: bool,
    snapshots: watch::Sender<NotesSnapshot>,
}

impl<A: StorageAdapter> NoteStore<A> {
    pub fn new(adapter: A, config: &NotesConfig) -> Self {
        Self::with_clock(adapter, config, Arc::new(SystemClock))
    }

    pub fn with_clock(adapter: A, config: &NotesConfig, clock: Arc<dyn Clock>) -> Self {
        let (snapshots, _) = watch::channel(NotesSnapshot::default());
        Self {
            adapter,
            clock,
            storage_key: config.storage_key.clone(),
            default_retries: config.load_retries,
            retry_base_delay: config.retry_base_delay(),
            notes: Vec::new(),
            loading: false,
            snapshots,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Recomputed on every call.
    pub fn stats(&self) -> NoteStats {
        NoteStats::from_notes(&self.notes)
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Receiver that sees a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<NotesSnapshot> {
        self.snapshots.subscribe()
    }

    /// Loads the stored collection, retrying with linear backoff.
    ///
    /// Attempt `n` that finds no value (or unparsable data) waits
    /// `n * retry_base_delay` before the next attempt. Exhausting all
    /// attempts keeps the current collection.
    pub async fn load(&mut self, options: LoadOptions) -> LoadOutcome {
        let retries = options.retries.unwrap_or(self.default_retries);
        if !options.silent {
            self.set_loading(true);
        }

        let outcome = self.fetch_with_retry(retries).await;
        match outcome {
            LoadOutcome::Replaced(count) => {
                info!("event=notes_load module=store status=replaced count={count}")
            }
            LoadOutcome::Unchanged => debug!("event=notes_load module=store status=unchanged"),
            LoadOutcome::NoData => {
                info!("event=notes_load module=store status=no_data attempts={retries}")
            }
        }

        if !options.silent {
            self.set_loading(false);
        }
        outcome
    }

    /// Background refresh: `load` without touching the loading flag.
    pub async fn sync(&mut self) -> LoadOutcome {
        self.load(LoadOptions::silent()).await
    }

    async fn fetch_with_retry(&mut self, retries: u32) -> LoadOutcome {
        for attempt in 1..=retries {
            match self.fetch_once().await {
                Ok(Some(stored)) => return self.replace_if_changed(stored),
                Ok(None) => debug!("event=notes_fetch module=store status=empty attempt={attempt}"),
                Err(err) => warn!(
                    "event=notes_fetch module=store status=error attempt={attempt} error={err}"
                ),
            }

            if attempt < retries {
                tokio::time::sleep(self.retry_base_delay * attempt).await;
            }
        }
        LoadOutcome::NoData
    }

    async fn fetch_once(&self) -> Result<Option<Vec<Note>>, serde_json::Error> {
        match self.adapter.get(&self.storage_key).await {
            Some(raw) => serde_json::from_str(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn replace_if_changed(&mut self, stored: Vec<Note>) -> LoadOutcome {
        // Field-wise equality matches comparing the serialized forms.
        if stored == self.notes {
            return LoadOutcome::Unchanged;
        }
        let count = stored.len();
        self.notes = stored;
        self.publish();
        LoadOutcome::Replaced(count)
    }

    /// Writes the full collection. Never fails outward.
    pub async fn save(&self) -> bool {
        let payload = match serde_json::to_string(&self.notes) {
            Ok(payload) => payload,
            Err(err) => {
                error!("event=notes_save module=store status=error error={err}");
                return false;
            }
        };

        let success = self.adapter.set(&self.storage_key, &payload).await;
        if success {
            info!(
                "event=notes_save module=store status=ok count={}",
                self.notes.len()
            );
        } else {
            error!(
                "event=notes_save module=store status=error count={} error=write_rejected",
                self.notes.len()
            );
        }
        success
    }

    /// Prepends a new active note and persists.
    pub async fn add(&mut self, title: &str, text: &str) -> Note {
        let note = Note::new(title, text, self.clock.now_ms());
        self.notes.insert(0, note.clone());
        self.publish();

        self.save().await;
        self.adapter.trigger_haptic(HapticKind::Success);
        info!("event=note_add module=store id={}", note.id);
        note
    }

    /// Applies `patch` to the note with `id`. `None` when the id is unknown.
    pub async fn update(&mut self, id: &str, patch: NotePatch) -> Option<Note> {
        let index = self.notes.iter().position(|note| note.id == id)?;
        let updated = self.notes[index].apply_patch(&patch, self.clock.now_ms());
        self.notes[index] = updated.clone();
        self.publish();

        self.save().await;
        self.adapter.trigger_haptic(HapticKind::Light);
        info!("event=note_update module=store id={id}");
        Some(updated)
    }

    /// Flips `completed` on the note with `id`.
    pub async fn toggle(&mut self, id: &str) -> Option<Note> {
        let completed = self.get(id)?.completed;
        let updated = self.update(id, NotePatch::completed(!completed)).await?;
        self.adapter.trigger_haptic(HapticKind::Medium);
        Some(updated)
    }

    /// Removes the note with `id` and persists. Returns whether it existed.
    pub async fn delete(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        let removed = self.notes.len() != before;
        self.publish();

        self.save().await;
        self.adapter.trigger_haptic(HapticKind::Warning);
        info!("event=note_delete module=store id={id} removed={removed}");
        removed
    }

    /// Drops every completed note. Persists only when something was removed.
    pub async fn clear_completed(&mut self) -> usize {
        let before = self.notes.len();
        self.notes.retain(|note| !note.completed);
        let removed = before - self.notes.len();
        if removed == 0 {
            return 0;
        }
        self.publish();

        self.save().await;
        self.adapter.trigger_haptic(HapticKind::Success);
        info!("event=notes_clear_completed module=store removed={removed}");
        removed
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(NotesSnapshot {
            notes: self.notes.clone(),
            loading: self.loading,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadOptions, LoadOutcome, NoteStore};
    use crate::bridge::{HapticKind, StorageAdapter};
    use crate::config::NotesConfig;
    use crate::store::clock::ManualClock;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryAdapter {
        value: Mutex<Option<String>>,
        haptics: Mutex<Vec<HapticKind>>,
    }

    #[async_trait]
    impl StorageAdapter for MemoryAdapter {
        async fn get(&self, _key: &str) -> Option<String> {
            self.value.lock().expect("value lock").clone()
        }

        async fn set(&self, _key: &str, value: &str) -> bool {
            *self.value.lock().expect("value lock") = Some(value.to_string());
            true
        }

        async fn remove(&self, _key: &str) -> bool {
            self.value.lock().expect("value lock").take().is_some()
        }

        async fn list_keys(&self) -> Vec<String> {
            Vec::new()
        }

        fn trigger_haptic(&self, kind: HapticKind) {
            self.haptics.lock().expect("haptics lock").push(kind);
        }
    }

    fn store() -> NoteStore<Arc<MemoryAdapter>> {
        NoteStore::with_clock(
            Arc::new(MemoryAdapter::default()),
            &NotesConfig::default(),
            Arc::new(ManualClock::stepping(1_000, 1)),
        )
    }

    #[tokio::test]
    async fn toggle_fires_light_then_medium_haptics() {
        let mut store = store();
        let note = store.add("a", "b").await;
        store.toggle(&note.id).await.expect("note exists");

        let haptics = store.adapter().haptics.lock().expect("haptics lock").clone();
        assert_eq!(
            haptics,
            vec![HapticKind::Success, HapticKind::Light, HapticKind::Medium]
        );
    }

    #[tokio::test]
    async fn reload_of_own_save_is_unchanged() {
        let mut store = store();
        store.add("a", "b").await;
        assert_eq!(store.load(LoadOptions::default()).await, LoadOutcome::Unchanged);
    }

    #[tokio::test]
    async fn snapshot_tracks_mutations() {
        let mut store = store();
        let receiver = store.subscribe();
        store.add("a", "b").await;

        let snapshot = receiver.borrow().clone();
        assert_eq!(snapshot.notes.len(), 1);
        assert_eq!(snapshot.stats().active, 1);
        assert!(!snapshot.loading);
    }
}
