//! Core of the Brutal Notes mini app.
//! Owns the note collection, its persistence through the host cloud store and
//! the local fallback host used outside the chat platform.

pub mod bridge;
pub mod config;
pub mod db;
pub mod display;
pub mod host;
pub mod logging;
pub mod model;
pub mod store;

pub use bridge::{HapticKind, HostBridge, HostEnvironment, StorageAdapter};
pub use config::{ConfigError, NotesConfig};
pub use host::fallback::{FallbackCloudStorage, FallbackWebApp};
pub use host::local_store::{LocalKvStore, LocalStoreError};
pub use host::{
    CloudStorage, HapticFeedback, HostCallback, HostError, HostResult, ImpactStyle,
    NotificationType, WebApp,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NotePatch, NoteStats};
pub use store::clock::{Clock, ManualClock, SystemClock};
pub use store::note_store::{LoadOptions, LoadOutcome, NoteStore, NotesSnapshot};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
