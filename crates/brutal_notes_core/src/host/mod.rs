//! Host capability surface consumed by the notes core.
//!
//! # Responsibility
//! - Describe the callback-shaped host API (chrome, cloud storage, haptics).
//! - Provide the local fallback host used outside the chat platform.
//!
//! # Invariants
//! - Callbacks follow the `(error, result)` convention and are invoked at
//!   most once.
//! - A capability that the host does not offer is reported as `None`, never
//!   as an error.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod fallback;
pub mod local_store;

/// One-shot host callback in `(error, result)` form.
pub type HostCallback<T> = Box<dyn FnOnce(Option<HostError>, T) + Send + 'static>;

/// Readable error reported by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for HostError {}

pub type HostResult<T> = Result<T, HostError>;

/// Key/value cloud store exposed by the host.
pub trait CloudStorage: Send + Sync {
    /// Resolves with the stored value, or an empty string when unset.
    fn get_item(&self, key: &str, callback: HostCallback<String>);
    fn set_item(&self, key: &str, value: &str, callback: HostCallback<bool>);
    fn remove_item(&self, key: &str, callback: HostCallback<bool>);
    fn get_keys(&self, callback: HostCallback<Vec<String>>);
}

/// Impact strength accepted by `HapticFeedback::impact_occurred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

impl ImpactStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

/// Outcome category accepted by `HapticFeedback::notification_occurred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Vibration cues exposed by the host.
pub trait HapticFeedback: Send + Sync {
    fn impact_occurred(&self, style: ImpactStyle);
    fn notification_occurred(&self, kind: NotificationType);
}

/// Mini app runtime handle: chrome controls plus optional capabilities.
pub trait WebApp: Send + Sync {
    /// Signals that the app is ready to be shown.
    fn ready(&self) -> HostResult<()>;
    /// Expands the viewport to full height.
    fn expand(&self) -> HostResult<()>;
    fn set_header_color(&self, color: &str) -> HostResult<()>;
    fn set_background_color(&self, color: &str) -> HostResult<()>;
    fn cloud_storage(&self) -> Option<Arc<dyn CloudStorage>>;
    fn haptic_feedback(&self) -> Option<Arc<dyn HapticFeedback>>;
}
