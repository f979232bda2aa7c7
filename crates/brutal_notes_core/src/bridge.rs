//! Uniform async facade over the host (or fallback) capabilities.
//!
//! # Responsibility
//! - Detect the host environment and fall back to the local stand-in.
//! - Perform viewport/theme setup and signal readiness.
//! - Turn callback-shaped storage calls into awaited results.
//!
//! # Invariants
//! - Storage calls never fail outward: errors resolve to `None`, `false` or
//!   an empty list.
//! - `initialize` always leaves the bridge ready, recording setup failures
//!   in `error()`.
//! - Haptic triggers are fire-and-forget and no-op without the capability.

use crate::config::NotesConfig;
use crate::host::fallback::FallbackWebApp;
use crate::host::{
    CloudStorage, HapticFeedback, HostCallback, HostError, HostResult, ImpactStyle,
    NotificationType, WebApp,
};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Haptic cue requested by note mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HapticKind {
    Light,
    #[default]
    Medium,
    Heavy,
    Success,
    Warning,
    Error,
}

/// Async storage and feedback contract consumed by `NoteStore`.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Stored value for `key`; `None` when unset, empty or unavailable.
    async fn get(&self, key: &str) -> Option<String>;
    /// Whether the write was acknowledged.
    async fn set(&self, key: &str, value: &str) -> bool;
    /// Whether the delete was acknowledged.
    async fn remove(&self, key: &str) -> bool;
    async fn list_keys(&self) -> Vec<String>;
    fn trigger_haptic(&self, kind: HapticKind);
}

#[async_trait]
impl<T: StorageAdapter + ?Sized> StorageAdapter for Arc<T> {
    async fn get(&self, key: &str) -> Option<String> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> bool {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> bool {
        (**self).remove(key).await
    }

    async fn list_keys(&self) -> Vec<String> {
        (**self).list_keys().await
    }

    fn trigger_haptic(&self, kind: HapticKind) {
        (**self).trigger_haptic(kind);
    }
}

/// Which runtime backs the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnvironment {
    /// Genuine chat-platform host.
    Host,
    /// Local stand-in used during development.
    Fallback,
}

impl HostEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Fallback => "fallback",
        }
    }
}

/// Storage adapter bound to one detected environment.
pub struct HostBridge {
    environment: HostEnvironment,
    ready: bool,
    error: Option<String>,
    storage: Option<Arc<dyn CloudStorage>>,
    haptics: Option<Arc<dyn HapticFeedback>>,
}

impl HostBridge {
    /// Initializes against `detected`, or the fallback host when `None`.
    ///
    /// Never fails: setup errors are kept in `error()` and the bridge is
    /// still marked ready so the host UI does not wait forever.
    pub fn initialize(detected: Option<Arc<dyn WebApp>>, config: &NotesConfig) -> Self {
        let mut bridge = Self {
            environment: if detected.is_some() {
                HostEnvironment::Host
            } else {
                HostEnvironment::Fallback
            },
            ready: false,
            error: None,
            storage: None,
            haptics: None,
        };

        match bridge.setup(detected, config) {
            Ok(()) => info!(
                "event=bridge_init module=bridge status=ok env={} storage={}",
                bridge.environment.as_str(),
                bridge.storage.is_some()
            ),
            Err(err) => {
                error!(
                    "event=bridge_init module=bridge status=error env={} error={}",
                    bridge.environment.as_str(),
                    err
                );
                bridge.error = Some(err.message().to_string());
            }
        }

        bridge.ready = true;
        bridge
    }

    fn setup(&mut self, detected: Option<Arc<dyn WebApp>>, config: &NotesConfig) -> HostResult<()> {
        let webapp: Arc<dyn WebApp> = match detected {
            Some(webapp) => webapp,
            None => {
                warn!("event=bridge_detect module=bridge status=fallback");
                Arc::new(FallbackWebApp::open(config.fallback_db_path.as_deref()))
            }
        };

        webapp.expand()?;
        webapp.set_header_color(&config.theme_color)?;
        webapp.set_background_color(&config.theme_color)?;
        webapp.ready()?;

        self.storage = webapp.cloud_storage();
        if self.storage.is_none() {
            error!("event=bridge_init module=bridge status=degraded reason=cloud_storage_unavailable");
        }
        self.haptics = webapp.haptic_feedback();
        Ok(())
    }

    pub fn environment(&self) -> HostEnvironment {
        self.environment
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Readable message of the last setup failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }
}

/// Awaits one host callback, mapping errors and dropped callbacks to `fallback`.
async fn await_callback<T: Send + 'static>(
    op: &'static str,
    fallback: T,
    invoke: impl FnOnce(HostCallback<T>),
) -> T {
    let (tx, rx) = oneshot::channel::<Result<T, HostError>>();
    invoke(Box::new(move |error, value| {
        let _ = tx.send(match error {
            Some(err) => Err(err),
            None => Ok(value),
        });
    }));

    match rx.await {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            error!("event=storage_call module=bridge op={op} status=error error={err}");
            fallback
        }
        Err(_) => {
            error!("event=storage_call module=bridge op={op} status=error error=callback_dropped");
            fallback
        }
    }
}

#[async_trait]
impl StorageAdapter for HostBridge {
    async fn get(&self, key: &str) -> Option<String> {
        let Some(storage) = self.storage.as_ref() else {
            warn!("event=storage_call module=bridge op=get status=unavailable key={key}");
            return None;
        };

        let value = await_callback("get", String::new(), |callback| {
            storage.get_item(key, callback)
        })
        .await;
        debug!(
            "event=storage_call module=bridge op=get status=ok key={} value_len={}",
            key,
            value.len()
        );
        Some(value).filter(|value| !value.is_empty())
    }

    async fn set(&self, key: &str, value: &str) -> bool {
        let Some(storage) = self.storage.as_ref() else {
            warn!("event=storage_call module=bridge op=set status=unavailable key={key}");
            return false;
        };

        let success = await_callback("set", false, |callback| {
            storage.set_item(key, value, callback)
        })
        .await;
        debug!(
            "event=storage_call module=bridge op=set key={} value_len={} success={}",
            key,
            value.len(),
            success
        );
        success
    }

    async fn remove(&self, key: &str) -> bool {
        let Some(storage) = self.storage.as_ref() else {
            return false;
        };
        await_callback("remove", false, |callback| {
            storage.remove_item(key, callback)
        })
        .await
    }

    async fn list_keys(&self) -> Vec<String> {
        let Some(storage) = self.storage.as_ref() else {
            return Vec::new();
        };
        await_callback("list_keys", Vec::new(), |callback| storage.get_keys(callback)).await
    }

    fn trigger_haptic(&self, kind: HapticKind) {
        let Some(haptics) = self.haptics.as_ref() else {
            return;
        };
        match kind {
            HapticKind::Light => haptics.impact_occurred(ImpactStyle::Light),
            HapticKind::Medium => haptics.impact_occurred(ImpactStyle::Medium),
            HapticKind::Heavy => haptics.impact_occurred(ImpactStyle::Heavy),
            HapticKind::Success => haptics.notification_occurred(NotificationType::Success),
            HapticKind::Warning => haptics.notification_occurred(NotificationType::Warning),
            HapticKind::Error => haptics.notification_occurred(NotificationType::Error),
        }
    }
}
