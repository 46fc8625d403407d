//! Notification seam.
//!
//! The live view asks a [`Notifier`] for permission once and then calls
//! [`Notifier::show`] on every activity change. Showing is a no-op unless
//! permission was granted.

use std::sync::Arc;

use notify_rust::{Notification, Timeout};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Never asked, or the user dismissed the prompt.
    Default,
}

/// Every notification backend implements this trait.
pub trait Notifier: Send + Sync {
    /// Ask for (or report) permission to show notifications.
    fn request_permission(&mut self) -> Permission;

    /// Permission as last reported by `request_permission`.
    fn permission(&self) -> Permission;

    /// Display a notification. Does nothing unless permission is granted.
    fn show(&self, title: &str, body: &str) -> Result<()>;
}

/// Desktop notifications through the platform notification server.
///
/// Permission mirrors the `notifications.enabled` config switch.
pub struct DesktopNotifier {
    enabled: bool,
    permission: Permission,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            permission: Permission::Default,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&mut self) -> Permission {
        self.permission = if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        };
        self.permission
    }

    fn permission(&self) -> Permission {
        self.permission
    }

    /// Blocks until the notification server answers. Inside an async loop
    /// wrap the notifier in a [`BackgroundNotifier`].
    fn show(&self, title: &str, body: &str) -> Result<()> {
        if self.permission != Permission::Granted {
            return Ok(());
        }

        Notification::new()
            .summary(title)
            .body(body)
            .timeout(Timeout::Milliseconds(5000))
            .show()
            .map_err(|e| CoreError::Notification(e.to_string()))?;

        Ok(())
    }
}

/// Notifier that never shows anything.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn request_permission(&mut self) -> Permission {
        Permission::Default
    }

    fn permission(&self) -> Permission {
        Permission::Default
    }

    fn show(&self, _title: &str, _body: &str) -> Result<()> {
        Ok(())
    }
}

/// Runs another notifier's `show` on the tokio blocking pool and returns
/// at once. Failures are logged since nobody is left to receive them.
pub struct BackgroundNotifier<N> {
    inner: Arc<N>,
    handle: Handle,
}

impl<N: Notifier + 'static> BackgroundNotifier<N> {
    /// Wrap `inner`; must be called from within a tokio runtime.
    pub fn new(inner: N) -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| CoreError::Notification(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(inner),
            handle,
        })
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: Notifier + 'static> Notifier for BackgroundNotifier<N> {
    fn request_permission(&mut self) -> Permission {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.request_permission(),
            None => self.inner.permission(),
        }
    }

    fn permission(&self) -> Permission {
        self.inner.permission()
    }

    fn show(&self, title: &str, body: &str) -> Result<()> {
        if self.inner.permission() != Permission::Granted {
            return Ok(());
        }
        let inner = Arc::clone(&self.inner);
        let (title, body) = (title.to_string(), body.to_string());
        let _ = self.handle.spawn_blocking(move || {
            if let Err(e) = inner.show(&title, &body) {
                tracing::warn!(error = %e, "could not show notification");
            }
        });
        Ok(())
    }
}
