//! User-facing notifications
//!
//! The store reports mutation results through a `Notifier`. What a notification
//! looks like on screen is up to the implementation.

use parking_lot::Mutex;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// How long a non-sticky notification stays up by default.
    pub fn default_life(&self) -> Duration {
        match self {
            Severity::Success | Severity::Info => Duration::from_millis(3000),
            Severity::Warn => Duration::from_millis(4000),
            Severity::Error => Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: Option<String>,
    #[serde(skip)]
    pub life: Duration,
    pub sticky: bool,
}

impl Notification {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail,
            life: severity.default_life(),
            sticky: false,
        }
    }

    pub fn success(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Success, summary, Some(detail.into()))
    }

    pub fn info(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Info, summary, Some(detail.into()))
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Warn, summary, Some(detail.into()))
    }

    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Error, summary, Some(detail.into()))
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn with_life(mut self, life: Duration) -> Self {
        self.life = life;
        self
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        let detail = n.detail.as_deref().unwrap_or("");
        match n.severity {
            Severity::Success | Severity::Info => info!(summary = %n.summary, "{}", detail),
            Severity::Warn => warn!(summary = %n.summary, "{}", detail),
            Severity::Error => error!(summary = %n.summary, "{}", detail),
        }
    }
}

/// Notifier that keeps everything it receives, for callers that render
/// notifications after an operation returns.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock())
    }

    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        self.received.lock().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lives_by_severity() {
        assert_eq!(Notification::success("s", "d").life, Duration::from_secs(3));
        assert_eq!(Notification::info("s", "d").life, Duration::from_secs(3));
        assert_eq!(Notification::warning("s", "d").life, Duration::from_secs(4));
        assert_eq!(Notification::error("s", "d").life, Duration::from_secs(5));
        assert!(!Notification::error("s", "d").sticky);
        assert!(Notification::error("s", "d").sticky().sticky);
    }

    #[test]
    fn collecting_notifier_drains() {
        let notifier = CollectingNotifier::new();
        notifier.notify(Notification::info("Hello", "world"));
        assert_eq!(notifier.received().len(), 1);
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.drain().is_empty());
    }
}
