//! User-visible notifications

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Success,
    Error,
    Loading,
    Warning,
}

impl Severity {
    /// Fixed display color for this severity
    pub const fn color(self) -> &'static str {
        match self {
            Self::Success => "#52c41a",
            Self::Error => "#ff4d4f",
            Self::Loading => "#1677ff",
            Self::Warning => "#faad14",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
            Self::Loading => "LOADING",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A titled message shown to the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            severity,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(title, Severity::Success)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(title, Severity::Error)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(title, Severity::Warning)
    }

    pub fn loading(title: impl Into<String>) -> Self {
        Self::new(title, Severity::Loading)
    }

    pub const fn color(&self) -> &'static str {
        self.severity.color()
    }
}

/// Destination for user-visible notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that keeps every notification it receives
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_severity_has_distinct_color() {
        let colors = [
            Severity::Success.color(),
            Severity::Error.color(),
            Severity::Loading.color(),
            Severity::Warning.color(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Notification::error("x").color(), "#ff4d4f");
    }

    #[test]
    fn test_severity_wire_names() {
        assert_eq!(
            serde_json::to_string(&Severity::Loading).unwrap(),
            "\"LOADING\""
        );
        assert_eq!(Severity::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notification::loading("Saving"));
        notifier.notify(Notification::success("Saved"));

        let received = notifier.notifications();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].severity, Severity::Loading);
        assert_eq!(received[1].title, "Saved");
    }
}
