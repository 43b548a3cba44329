//! Notification sink that writes to the log

use depot_core::{Notification, NotificationSink, Severity};

/// Routes notifications to `tracing`
///
/// Used when no UI is attached, e.g. from the command line.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let color = notification.color();
        match notification.severity {
            Severity::Error => error!(color, "{}", notification.title),
            Severity::Warning => warn!(color, "{}", notification.title),
            Severity::Success | Severity::Loading => {
                info!(severity = %notification.severity, color, "{}", notification.title);
            }
        }
    }
}
