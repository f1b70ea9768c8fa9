//! Host UI Integration
//!
//! The core never renders anything itself. It asks the host to switch views
//! through a [`Navigator`] and to show transient messages through a
//! [`Notifier`].

use serde::{Deserialize, Serialize};

/// Router handle used to force a view change.
///
/// The gateway calls this when a session is torn down after an authentication
/// failure. Implementations must be cheap and non-blocking; a UI router
/// typically queues the navigation on its own event loop.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to the route identified by `route` (a route name or path).
    fn navigate_to(&self, route: &str);
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the user (toast, snackbar, status line)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Sink for transient user notifications.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that drops every notice. Useful for headless callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_notice_constructors() {
        let notice = Notice::error("Resource not found");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Resource not found");
    }

    #[test]
    fn test_mock_navigator_records_route() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate_to()
            .with(eq("/login"))
            .times(1)
            .return_const(());

        navigator.navigate_to("/login");
    }

    #[test]
    fn test_silent_notifier_accepts_notices() {
        SilentNotifier.notify(Notice::new(NoticeLevel::Info, "ignored"));
    }
}
