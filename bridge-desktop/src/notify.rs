//! Notifier that routes user notices into the tracing pipeline

use bridge_traits::ui::{Notice, NoticeLevel, Notifier};
use tracing::{info, warn};

/// Desktop fallback for toasts: notices become log events.
///
/// Shells with a real UI should inject their own [`Notifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                info!(target: "notice", message = %notice.message, "User notice")
            }
            NoticeLevel::Warning | NoticeLevel::Error => {
                warn!(target: "notice", level = ?notice.level, message = %notice.message, "User notice")
            }
        }
    }
}
