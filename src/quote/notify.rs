/*
 * User-facing notification sink
 */

use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeOptions {
    /// Notices sharing an id replace each other in the UI.
    pub id: Option<String>,
    pub duration: Option<Duration>,
}

pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str, options: &NoticeOptions);
}

/// Writes notices to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_error(&self, message: &str, options: &NoticeOptions) {
        warn!(notice_id = options.id.as_deref().unwrap_or_default(), "{}", message);
    }
}
