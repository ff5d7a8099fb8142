//! Notification channel: a process-wide queue of ephemeral toasts.
//!
//! Every toast runs its own auto-dismiss timer; dismissal is idempotent, so a
//! manual dismiss racing the timer is harmless.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

/// Severity of a toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Handle for dismissing a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

/// An enqueued status message.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

/// Cloneable handle to the shared toast queue.
#[derive(Clone)]
pub struct Notifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
    default_duration: Duration,
}

impl Notifier {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            default_duration,
        }
    }

    /// Enqueue a toast and schedule its auto-dismissal.
    ///
    /// The timer runs on the ambient tokio runtime; without one the toast
    /// stays until dismissed manually.
    pub fn notify(&self, kind: ToastKind, message: &str, duration: Option<Duration>) -> ToastId {
        let id = ToastId(Uuid::new_v4());
        let duration = duration.unwrap_or(self.default_duration);

        self.toasts.lock().unwrap().push(Toast {
            id,
            kind,
            message: message.to_string(),
            duration,
        });

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let queue = Arc::clone(&self.toasts);
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                queue.lock().unwrap().retain(|t| t.id != id);
            });
        }

        id
    }

    /// Remove a toast immediately. Dismissing twice, or after the timer has
    /// already fired, is a no-op.
    pub fn dismiss(&self, id: ToastId) {
        self.toasts.lock().unwrap().retain(|t| t.id != id);
    }

    /// Snapshot of the currently visible toasts, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn success(&self, message: &str) -> ToastId {
        self.notify(ToastKind::Success, message, None)
    }

    pub fn error(&self, message: &str) -> ToastId {
        self.notify(ToastKind::Error, message, None)
    }

    pub fn warning(&self, message: &str) -> ToastId {
        self.notify(ToastKind::Warning, message, None)
    }

    pub fn info(&self, message: &str) -> ToastId {
        self.notify(ToastKind::Info, message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_and_manual_dismiss() {
        let notifier = Notifier::new(Duration::from_secs(60));
        let id = notifier.success("Saved");
        assert_eq!(notifier.active().len(), 1);

        notifier.dismiss(id);
        assert!(notifier.active().is_empty());
    }

    #[tokio::test]
    async fn test_auto_dismiss_after_duration() {
        let notifier = Notifier::new(Duration::from_millis(20));
        notifier.error("Oops");
        assert_eq!(notifier.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(notifier.active().is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_is_idempotent() {
        let notifier = Notifier::new(Duration::from_millis(20));
        let id = notifier.info("Heads up");
        tokio::time::sleep(Duration::from_millis(80)).await;

        // already auto-dismissed; both calls must be no-ops
        notifier.dismiss(id);
        notifier.dismiss(id);
        assert!(notifier.active().is_empty());
    }

    #[tokio::test]
    async fn test_per_toast_duration_override() {
        let notifier = Notifier::new(Duration::from_millis(10));
        let long = notifier.notify(
            ToastKind::Warning,
            "Stays longer",
            Some(Duration::from_secs(60)),
        );
        notifier.notify(ToastKind::Info, "Short lived", None);

        tokio::time::sleep(Duration::from_millis(60)).await;
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, long);
    }
}
