//! Transient notifications with a single-slot auto-dismiss timer.
//!
//! At most one toast is visible. Showing a new toast cancels the pending
//! dismissal of the previous one and schedules its own, so a stale timer
//! can never hide a newer toast.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default time a toast stays visible
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: ToastKind::Error,
        }
    }

    /// A toast describing a failed action, titled in `locale`.
    pub fn from_error(err: &crate::Error, locale: crate::i18n::Locale) -> Self {
        Self::error(err.title(locale), err.to_string())
    }
}

type OnShowHandler = Arc<dyn Fn(&Toast) + Send + Sync>;

#[derive(Default)]
struct Slot {
    generation: u64,
    toast: Option<Toast>,
}

/// Owner of the visible toast and its dismissal timer
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    pending: Option<JoinHandle<()>>,
    duration: Duration,
    on_show: Option<OnShowHandler>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            pending: None,
            duration,
            on_show: None,
        }
    }

    /// Register a callback invoked for every toast shown.
    pub fn on_show<F>(&mut self, cb: F)
    where
        F: Fn(&Toast) + Send + Sync + 'static,
    {
        self.on_show = Some(Arc::new(cb));
    }

    pub fn clear_on_show(&mut self) {
        self.on_show = None;
    }

    /// Show `toast`, replacing the current one and its timer.
    ///
    /// Outside a tokio runtime no timer is scheduled and the toast stays
    /// until replaced or dismissed.
    pub fn show(&mut self, toast: Toast) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let generation = {
            let mut slot = match self.slot.lock() {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
            slot.generation += 1;
            slot.toast = Some(toast.clone());
            slot.generation
        };

        log::debug!("toast ({:?}) {}: {}", toast.kind, toast.title, toast.message);
        if let Some(cb) = &self.on_show {
            cb(&toast);
        }

        if let Ok(rt) = tokio::runtime::Handle::try_current() {
            let slot = self.slot.clone();
            let duration = self.duration;
            self.pending = Some(rt.spawn(async move {
                tokio::time::sleep(duration).await;
                if let Ok(mut slot) = slot.lock() {
                    if slot.generation == generation {
                        slot.toast = None;
                    }
                }
            }));
        }
    }

    /// Hide the current toast now and cancel its timer.
    pub fn dismiss(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        if let Ok(mut slot) = self.slot.lock() {
            slot.generation += 1;
            slot.toast = None;
        }
    }

    pub fn current(&self) -> Option<Toast> {
        self.slot.lock().ok().and_then(|s| s.toast.clone())
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn toast_auto_dismisses() {
        let mut n = Notifier::new(Duration::from_secs(3));
        n.show(Toast::success("Copied!", "URL"));
        assert!(n.current().is_some());
        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert!(n.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_toast_replaces_pending_timer() {
        let mut n = Notifier::new(Duration::from_secs(3));
        n.show(Toast::success("first", ""));
        tokio::time::sleep(Duration::from_secs(2)).await;
        n.show(Toast::error("second", ""));

        // The first timer would have fired at t=3s.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(n.current().map(|t| t.title), Some("second".to_string()));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(n.current().is_none());
    }

    #[test]
    fn without_runtime_toast_stays_until_dismissed() {
        let mut n = Notifier::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        n.on_show(move |t| seen2.lock().unwrap().push(t.title.clone()));
        n.show(Toast::success("a", ""));
        n.show(Toast::success("b", ""));
        assert_eq!(n.current().unwrap().title, "b");
        n.dismiss();
        assert!(n.current().is_none());
        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
