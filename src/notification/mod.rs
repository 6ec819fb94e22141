//! Toast notifications with per-toast auto-dismiss timers.
//!
//! [`NotificationManager`] is a cheap-to-clone handle. Each toast with a
//! non-zero duration gets its own timer task, so removing one toast never
//! affects another, and removing a toast cancels its pending timer.

mod sink;
mod toast;

pub use sink::{DismissReason, ToastSink};
pub use toast::{CONTAINER_ID, ROLE_MESSAGE, ToastContainer, toast_element};

use crate::core::domain::{
    error::DashboardError,
    model::notification::{Notification, Severity},
    value_object::NotificationId,
};
use crate::core::infrastructure::config::NotificationConfig;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct NotificationManager {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    config: NotificationConfig,
    sink: Option<Arc<dyn ToastSink>>,
    containers_built: AtomicUsize,
}

#[derive(Default)]
struct State {
    container: Option<ToastContainer>,
    active: HashMap<NotificationId, ActiveToast>,
}

struct ActiveToast {
    notification: Notification,
    timer: Option<JoinHandle<()>>,
}

impl fmt::Debug for NotificationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationManager")
            .field("config", &self.shared.config)
            .field("active", &self.len())
            .field("has_sink", &self.shared.sink.is_some())
            .finish()
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

impl NotificationManager {
    pub fn new(config: NotificationConfig) -> Self {
        Self::with_sink(config, None)
    }

    pub fn with_sink(config: NotificationConfig, sink: Option<Arc<dyn ToastSink>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                config,
                sink,
                containers_built: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.shared.config
    }

    /// Shows a toast and returns its id.
    ///
    /// A non-zero `duration` schedules automatic removal on the current Tokio
    /// runtime; zero keeps the toast until [`remove`](Self::remove) or
    /// [`clear`](Self::clear).
    pub fn show(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
    ) -> NotificationId {
        let notification = Notification {
            id: NotificationId::generate(),
            message: message.into(),
            severity,
            duration,
        };
        let id = notification.id.clone();
        let element = toast_element(&notification);

        {
            let mut state = self.shared.lock();
            let shared = &self.shared;
            state
                .container
                .get_or_insert_with(|| {
                    shared.containers_built.fetch_add(1, Ordering::Relaxed);
                    debug!("Creating toast container");
                    ToastContainer::new()
                })
                .append(element.clone());
            state.active.insert(
                id.clone(),
                ActiveToast {
                    notification: notification.clone(),
                    timer: None,
                },
            );
        }
        debug!(id = %id, severity = severity.as_str(), "Showing notification");

        if let Some(sink) = &self.shared.sink {
            sink.shown(&notification, &element);
        }

        if !duration.is_zero() {
            if let Some(timer) = self.schedule_removal(id.clone(), duration) {
                let mut state = self.shared.lock();
                match state.active.get_mut(&id) {
                    Some(active) => active.timer = Some(timer),
                    // Already gone: the timer fired or the toast was removed meanwhile.
                    None => timer.abort(),
                }
            }
        }

        id
    }

    /// Removes a toast. Returns `false` when it is no longer shown.
    pub fn remove(&self, id: &NotificationId) -> bool {
        self.shared.dismiss(id, DismissReason::Removed)
    }

    /// Removes every toast and cancels all pending timers. The container is kept.
    pub fn clear(&self) -> usize {
        let drained: Vec<(NotificationId, ActiveToast)> = {
            let mut state = self.shared.lock();
            if let Some(container) = state.container.as_mut() {
                container.clear();
            }
            state.active.drain().collect()
        };

        for (id, active) in &drained {
            if let Some(timer) = &active.timer {
                timer.abort();
            }
            if let Some(sink) = &self.shared.sink {
                sink.dismissed(id, DismissReason::Cleared);
            }
        }
        debug!(count = drained.len(), "Cleared notifications");
        drained.len()
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Success, self.shared.config.success_duration)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Error, self.shared.config.error_duration)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Warning, self.shared.config.warning_duration)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Info, self.shared.config.info_duration)
    }

    /// Shows an error toast with guidance matching the failure category.
    pub fn show_error(&self, err: &DashboardError) -> NotificationId {
        let message = match err.operation() {
            Some(operation) => format!("Failed to {}: {}", operation, err.user_message()),
            None => err.user_message(),
        };
        self.error(message)
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.shared.lock().active.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.shared.lock().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Toasts currently shown, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        let state = self.shared.lock();
        let Some(container) = state.container.as_ref() else {
            return Vec::new();
        };
        container
            .ids()
            .filter_map(|id| {
                state
                    .active
                    .values()
                    .find(|a| a.notification.id.as_str() == id)
                    .map(|a| a.notification.clone())
            })
            .collect()
    }

    /// Rendered container, or `None` before the first toast.
    pub fn container_html(&self) -> Option<String> {
        self.shared
            .lock()
            .container
            .as_ref()
            .map(|c| c.element().to_html())
    }

    #[cfg(test)]
    pub(crate) fn containers_built(&self) -> usize {
        self.shared.containers_built.load(Ordering::Relaxed)
    }

    fn schedule_removal(&self, id: NotificationId, duration: Duration) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(id = %id, "No async runtime; notification stays until removed");
            return None;
        };
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(shared) = shared.upgrade() {
                shared.dismiss(&id, DismissReason::Expired);
            }
        }))
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dismiss(&self, id: &NotificationId, reason: DismissReason) -> bool {
        let removed = {
            let mut state = self.lock();
            let removed = state.active.remove(id);
            if removed.is_some() {
                if let Some(container) = state.container.as_mut() {
                    container.remove(id);
                }
            }
            removed
        };

        let Some(active) = removed else {
            return false;
        };
        // An expiring timer is the task running this code; aborting it is pointless.
        if reason != DismissReason::Expired {
            if let Some(timer) = active.timer {
                timer.abort();
            }
        }
        debug!(id = %id, ?reason, "Dismissed notification");
        if let Some(sink) = &self.sink {
            sink.dismissed(id, reason);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl ToastSink for RecordingSink {
        fn shown(&self, notification: &Notification, _element: &crate::widget::Element) {
            self.events
                .lock()
                .unwrap()
                .push(format!("shown:{}", notification.message));
        }

        fn dismissed(&self, _id: &NotificationId, reason: DismissReason) {
            self.events
                .lock()
                .unwrap()
                .push(format!("dismissed:{:?}", reason));
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_after_duration() {
        let manager = NotificationManager::default();
        let id = manager.show("Saved", Severity::Success, ms(3_000));
        assert!(manager.contains(&id));

        tokio::time::sleep(ms(2_999)).await;
        assert!(manager.contains(&id));

        tokio::time::sleep(ms(2)).await;
        assert!(!manager.contains(&id));
        assert!(manager.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_is_persistent() {
        let manager = NotificationManager::default();
        let id = manager.show("Sticky", Severity::Error, Duration::ZERO);
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        assert!(manager.contains(&id));
        assert!(manager.active()[0].is_persistent());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_is_idempotent() {
        let manager = NotificationManager::default();
        let id = manager.info("hello");
        assert!(manager.remove(&id));
        assert!(!manager.remove(&id));
        assert!(!manager.contains(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_are_independent() {
        let manager = NotificationManager::default();
        let first = manager.show("first", Severity::Info, ms(1_000));
        let second = manager.show("second", Severity::Info, ms(3_000));

        tokio::time::sleep(ms(500)).await;
        assert!(manager.remove(&first));

        tokio::time::sleep(ms(1_500)).await;
        assert!(manager.contains(&second));

        tokio::time::sleep(ms(1_001)).await;
        assert!(!manager.contains(&second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_toast_timer_does_not_fire() {
        let sink = Arc::new(RecordingSink::default());
        let manager =
            NotificationManager::with_sink(NotificationConfig::default(), Some(sink.clone()));
        let id = manager.show("bye", Severity::Info, ms(1_000));
        assert!(manager.remove(&id));

        tokio::time::sleep(ms(5_000)).await;
        assert_eq!(
            *sink.events.lock().unwrap(),
            vec!["shown:bye".to_string(), "dismissed:Removed".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_helper_default_durations() {
        let manager = NotificationManager::default();
        let success = manager.success("s");
        let info = manager.info("i");
        let warning = manager.warning("w");
        let error = manager.error("e");

        let durations: HashMap<_, _> = manager
            .active()
            .into_iter()
            .map(|n| (n.id, (n.severity, n.duration)))
            .collect();
        assert_eq!(durations[&success], (Severity::Success, ms(3_000)));
        assert_eq!(durations[&info], (Severity::Info, ms(5_000)));
        assert_eq!(durations[&warning], (Severity::Warning, ms(5_000)));
        assert_eq!(durations[&error], (Severity::Error, ms(8_000)));

        tokio::time::sleep(ms(3_001)).await;
        assert!(!manager.contains(&success));
        assert!(manager.contains(&info));
        tokio::time::sleep(ms(5_000)).await;
        assert!(manager.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_container_created_once() {
        let manager = NotificationManager::default();
        assert!(manager.container_html().is_none());

        manager.info("a");
        manager.info("b");
        assert_eq!(manager.clear(), 2);
        manager.info("c");

        assert_eq!(manager.containers_built(), 1);
        let html = manager.container_html().unwrap();
        assert_eq!(html.matches(CONTAINER_ID).count(), 1);
        assert!(html.contains(">c<"));
        assert!(!html.contains(">a<"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_keeps_insertion_order() {
        let manager = NotificationManager::default();
        for message in ["one", "two", "three"] {
            manager.info(message);
        }
        let messages: Vec<_> = manager.active().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_timers_and_notifies_sink() {
        let sink = Arc::new(RecordingSink::default());
        let manager =
            NotificationManager::with_sink(NotificationConfig::default(), Some(sink.clone()));
        manager.info("x");
        manager.error("y");
        assert_eq!(manager.clear(), 2);
        assert_eq!(manager.clear(), 0);

        tokio::time::sleep(ms(10_000)).await;
        let events = sink.events.lock().unwrap();
        assert_eq!(events.iter().filter(|e| *e == "dismissed:Cleared").count(), 2);
        assert_eq!(events.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_error_uses_operation_and_guidance() {
        let manager = NotificationManager::default();
        let err = DashboardError::Timeout {
            operation: "list nodes".to_string(),
            endpoint: "/nodes".to_string(),
            timeout_ms: 30_000,
        };
        manager.show_error(&err);
        let shown = &manager.active()[0];
        assert_eq!(shown.severity, Severity::Error);
        assert!(shown.message.starts_with("Failed to list nodes: "));
        assert!(shown.message.contains("took too long"));
    }

    #[test]
    fn test_show_without_runtime_keeps_toast() {
        let manager = NotificationManager::default();
        let id = manager.success("no runtime");
        assert!(manager.contains(&id));
        assert!(manager.remove(&id));
    }
}
