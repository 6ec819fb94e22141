use crate::core::domain::model::event::DashboardEvent;
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_CAPACITY: usize = 64;

/// Fan-out channel for [`DashboardEvent`]s.
///
/// Emitting never blocks and never fails: with no subscriber the event is
/// dropped, and a subscriber that falls more than `capacity` events behind
/// observes `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Publishes `event`, returning how many subscribers received it.
    pub fn emit(&self, event: DashboardEvent) -> usize {
        let name = event.name();
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!(event = name, delivered, "Emitted dashboard event");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
