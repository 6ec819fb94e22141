use crate::core::domain::{model::notification::Notification, value_object::NotificationId};
use crate::widget::Element;

/// Why a toast left the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Its auto-dismiss timer fired.
    Expired,
    /// It was removed explicitly (close button or caller).
    Removed,
    /// `clear` dropped every toast at once.
    Cleared,
}

/// Receives toast lifecycle changes, e.g. to mirror them into a page.
///
/// Callbacks run outside the manager's lock and may be invoked from the
/// timer task.
pub trait ToastSink: Send + Sync {
    fn shown(&self, notification: &Notification, element: &Element);

    fn dismissed(&self, id: &NotificationId, reason: DismissReason);
}
