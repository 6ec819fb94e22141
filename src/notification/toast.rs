use crate::core::domain::{
    model::notification::{Notification, Severity},
    value_object::NotificationId,
};
use crate::widget::Element;

pub const CONTAINER_ID: &str = "notification-container";
pub const ROLE_MESSAGE: &str = "message";

/// The single fixed-position host of all toasts, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastContainer {
    root: Element,
}

impl ToastContainer {
    pub(crate) fn new() -> Self {
        Self {
            root: Element::new("div")
                .class("notification-container")
                .attr("id", CONTAINER_ID)
                .attr("aria-live", "polite"),
        }
    }

    pub(crate) fn append(&mut self, toast: Element) {
        self.root.push_child(toast);
    }

    pub(crate) fn remove(&mut self, id: &NotificationId) -> bool {
        self.root
            .remove_children_where(|toast| toast.get_attr("id") == Some(id.as_str()))
            > 0
    }

    pub(crate) fn clear(&mut self) {
        self.root.clear_children();
    }

    /// Ids of the toasts on screen, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.root.children().iter().filter_map(|toast| toast.get_attr("id"))
    }

    pub fn element(&self) -> &Element {
        &self.root
    }
}

/// Builds the toast element for `notification`. The message is plain text
/// and gets escaped when rendered.
pub fn toast_element(notification: &Notification) -> Element {
    let severity = notification.severity;
    let live_role = match severity {
        Severity::Error => "alert",
        _ => "status",
    };

    Element::new("div")
        .class("notification")
        .class(&format!("notification-{}", severity.as_str()))
        .class("show")
        .attr("id", notification.id.as_str())
        .attr("role", live_role)
        .attr("data-severity", severity.as_str())
        .child(
            Element::new("div")
                .class("notification-content")
                .child(
                    Element::new("strong")
                        .class("notification-title")
                        .text(severity.title()),
                )
                .child(
                    Element::new("span")
                        .class("notification-message")
                        .role(ROLE_MESSAGE)
                        .text(notification.message.clone()),
                ),
        )
        .child(
            Element::new("button")
                .class("notification-close")
                .attr("type", "button")
                .attr("aria-label", "Close")
                .attr("data-action", "dismiss")
                .attr("data-notification-id", notification.id.as_str())
                .text("\u{00d7}"),
        )
}
