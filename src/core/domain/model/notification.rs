//! Toast notification data.

use crate::core::domain::value_object::NotificationId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Severity of a toast, which also selects its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Heading shown above the message.
    pub fn title(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

/// A toast currently tracked by the notification manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    /// Time before automatic dismissal. Zero means the toast stays until
    /// removed explicitly.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl Notification {
    pub fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
