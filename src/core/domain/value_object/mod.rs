mod api_base_url;
mod node_id;
mod notification_id;
mod percentage;
pub(crate) mod serde_helpers;
mod vmid;

pub use api_base_url::ApiBaseUrl;
pub use node_id::NodeId;
pub use notification_id::NotificationId;
pub use percentage::Percentage;
pub use vmid::Vmid;

pub(crate) use api_base_url::validate_url;
