pub mod event;
pub mod health;
pub mod history;
pub mod node;
pub mod notification;
pub mod resource;
