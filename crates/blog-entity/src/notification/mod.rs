//! Notification domain entities.

pub mod kind;
pub mod model;

pub use kind::NotificationKind;
pub use model::{CreateNotification, Notification};
