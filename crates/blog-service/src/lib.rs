//! # blog-service
//!
//! Business services for Miniblog: post authoring with the publish
//! transition detector, comments, and the notification and dashboard
//! read models. External surfaces (API, admin tooling) call into this
//! crate; it owns no HTTP concerns.

pub mod comment;
pub mod dashboard;
pub mod notification;
pub mod post;

pub use comment::CommentService;
pub use dashboard::DashboardService;
pub use notification::NotificationService;
pub use post::PostService;
