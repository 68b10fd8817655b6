//! Dashboard read models.

pub mod service;

pub use service::{AdminOverview, AuthorOverview, DashboardService};
