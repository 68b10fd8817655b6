//! Shared value types used across Miniblog crates.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
