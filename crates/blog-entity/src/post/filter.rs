//! Composable filters for post listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::PostStatus;

/// Optional, independently composable filters for a post listing.
///
/// Every field is optional; an absent filter imposes no constraint.
/// Present filters combine with logical AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFilter {
    /// Only posts with this status.
    pub status: Option<PostStatus>,
    /// Only posts by this author.
    pub author_id: Option<Uuid>,
    /// Case-insensitive free-text match over title and body.
    pub query: Option<String>,
    /// Only posts created at or after this instant.
    pub created_from: Option<DateTime<Utc>>,
    /// Only posts created at or before this instant.
    pub created_to: Option<DateTime<Utc>>,
}

impl PostFilter {
    /// Filter to a single status.
    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter to a single author.
    pub fn with_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Filter by free-text query over title and body.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Filter by inclusive creation date range.
    pub fn with_created_between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self.created_to = Some(to);
        self
    }
}
