//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The event a notification reports.
///
/// Only `PostPublished` is produced by the publication pipeline today;
/// the enum is the extension point for further kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A post moved from draft to published.
    PostPublished,
    /// A comment was added to a post.
    CommentAdded,
}

impl NotificationKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostPublished => "post_published",
            Self::CommentAdded => "comment_added",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = blog_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post_published" => Ok(Self::PostPublished),
            "comment_added" => Ok(Self::CommentAdded),
            _ => Err(blog_core::AppError::validation(format!(
                "Invalid notification kind: '{s}'"
            ))),
        }
    }
}
