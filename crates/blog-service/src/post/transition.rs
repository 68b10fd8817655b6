//! Publish transition detection.
//!
//! Given the status a post held before a persisted mutation (`None` for
//! a freshly created post) and the status it holds after, decides
//! whether the mutation is a draft-to-published transition. Only that
//! transition triggers the notification pipeline: it means "this content
//! is newly live", which neither a no-op update, an unpublish, nor a
//! post created directly in the published state does.

use blog_entity::post::status::PostStatus;

/// Returns true when a persisted mutation moved a post from draft to
/// published.
pub fn is_publish_transition(previous: Option<PostStatus>, current: PostStatus) -> bool {
    matches!(
        (previous, current),
        (Some(PostStatus::Draft), PostStatus::Published)
    )
}
