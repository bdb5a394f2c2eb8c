//! Follow edge domain model.

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Directed follow relationship: the follower's feed may include the
/// followed user's media.
///
/// # Invariants
/// - At most one edge per ordered `(follower_id, following_id)` pair.
/// - Self-follow is not restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub following_id: UserId,
    /// Edge creation time in epoch milliseconds.
    pub created_at: i64,
}
