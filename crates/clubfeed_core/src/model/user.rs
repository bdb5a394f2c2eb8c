//! User profile domain model.
//!
//! The user directory is an external collaborator from the feed engine's
//! point of view; the engine itself only consumes user identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user profile.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = Uuid;

/// User profile record owned by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable global ID referenced by media, follow edges and viewed marks.
    pub id: UserId,
    /// Unique display handle.
    pub username: String,
    /// Unique contact address.
    pub email: String,
    /// Free-form profile text.
    pub description: String,
    /// Profile picture URL.
    pub profile_pic: String,
}

impl User {
    /// Creates a new profile with a generated stable ID.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        description: impl Into<String>,
        profile_pic: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            description: description.into(),
            profile_pic: profile_pic.into(),
        }
    }
}

/// Partial update for a profile; `None` fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub profile_pic: Option<String>,
}
