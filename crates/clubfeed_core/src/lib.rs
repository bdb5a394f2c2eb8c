//! Core domain logic for Clubfeed.
//! This crate is the single source of truth for feed delivery invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::feed::{CursorError, FeedCursor, FeedPage};
pub use model::follow::FollowEdge;
pub use model::media::{Media, MediaId, MediaUpdate};
pub use model::user::{User, UserId, UserUpdate};
pub use repo::follow_repo::{FollowRepository, SqliteFollowRepository};
pub use repo::media_repo::{MediaRepository, SqliteMediaRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::viewed_repo::{SqliteViewedRepository, ViewedMark, ViewedRepository};
pub use repo::{RepoError, RepoResult};
pub use service::feed_service::{FeedQuery, FeedService, DEFAULT_PAGE_SIZE, PAGE_SIZE_MAX};
pub use service::media_service::{MediaService, PublishMediaRequest};
pub use service::profile_service::{CreateProfileRequest, ProfileService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
