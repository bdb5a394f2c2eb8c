//! Media use-case service.
//!
//! # Responsibility
//! - Provide stable media CRUD entry points for boundary callers.
//! - Delegate persistence to the media catalog repository.
//!
//! # Invariants
//! - Ownership and creation time are fixed at publish time.

use crate::model::media::{Media, MediaId, MediaUpdate};
use crate::model::user::UserId;
use crate::repo::media_repo::MediaRepository;
use crate::repo::RepoResult;

/// Request model for publishing a media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishMediaRequest {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub media_url: String,
}

/// Use-case service wrapper for media operations.
pub struct MediaService<R: MediaRepository> {
    catalog: R,
}

impl<R: MediaRepository> MediaService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(catalog: R) -> Self {
        Self { catalog }
    }

    /// Publishes a new media item stamped with the current time.
    ///
    /// # Contract
    /// - Fails with `NotFound` when the owner id is unknown.
    pub fn publish_media(&self, request: &PublishMediaRequest) -> RepoResult<Media> {
        let media = Media::new(
            request.owner_id,
            request.title.clone(),
            request.description.clone(),
            request.media_url.clone(),
        );
        self.catalog.create_media(&media)?;
        Ok(media)
    }

    /// Gets one media item by ID.
    pub fn get_media(&self, id: MediaId) -> RepoResult<Option<Media>> {
        self.catalog.get_media(id)
    }

    /// Applies a partial update (title/description/url only).
    pub fn update_media(&self, id: MediaId, update: &MediaUpdate) -> RepoResult<Media> {
        self.catalog.update_media(id, update)
    }

    /// Deletes a media item by ID.
    pub fn delete_media(&self, id: MediaId) -> RepoResult<()> {
        self.catalog.delete_media(id)
    }
}
