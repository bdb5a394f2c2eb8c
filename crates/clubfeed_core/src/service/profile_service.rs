//! Profile use-case service.
//!
//! # Responsibility
//! - Provide stable profile CRUD entry points for boundary callers.
//! - Delegate persistence to the user directory repository.

use crate::model::user::{User, UserId, UserUpdate};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

/// Request model for creating a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProfileRequest {
    pub username: String,
    pub email: String,
    pub description: String,
    pub profile_pic: String,
}

/// Use-case service wrapper for profile operations.
pub struct ProfileService<R: UserRepository> {
    directory: R,
}

impl<R: UserRepository> ProfileService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(directory: R) -> Self {
        Self { directory }
    }

    /// Creates a new profile and returns the stored record.
    ///
    /// # Contract
    /// - Fails with `AlreadyExists` on duplicate username or email.
    pub fn create_profile(&self, request: &CreateProfileRequest) -> RepoResult<User> {
        let user = User::new(
            request.username.clone(),
            request.email.clone(),
            request.description.clone(),
            request.profile_pic.clone(),
        );
        self.directory.create_user(&user)?;
        Ok(user)
    }

    /// Gets one profile by ID.
    pub fn get_profile(&self, id: UserId) -> RepoResult<Option<User>> {
        self.directory.get_user(id)
    }

    /// Applies a partial profile update and returns the stored record.
    pub fn update_profile(&self, id: UserId, update: &UserUpdate) -> RepoResult<User> {
        self.directory.update_user(id, update)
    }

    /// Deletes a profile; media, follow edges and viewed marks cascade.
    pub fn delete_profile(&self, id: UserId) -> RepoResult<()> {
        self.directory.delete_user(id)
    }
}
