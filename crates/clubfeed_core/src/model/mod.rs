//! Domain model for the Clubfeed delivery core.
//!
//! # Responsibility
//! - Define canonical data structures shared by repositories and services.
//! - Keep identity, ordering-key and cursor semantics in one place.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Media ownership is immutable after creation.
//! - The feed ordering key is always `(created_at DESC, media id DESC)`.

pub mod feed;
pub mod follow;
pub mod media;
pub mod user;
