//! Media item domain model.
//!
//! # Invariants
//! - `owner_id` never changes after creation.
//! - `created_at` (epoch milliseconds) never changes after creation; it is
//!   half of the feed ordering key, the other half being `id`.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::user::UserId;

/// Stable identifier for a media item.
pub type MediaId = Uuid;

/// Media item record owned by the media catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Stable global ID; also the tie-break half of the feed ordering key.
    pub id: MediaId,
    /// Publishing user. Immutable once created.
    pub owner_id: UserId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Location of the underlying asset (storage is out of scope).
    pub media_url: String,
    /// Creation time in epoch milliseconds. Immutable once created.
    pub created_at: i64,
}

impl Media {
    /// Creates a new media item stamped with the current time.
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            description: description.into(),
            media_url: media_url.into(),
            created_at: now_epoch_ms(),
        }
    }
}

/// Partial update for a media item; owner and creation time are not
/// updatable by design.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
