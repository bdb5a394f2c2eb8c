//! Feed pagination types: the ordering-key cursor and the page envelope.
//!
//! # Responsibility
//! - Encode/decode the opaque pagination token.
//! - Define the page shape returned by the feed engine.
//!
//! # Invariants
//! - The cursor serializes the `(created_at, media_id)` ordering key and
//!   round-trips exactly through encode/decode.
//! - The cursor is a position in key space, never a row offset; it stays
//!   valid while viewed marks are inserted between requests.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use super::media::{Media, MediaId};

/// Pagination position: the ordering key of the last item returned on the
/// previous page. Items with key strictly less than this (in
/// `created_at DESC, media_id DESC` order) belong to later pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    pub created_at: i64,
    pub media_id: MediaId,
}

/// A supplied pagination token failed to parse to a well-formed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorError {
    pub token: String,
}

impl Display for CursorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid feed cursor: `{}`", self.token)
    }
}

impl Error for CursorError {}

impl FeedCursor {
    /// Returns the ordering key of a media item.
    pub fn for_media(media: &Media) -> Self {
        Self {
            created_at: media.created_at,
            media_id: media.id,
        }
    }

    /// Serializes the key as an opaque API token.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.created_at, self.media_id)
    }

    /// Parses an API token back into an ordering key.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let invalid = || CursorError {
            token: token.to_string(),
        };

        let (created_at_text, media_id_text) = token.split_once(':').ok_or_else(invalid)?;
        let created_at: i64 = created_at_text.parse().map_err(|_| invalid())?;
        let media_id = Uuid::parse_str(media_id_text).map_err(|_| invalid())?;

        Ok(Self {
            created_at,
            media_id,
        })
    }
}

/// One page of unseen media delivered to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    /// Items in `(created_at DESC, id DESC)` order.
    pub items: Vec<Media>,
    /// Token for the next page; `None` when this page is empty.
    pub next_cursor: Option<String>,
    /// Whether another candidate existed beyond this page at query time.
    pub has_more: bool,
}

impl FeedPage {
    /// The terminal page: nothing unseen remains (or nothing was eligible).
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}
