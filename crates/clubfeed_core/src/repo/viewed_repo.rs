//! Viewed-state ledger contracts and SQLite implementation.
//!
//! # Responsibility
//! - Record that a user has been delivered a media item.
//! - Answer "unseen" exclusions for feed candidate scans.
//!
//! # Invariants
//! - At most one mark per `(user, media)` pair.
//! - Marking an already-viewed item is a silent no-op, never a duplicate
//!   row and never an error.
//! - Marks are never updated or deleted by core; there is no reset path.

use crate::model::media::MediaId;
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::BTreeSet;

/// Durable record that `user_id` has been delivered `media_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewedMark {
    pub user_id: UserId,
    pub media_id: MediaId,
    /// Mark creation time in epoch milliseconds.
    pub viewed_at: i64,
}

/// Repository interface for the viewed-state ledger.
pub trait ViewedRepository {
    fn is_viewed(&self, user_id: UserId, media_id: MediaId) -> RepoResult<bool>;
    /// Idempotent bulk insert: ids already marked are silently skipped.
    /// Returns the number of newly created marks.
    fn mark_viewed(&self, user_id: UserId, media_ids: &BTreeSet<MediaId>) -> RepoResult<u32>;
    /// All marks recorded for a user, ordered by media id.
    fn marks_for_user(&self, user_id: UserId) -> RepoResult<Vec<ViewedMark>>;
}

/// SQLite-backed viewed-state ledger.
pub struct SqliteViewedRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteViewedRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[("viewed_media", &["user_uuid", "media_uuid", "viewed_at"])],
        )?;
        Ok(Self { conn })
    }
}

impl ViewedRepository for SqliteViewedRepository<'_> {
    fn is_viewed(&self, user_id: UserId, media_id: MediaId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM viewed_media
                WHERE user_uuid = ?1 AND media_uuid = ?2
            );",
            params![user_id.to_string(), media_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn mark_viewed(&self, user_id: UserId, media_ids: &BTreeSet<MediaId>) -> RepoResult<u32> {
        if media_ids.is_empty() {
            return Ok(0);
        }

        // One multi-row statement: the whole mark is atomic, and
        // INSERT OR IGNORE makes it safe to replay against overlapping
        // concurrent page requests.
        let user_text = user_id.to_string();
        let mut bind_values: Vec<Value> = Vec::with_capacity(media_ids.len() * 2);
        let rows = media_ids
            .iter()
            .map(|media_id| {
                bind_values.push(Value::Text(user_text.clone()));
                bind_values.push(Value::Text(media_id.to_string()));
                "(?, ?, (strftime('%s', 'now') * 1000))"
            })
            .collect::<Vec<_>>()
            .join(", ");

        let inserted = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO viewed_media (user_uuid, media_uuid, viewed_at)
                 VALUES {rows};"
            ),
            params_from_iter(bind_values),
        )?;

        Ok(inserted as u32)
    }

    fn marks_for_user(&self, user_id: UserId) -> RepoResult<Vec<ViewedMark>> {
        let mut stmt = self.conn.prepare(
            "SELECT media_uuid, viewed_at
             FROM viewed_media
             WHERE user_uuid = ?1
             ORDER BY media_uuid ASC;",
        )?;

        let mut rows = stmt.query([user_id.to_string()])?;
        let mut marks = Vec::new();
        while let Some(row) = rows.next()? {
            let media_text: String = row.get("media_uuid")?;
            marks.push(ViewedMark {
                user_id,
                media_id: parse_uuid_column(&media_text, "viewed_media.media_uuid")?,
                viewed_at: row.get("viewed_at")?,
            });
        }

        Ok(marks)
    }
}
