//! Media catalog contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide media CRUD over canonical `media` storage.
//! - Serve the feed engine's candidate query: unseen media from a set of
//!   owners, walked by ordering key.
//!
//! # Invariants
//! - `owner_uuid` and `created_at` are write-once; updates touch only
//!   title/description/url.
//! - Candidate scans order by `(created_at DESC, uuid DESC)` and resume
//!   strictly after the supplied cursor key.

use crate::model::feed::FeedCursor;
use crate::model::media::{Media, MediaId, MediaUpdate};
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;

const MEDIA_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    description,
    media_url,
    created_at
FROM media";

/// Repository interface for the media catalog.
pub trait MediaRepository {
    /// Persists a new media item; fails with `NotFound` when the owner id
    /// does not resolve in the user directory.
    fn create_media(&self, media: &Media) -> RepoResult<MediaId>;
    fn get_media(&self, id: MediaId) -> RepoResult<Option<Media>>;
    /// Applies a partial update and returns the stored item.
    fn update_media(&self, id: MediaId, update: &MediaUpdate) -> RepoResult<Media>;
    fn delete_media(&self, id: MediaId) -> RepoResult<()>;
    /// Feed candidate query: media owned by any of `owner_ids`, not yet
    /// viewed by `excluding_viewed_by`, with key strictly less than
    /// `after` when given, ordered `(created_at DESC, uuid DESC)`,
    /// at most `limit` rows.
    fn media_by_owners(
        &self,
        owner_ids: &BTreeSet<UserId>,
        excluding_viewed_by: UserId,
        after: Option<&FeedCursor>,
        limit: u32,
    ) -> RepoResult<Vec<Media>>;
}

/// SQLite-backed media catalog.
pub struct SqliteMediaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMediaRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                (
                    "media",
                    &[
                        "uuid",
                        "owner_uuid",
                        "title",
                        "description",
                        "media_url",
                        "created_at",
                    ],
                ),
                ("viewed_media", &["user_uuid", "media_uuid"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl MediaRepository for SqliteMediaRepository<'_> {
    fn create_media(&self, media: &Media) -> RepoResult<MediaId> {
        let owner_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE uuid = ?1);",
            [media.owner_id.to_string()],
            |row| row.get(0),
        )?;
        if owner_exists != 1 {
            return Err(RepoError::NotFound(media.owner_id));
        }

        self.conn.execute(
            "INSERT INTO media (uuid, owner_uuid, title, description, media_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                media.id.to_string(),
                media.owner_id.to_string(),
                media.title,
                media.description,
                media.media_url,
                media.created_at,
            ],
        )?;

        Ok(media.id)
    }

    fn get_media(&self, id: MediaId) -> RepoResult<Option<Media>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEDIA_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_media_row(row)?));
        }

        Ok(None)
    }

    fn update_media(&self, id: MediaId, update: &MediaUpdate) -> RepoResult<Media> {
        let changed = self.conn.execute(
            "UPDATE media
             SET
                title = COALESCE(?2, title),
                description = COALESCE(?3, description),
                media_url = COALESCE(?4, media_url)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                update.title.as_deref(),
                update.description.as_deref(),
                update.media_url.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_media(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_media(&self, id: MediaId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM media WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn media_by_owners(
        &self,
        owner_ids: &BTreeSet<UserId>,
        excluding_viewed_by: UserId,
        after: Option<&FeedCursor>,
        limit: u32,
    ) -> RepoResult<Vec<Media>> {
        if owner_ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; owner_ids.len()].join(", ");
        let mut sql = format!(
            "{MEDIA_SELECT_SQL}
             WHERE owner_uuid IN ({placeholders})
               AND NOT EXISTS (
                   SELECT 1
                   FROM viewed_media
                   WHERE viewed_media.user_uuid = ?
                     AND viewed_media.media_uuid = media.uuid
               )"
        );

        let mut bind_values: Vec<Value> = owner_ids
            .iter()
            .map(|owner| Value::Text(owner.to_string()))
            .collect();
        bind_values.push(Value::Text(excluding_viewed_by.to_string()));

        if let Some(cursor) = after {
            // Keyset resume: strictly after the last delivered key, so rows
            // removed from the unseen set by viewed marks can never shift
            // the scan position.
            sql.push_str(" AND (created_at < ? OR (created_at = ? AND uuid < ?))");
            bind_values.push(Value::Integer(cursor.created_at));
            bind_values.push(Value::Integer(cursor.created_at));
            bind_values.push(Value::Text(cursor.media_id.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid DESC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_media_row(row)?);
        }

        Ok(items)
    }
}

fn parse_media_row(row: &Row<'_>) -> RepoResult<Media> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    Ok(Media {
        id: parse_uuid_column(&uuid_text, "media.uuid")?,
        owner_id: parse_uuid_column(&owner_text, "media.owner_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        media_url: row.get("media_url")?,
        created_at: row.get("created_at")?,
    })
}
