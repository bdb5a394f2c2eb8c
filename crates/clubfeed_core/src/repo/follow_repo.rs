//! Follow graph contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the directed `follower -> following` edge set.
//! - Answer "who does this user follow" for feed candidate filtering.
//!
//! # Invariants
//! - At most one edge per ordered `(follower, following)` pair, enforced
//!   both by pre-check and by the composite primary key.
//! - Both endpoints must resolve in the user directory before an edge is
//!   created or removed.
//! - Self-follow is not restricted.

use crate::model::follow::FollowEdge;
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

/// Repository interface for the follow graph.
pub trait FollowRepository {
    /// Inserts and returns the edge; `NotFound` when either user id is
    /// unknown, `AlreadyExists` when the edge is already present.
    fn follow(&self, follower_id: UserId, following_id: UserId) -> RepoResult<FollowEdge>;
    /// Removes the edge; `NotFound` when either user id is unknown,
    /// `NotFollowing` when the edge does not exist.
    fn unfollow(&self, follower_id: UserId, following_id: UserId) -> RepoResult<()>;
    /// Snapshot of the user ids that `user_id` follows, consistent at the
    /// start of a feed request.
    fn following_set(&self, user_id: UserId) -> RepoResult<BTreeSet<UserId>>;
}

/// SQLite-backed follow graph.
pub struct SqliteFollowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFollowRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[(
                "follow_edges",
                &["follower_uuid", "following_uuid", "created_at"],
            )],
        )?;
        Ok(Self { conn })
    }

    fn ensure_users_exist(&self, follower_id: UserId, following_id: UserId) -> RepoResult<()> {
        for id in [follower_id, following_id] {
            let exists: i64 = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE uuid = ?1);",
                [id.to_string()],
                |row| row.get(0),
            )?;
            if exists != 1 {
                return Err(RepoError::NotFound(id));
            }
        }
        Ok(())
    }

    fn edge_created_at(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> RepoResult<Option<i64>> {
        let created_at = self
            .conn
            .query_row(
                "SELECT created_at
                 FROM follow_edges
                 WHERE follower_uuid = ?1 AND following_uuid = ?2;",
                params![follower_id.to_string(), following_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(created_at)
    }
}

impl FollowRepository for SqliteFollowRepository<'_> {
    fn follow(&self, follower_id: UserId, following_id: UserId) -> RepoResult<FollowEdge> {
        self.ensure_users_exist(follower_id, following_id)?;

        if self.edge_created_at(follower_id, following_id)?.is_some() {
            return Err(RepoError::AlreadyExists(format!(
                "follow edge {follower_id} -> {following_id}"
            )));
        }

        self.conn.execute(
            "INSERT INTO follow_edges (follower_uuid, following_uuid)
             VALUES (?1, ?2);",
            params![follower_id.to_string(), following_id.to_string()],
        )?;

        let created_at = self
            .edge_created_at(follower_id, following_id)?
            .ok_or_else(|| {
                RepoError::InvalidData("follow edge missing immediately after insert".to_string())
            })?;

        Ok(FollowEdge {
            follower_id,
            following_id,
            created_at,
        })
    }

    fn unfollow(&self, follower_id: UserId, following_id: UserId) -> RepoResult<()> {
        self.ensure_users_exist(follower_id, following_id)?;

        let changed = self.conn.execute(
            "DELETE FROM follow_edges
             WHERE follower_uuid = ?1 AND following_uuid = ?2;",
            params![follower_id.to_string(), following_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFollowing {
                follower_id,
                following_id,
            });
        }

        Ok(())
    }

    fn following_set(&self, user_id: UserId) -> RepoResult<BTreeSet<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT following_uuid
             FROM follow_edges
             WHERE follower_uuid = ?1;",
        )?;

        let mut rows = stmt.query([user_id.to_string()])?;
        let mut following = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            following.insert(parse_uuid_column(&value, "follow_edges.following_uuid")?);
        }

        Ok(following)
    }
}
