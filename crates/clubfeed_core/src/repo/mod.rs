//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the user
//!   directory, media catalog, follow graph and viewed-state ledger.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository constructors verify schema readiness (`try_new`) before
//!   any query runs.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyExists`,
//!   `NotFollowing`, `InvalidCursor`) in addition to DB transport errors.

use crate::db::DbError;
use crate::model::feed::CursorError;
use crate::model::user::UserId;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod follow_repo;
pub mod media_repo;
pub mod user_repo;
pub mod viewed_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Referenced user/media/edge does not exist.
    NotFound(Uuid),
    /// Uniqueness violation: duplicate follow edge, username or email.
    AlreadyExists(String),
    /// Unfollow of an edge that is not present.
    NotFollowing {
        follower_id: UserId,
        following_id: UserId,
    },
    /// Malformed pagination token.
    InvalidCursor(String),
    /// Retryable lock/busy contention reported by the backing store.
    Conflict(String),
    /// Persisted state failed to parse back into a domain record.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "not found: {id}"),
            Self::AlreadyExists(detail) => write!(f, "already exists: {detail}"),
            Self::NotFollowing {
                follower_id,
                following_id,
            } => write!(f, "{follower_id} is not following {following_id}"),
            Self::InvalidCursor(token) => write!(f, "invalid feed cursor: `{token}`"),
            Self::Conflict(detail) => write!(f, "storage conflict (retryable): {detail}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, _) = &value {
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) {
                return Self::Conflict(value.to_string());
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<CursorError> for RepoError {
    fn from(value: CursorError) -> Self {
        Self::InvalidCursor(value.token)
    }
}

/// Verifies that a connection has been migrated and carries the tables and
/// columns a repository depends on.
///
/// Shared by all `try_new` constructors so a repository never runs against
/// a raw, unmigrated connection.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    requirements: &[(&'static str, &[&'static str])],
) -> RepoResult<()> {
    let expected_version = crate::db::migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in requirements {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for column in *columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

pub(crate) fn parse_uuid_column(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
