//! User directory contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide profile CRUD over canonical `users` storage.
//! - Answer the referential-existence question the feed engine consumes.
//!
//! # Invariants
//! - `username` and `email` are unique across all profiles.
//! - Deleting a profile cascades its media, follow edges and viewed marks.

use crate::model::user::{User, UserId, UserUpdate};
use crate::repo::{ensure_connection_ready, parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT
    uuid,
    username,
    email,
    description,
    profile_pic
FROM users";

/// Repository interface for the user directory.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Applies a partial update and returns the stored profile.
    fn update_user(&self, id: UserId, update: &UserUpdate) -> RepoResult<User>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    fn user_exists(&self, id: UserId) -> RepoResult<bool>;
}

/// SQLite-backed user directory.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[(
                "users",
                &["uuid", "username", "email", "description", "profile_pic"],
            )],
        )?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        if username_taken(self.conn, &user.username, None)? {
            return Err(RepoError::AlreadyExists(format!(
                "username `{}`",
                user.username
            )));
        }
        if email_taken(self.conn, &user.email, None)? {
            return Err(RepoError::AlreadyExists(format!("email `{}`", user.email)));
        }

        self.conn.execute(
            "INSERT INTO users (uuid, username, email, description, profile_pic)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.to_string(),
                user.username,
                user.email,
                user.description,
                user.profile_pic,
            ],
        )?;

        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn update_user(&self, id: UserId, update: &UserUpdate) -> RepoResult<User> {
        let existing = self.get_user(id)?.ok_or(RepoError::NotFound(id))?;

        if let Some(username) = update.username.as_deref() {
            if username != existing.username && username_taken(self.conn, username, Some(id))? {
                return Err(RepoError::AlreadyExists(format!("username `{username}`")));
            }
        }
        if let Some(email) = update.email.as_deref() {
            if email != existing.email && email_taken(self.conn, email, Some(id))? {
                return Err(RepoError::AlreadyExists(format!("email `{email}`")));
            }
        }

        self.conn.execute(
            "UPDATE users
             SET
                username = COALESCE(?2, username),
                email = COALESCE(?3, email),
                description = COALESCE(?4, description),
                profile_pic = COALESCE(?5, profile_pic)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                update.username.as_deref(),
                update.email.as_deref(),
                update.description.as_deref(),
                update.profile_pic.as_deref(),
            ],
        )?;

        self.get_user(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn user_exists(&self, id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    Ok(User {
        id: parse_uuid_column(&uuid_text, "users.uuid")?,
        username: row.get("username")?,
        email: row.get("email")?,
        description: row.get("description")?,
        profile_pic: row.get("profile_pic")?,
    })
}

fn username_taken(conn: &Connection, username: &str, exclude: Option<UserId>) -> RepoResult<bool> {
    unique_field_taken(conn, "username", username, exclude)
}

fn email_taken(conn: &Connection, email: &str, exclude: Option<UserId>) -> RepoResult<bool> {
    unique_field_taken(conn, "email", email, exclude)
}

fn unique_field_taken(
    conn: &Connection,
    column: &str,
    value: &str,
    exclude: Option<UserId>,
) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(
                SELECT 1
                FROM users
                WHERE {column} = ?1
                  AND (?2 IS NULL OR uuid != ?2)
            );"
        ),
        params![value, exclude.map(|id| id.to_string())],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
