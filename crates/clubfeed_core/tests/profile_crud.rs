use clubfeed_core::db::open_db_in_memory;
use clubfeed_core::{
    CreateProfileRequest, ProfileService, RepoError, SqliteUserRepository, User, UserRepository,
    UserUpdate,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let user = User::new("alice", "alice@example.com", "hello", "alice.png");
    let id = repo.create_user(&user).unwrap();

    let loaded = repo.get_user(id).unwrap().unwrap();
    assert_eq!(loaded, user);
    assert!(repo.user_exists(id).unwrap());
}

#[test]
fn duplicate_username_and_email_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create_user(&User::new("alice", "alice@example.com", "", ""))
        .unwrap();

    let same_name = User::new("alice", "other@example.com", "", "");
    let err = repo.create_user(&same_name).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists(detail) if detail.contains("username")));

    let same_email = User::new("bob", "alice@example.com", "", "");
    let err = repo.create_user(&same_email).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists(detail) if detail.contains("email")));
}

#[test]
fn partial_update_keeps_absent_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let user = User::new("alice", "alice@example.com", "original", "alice.png");
    repo.create_user(&user).unwrap();

    let updated = repo
        .update_user(
            user.id,
            &UserUpdate {
                description: Some("updated".to_string()),
                ..UserUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.username, "alice");
    assert_eq!(updated.email, "alice@example.com");
    assert_eq!(updated.description, "updated");
    assert_eq!(updated.profile_pic, "alice.png");
}

#[test]
fn update_rejects_username_taken_by_another_user() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create_user(&User::new("alice", "alice@example.com", "", ""))
        .unwrap();
    let bob = User::new("bob", "bob@example.com", "", "");
    repo.create_user(&bob).unwrap();

    let err = repo
        .update_user(
            bob.id,
            &UserUpdate {
                username: Some("alice".to_string()),
                ..UserUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists(_)));

    // Re-asserting your own current username is not a conflict.
    let unchanged = repo
        .update_user(
            bob.id,
            &UserUpdate {
                username: Some("bob".to_string()),
                ..UserUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(unchanged.username, "bob");
}

#[test]
fn update_and_delete_of_unknown_user_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = repo.update_user(missing, &UserUpdate::default()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));

    let err = repo.delete_user(missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn delete_user_cascades_dependent_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let alice = User::new("alice", "alice@example.com", "", "");
    let bob = User::new("bob", "bob@example.com", "", "");
    repo.create_user(&alice).unwrap();
    repo.create_user(&bob).unwrap();

    conn.execute(
        "INSERT INTO media (uuid, owner_uuid, title, description, media_url, created_at)
         VALUES (?1, ?2, 'clip', '', 'clip.mp4', 1000);",
        [Uuid::new_v4().to_string(), bob.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO follow_edges (follower_uuid, following_uuid) VALUES (?1, ?2);",
        [alice.id.to_string(), bob.id.to_string()],
    )
    .unwrap();

    repo.delete_user(bob.id).unwrap();

    assert!(!repo.user_exists(bob.id).unwrap());
    assert_eq!(count_rows(&conn, "media"), 0);
    assert_eq!(count_rows(&conn, "follow_edges"), 0);
}

#[test]
fn profile_service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let service = ProfileService::new(repo);

    let created = service
        .create_profile(&CreateProfileRequest {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            description: "hi".to_string(),
            profile_pic: "carol.png".to_string(),
        })
        .unwrap();

    let fetched = service.get_profile(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    service.delete_profile(created.id).unwrap();
    assert!(service.get_profile(created.id).unwrap().is_none());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
