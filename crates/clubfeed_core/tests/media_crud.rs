use clubfeed_core::db::open_db_in_memory;
use clubfeed_core::{
    Media, MediaRepository, MediaService, MediaUpdate, PublishMediaRequest, RepoError,
    SqliteMediaRepository, SqliteUserRepository, User, UserRepository,
};
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let owner = seeded_user(&conn, "alice");
    let repo = SqliteMediaRepository::try_new(&conn).unwrap();

    let media = Media::new(owner.id, "sunset", "over the bay", "sunset.jpg");
    let id = repo.create_media(&media).unwrap();

    let loaded = repo.get_media(id).unwrap().unwrap();
    assert_eq!(loaded, media);
}

#[test]
fn create_media_for_unknown_owner_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMediaRepository::try_new(&conn).unwrap();

    let orphan = Media::new(Uuid::new_v4(), "ghost", "", "ghost.jpg");
    let err = repo.create_media(&orphan).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == orphan.owner_id));
}

#[test]
fn partial_update_never_touches_owner_or_created_at() {
    let conn = open_db_in_memory().unwrap();
    let owner = seeded_user(&conn, "alice");
    let repo = SqliteMediaRepository::try_new(&conn).unwrap();

    let media = Media::new(owner.id, "draft", "first cut", "v1.mp4");
    repo.create_media(&media).unwrap();

    let updated = repo
        .update_media(
            media.id,
            &MediaUpdate {
                title: Some("final".to_string()),
                media_url: Some("v2.mp4".to_string()),
                ..MediaUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.title, "final");
    assert_eq!(updated.media_url, "v2.mp4");
    assert_eq!(updated.description, "first cut");
    assert_eq!(updated.owner_id, owner.id);
    assert_eq!(updated.created_at, media.created_at);
}

#[test]
fn update_and_delete_of_unknown_media_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMediaRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = repo
        .update_media(missing, &MediaUpdate::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));

    let err = repo.delete_media(missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn delete_removes_media() {
    let conn = open_db_in_memory().unwrap();
    let owner = seeded_user(&conn, "alice");
    let repo = SqliteMediaRepository::try_new(&conn).unwrap();

    let media = Media::new(owner.id, "temp", "", "temp.jpg");
    repo.create_media(&media).unwrap();
    repo.delete_media(media.id).unwrap();

    assert!(repo.get_media(media.id).unwrap().is_none());
}

#[test]
fn media_service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let owner = seeded_user(&conn, "alice");
    let repo = SqliteMediaRepository::try_new(&conn).unwrap();
    let service = MediaService::new(repo);

    let published = service
        .publish_media(&PublishMediaRequest {
            owner_id: owner.id,
            title: "from service".to_string(),
            description: String::new(),
            media_url: "svc.jpg".to_string(),
        })
        .unwrap();

    let fetched = service.get_media(published.id).unwrap().unwrap();
    assert_eq!(fetched, published);
}

fn seeded_user(conn: &rusqlite::Connection, name: &str) -> User {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    let user = User::new(name, format!("{name}@example.com"), "", "");
    repo.create_user(&user).unwrap();
    user
}
