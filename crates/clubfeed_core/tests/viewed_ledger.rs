use clubfeed_core::db::open_db_in_memory;
use clubfeed_core::{
    Media, MediaRepository, SqliteMediaRepository, SqliteUserRepository, SqliteViewedRepository,
    User, UserRepository, ViewedRepository,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

#[test]
fn mark_viewed_records_marks_once() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::seed(&conn, 3);
    let ledger = SqliteViewedRepository::try_new(&conn).unwrap();

    let ids: BTreeSet<_> = fixture.media_ids.iter().copied().collect();
    let inserted = ledger.mark_viewed(fixture.viewer, &ids).unwrap();
    assert_eq!(inserted, 3);

    for id in &fixture.media_ids {
        assert!(ledger.is_viewed(fixture.viewer, *id).unwrap());
    }
    assert_eq!(ledger.marks_for_user(fixture.viewer).unwrap().len(), 3);
}

#[test]
fn marking_twice_with_overlap_equals_marking_the_union_once() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::seed(&conn, 4);
    let ledger = SqliteViewedRepository::try_new(&conn).unwrap();

    let first: BTreeSet<_> = fixture.media_ids[..3].iter().copied().collect();
    let second: BTreeSet<_> = fixture.media_ids[1..].iter().copied().collect();

    ledger.mark_viewed(fixture.viewer, &first).unwrap();
    let second_inserted = ledger.mark_viewed(fixture.viewer, &second).unwrap();
    // Only the one id outside the overlap is new.
    assert_eq!(second_inserted, 1);

    let marked: BTreeSet<_> = ledger
        .marks_for_user(fixture.viewer)
        .unwrap()
        .into_iter()
        .map(|mark| mark.media_id)
        .collect();
    let union: BTreeSet<_> = first.union(&second).copied().collect();
    assert_eq!(marked, union);
}

#[test]
fn remarking_does_not_duplicate_or_error() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::seed(&conn, 2);
    let ledger = SqliteViewedRepository::try_new(&conn).unwrap();

    let ids: BTreeSet<_> = fixture.media_ids.iter().copied().collect();
    ledger.mark_viewed(fixture.viewer, &ids).unwrap();
    let replay = ledger.mark_viewed(fixture.viewer, &ids).unwrap();
    assert_eq!(replay, 0);

    let row_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM viewed_media;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(row_count, 2);
}

#[test]
fn empty_mark_set_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::seed(&conn, 1);
    let ledger = SqliteViewedRepository::try_new(&conn).unwrap();

    let inserted = ledger
        .mark_viewed(fixture.viewer, &BTreeSet::new())
        .unwrap();
    assert_eq!(inserted, 0);
    assert!(ledger.marks_for_user(fixture.viewer).unwrap().is_empty());
}

#[test]
fn marks_are_scoped_per_user() {
    let conn = open_db_in_memory().unwrap();
    let fixture = Fixture::seed(&conn, 1);
    let ledger = SqliteViewedRepository::try_new(&conn).unwrap();

    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let other = User::new("other", "other@example.com", "", "");
    users.create_user(&other).unwrap();

    let ids: BTreeSet<_> = fixture.media_ids.iter().copied().collect();
    ledger.mark_viewed(fixture.viewer, &ids).unwrap();

    assert!(ledger
        .is_viewed(fixture.viewer, fixture.media_ids[0])
        .unwrap());
    assert!(!ledger.is_viewed(other.id, fixture.media_ids[0]).unwrap());
}

struct Fixture {
    viewer: clubfeed_core::UserId,
    media_ids: Vec<clubfeed_core::MediaId>,
}

impl Fixture {
    /// One viewer, one author, `count` media items owned by the author.
    fn seed(conn: &Connection, count: usize) -> Self {
        let users = SqliteUserRepository::try_new(conn).unwrap();
        let viewer = User::new("viewer", "viewer@example.com", "", "");
        let author = User::new("author", "author@example.com", "", "");
        users.create_user(&viewer).unwrap();
        users.create_user(&author).unwrap();

        let catalog = SqliteMediaRepository::try_new(conn).unwrap();
        let media_ids = (0..count)
            .map(|index| {
                let media = Media::new(author.id, format!("m{index}"), "", format!("m{index}.jpg"));
                catalog.create_media(&media).unwrap()
            })
            .collect();

        Self {
            viewer: viewer.id,
            media_ids,
        }
    }
}
