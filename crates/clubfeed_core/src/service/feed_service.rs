//! Feed query engine: the select-then-mark page delivery use case.
//!
//! # Responsibility
//! - Compute the next page of unseen media from followed users.
//! - Commit delivered items to the viewed-state ledger before returning.
//! - Expose the boundary follow/unfollow operations.
//!
//! # Invariants
//! - Pagination is keyed on the immutable `(created_at, media_id)`
//!   ordering key, never on a row offset: the unseen set shrinks as pages
//!   are read, so any skip count computed against it would overshoot and
//!   silently drop items.
//! - Every unseen item is delivered exactly once across successive page
//!   requests: items already delivered sit at keys >= the cursor and are
//!   excluded by the viewed filter; items not yet delivered sit at keys
//!   < the cursor and remain reachable.
//! - `mark_viewed` is idempotent, so overlapping duplicate requests cannot
//!   corrupt the ledger.

use crate::model::feed::{FeedCursor, FeedPage};
use crate::model::follow::FollowEdge;
use crate::model::media::MediaId;
use crate::model::user::UserId;
use crate::repo::follow_repo::FollowRepository;
use crate::repo::media_repo::MediaRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::viewed_repo::ViewedRepository;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};
use std::collections::BTreeSet;
use std::time::Instant;

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Hard upper bound on requested page sizes.
pub const PAGE_SIZE_MAX: u32 = 50;

/// Pagination options for one feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    /// Token returned by the previous page; `None` requests the first page.
    pub cursor: Option<String>,
    /// Requested page size. Defaults to 10 and clamps to 50.
    pub page_size: Option<u32>,
}

/// Feed delivery engine over injected collaborators: the user directory,
/// follow graph, media catalog and viewed-state ledger.
pub struct FeedService<D, G, C, L>
where
    D: UserRepository,
    G: FollowRepository,
    C: MediaRepository,
    L: ViewedRepository,
{
    directory: D,
    graph: G,
    catalog: C,
    ledger: L,
}

impl<D, G, C, L> FeedService<D, G, C, L>
where
    D: UserRepository,
    G: FollowRepository,
    C: MediaRepository,
    L: ViewedRepository,
{
    /// Creates an engine from its four collaborators.
    pub fn new(directory: D, graph: G, catalog: C, ledger: L) -> Self {
        Self {
            directory,
            graph,
            catalog,
            ledger,
        }
    }

    /// Boundary follow operation.
    pub fn follow(&self, follower_id: UserId, following_id: UserId) -> RepoResult<FollowEdge> {
        let edge = self.graph.follow(follower_id, following_id)?;
        info!(
            "event=follow module=feed status=ok follower={follower_id} following={following_id}"
        );
        Ok(edge)
    }

    /// Boundary unfollow operation.
    pub fn unfollow(&self, follower_id: UserId, following_id: UserId) -> RepoResult<()> {
        self.graph.unfollow(follower_id, following_id)?;
        info!(
            "event=unfollow module=feed status=ok follower={follower_id} following={following_id}"
        );
        Ok(())
    }

    /// Delivers the next page of unseen media for `user_id` and records the
    /// returned items as viewed.
    ///
    /// # Contract
    /// - `NotFound` when the requesting user id is unknown.
    /// - `InvalidCursor` when a supplied cursor does not parse.
    /// - Empty page with `has_more=false` when the user follows no one or
    ///   everything eligible is already viewed.
    pub fn fetch_page(&self, user_id: UserId, query: &FeedQuery) -> RepoResult<FeedPage> {
        let started_at = Instant::now();

        if !self.directory.user_exists(user_id)? {
            return Err(RepoError::NotFound(user_id));
        }

        let cursor = query
            .cursor
            .as_deref()
            .map(FeedCursor::decode)
            .transpose()?;
        let page_size = normalize_page_size(query.page_size);

        let following = self.graph.following_set(user_id)?;
        if following.is_empty() {
            debug!("event=feed_page module=feed status=ok user={user_id} returned=0 reason=no_follows");
            return Ok(FeedPage::empty());
        }

        // Over-fetch by one to learn whether a further page exists without
        // a second scan.
        let mut items =
            self.catalog
                .media_by_owners(&following, user_id, cursor.as_ref(), page_size + 1)?;
        let has_more = items.len() as u32 > page_size;
        items.truncate(page_size as usize);

        let delivered: BTreeSet<MediaId> = items.iter().map(|media| media.id).collect();
        self.ledger.mark_viewed(user_id, &delivered)?;

        let next_cursor = items
            .last()
            .map(|media| FeedCursor::for_media(media).encode());

        info!(
            "event=feed_page module=feed status=ok user={user_id} returned={} has_more={has_more} duration_ms={}",
            items.len(),
            started_at.elapsed().as_millis()
        );

        Ok(FeedPage {
            items,
            next_cursor,
            has_more,
        })
    }
}

/// Normalizes requested page size according to the feed contract.
pub fn normalize_page_size(page_size: Option<u32>) -> u32 {
    match page_size {
        Some(0) => DEFAULT_PAGE_SIZE,
        Some(value) if value > PAGE_SIZE_MAX => PAGE_SIZE_MAX,
        Some(value) => value,
        None => DEFAULT_PAGE_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_page_size, DEFAULT_PAGE_SIZE, PAGE_SIZE_MAX};

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(normalize_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(0)), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(3)), 3);
        assert_eq!(normalize_page_size(Some(500)), PAGE_SIZE_MAX);
    }
}
