//! Post Store
//!
//! TigerStyle: Owns the post collection and checks authorship against the
//! user store. The author lookup and the insert are two separate critical
//! sections; since users are never deleted, a user seen by the lookup still
//! exists at insert time.
//!
//! Rules:
//! - `description` is required and non-blank, both on create and on update
//! - `authorId` must name an existing user at creation time
//! - `id`, `authorId` and `postDate` never change after creation

use crate::clock::Clock;
use crate::error::{require_non_blank, StoreError, StoreResult};
use crate::ids::{stored_id, IdSequence};
use crate::paging::{paginate, PageRequest, SortOrder};
use crate::users::UserStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// =============================================================================
// Types
// =============================================================================

/// A published post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned id, never reused
    pub id: u64,
    /// Id of the user who wrote the post
    pub author_id: u64,
    pub description: String,
    /// Set once at creation
    pub post_date: DateTime<Utc>,
}

/// Payload for creating a post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub author_id: Option<i64>,
    pub description: Option<String>,
}

/// Update addressed by `id`. Unlike users, `description` is mandatory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub id: Option<i64>,
    pub description: Option<String>,
}

// =============================================================================
// Post Store
// =============================================================================

#[derive(Debug, Default)]
struct PostTable {
    posts: BTreeMap<u64, Post>,
    ids: IdSequence,
}

/// Thread-safe in-memory post store
#[derive(Debug)]
pub struct PostStore {
    table: RwLock<PostTable>,
    users: Arc<UserStore>,
    clock: Arc<dyn Clock>,
}

impl PostStore {
    /// Create an empty store using the given clock
    pub fn with_clock(users: Arc<UserStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(PostTable::default()),
            users,
            clock,
        }
    }

    /// List posts sorted by post date, windowed by `page`
    pub async fn find_all(&self, order: SortOrder, page: PageRequest) -> Vec<Post> {
        let posts: Vec<Post> = self.table.read().await.posts.values().cloned().collect();
        paginate(posts, order, page, |p| p.post_date, |p| p.id)
    }

    /// Look up a post, failing with `NotFound` if absent
    pub async fn get_post_by_id(&self, id: u64) -> StoreResult<Post> {
        self.table
            .read()
            .await
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("post with id {} not found", id)))
    }

    /// Validate and publish a new post
    pub async fn create(&self, input: NewPost) -> StoreResult<Post> {
        let description = require_non_blank(
            input.description.as_deref(),
            "description",
            "description cannot be empty",
        )?;

        let raw_author_id = input
            .author_id
            .ok_or_else(|| StoreError::validation("authorId", "author id must be provided"))?;
        let author = match stored_id(raw_author_id) {
            Some(id) => self.users.find_by_id(id).await,
            None => None,
        };
        let Some(author) = author else {
            tracing::warn!(author_id = raw_author_id, "Rejected post from unknown author");
            return Err(StoreError::validation(
                "authorId",
                format!("author with id {} not found", raw_author_id),
            ));
        };
        let author_id = author.id;

        let mut table = self.table.write().await;
        let post = Post {
            id: table.ids.next_id(),
            author_id,
            description: description.to_string(),
            post_date: self.clock.now(),
        };
        table.posts.insert(post.id, post.clone());

        tracing::info!(post_id = post.id, author_id, "Created post");
        Ok(post)
    }

    /// Replace the description of an existing post
    pub async fn update(&self, patch: PostPatch) -> StoreResult<Post> {
        let raw_id = patch
            .id
            .ok_or_else(|| StoreError::validation("id", "id must be provided"))?;
        let id = stored_id(raw_id)
            .ok_or_else(|| StoreError::not_found(format!("post with id {} not found", raw_id)))?;

        let mut table = self.table.write().await;
        let post = table
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(format!("post with id {} not found", id)))?;

        let description = require_non_blank(
            patch.description.as_deref(),
            "description",
            "description cannot be empty",
        )?;
        post.description = description.to_string();

        tracing::debug!(post_id = id, "Updated post");
        Ok(post.clone())
    }

    /// Number of stored posts
    pub async fn count(&self) -> usize {
        self.table.read().await.posts.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::users::NewUser;
    use chrono::{Duration, TimeZone};

    struct Fixture {
        clock: Arc<ManualClock>,
        posts: PostStore,
        author_id: u64,
    }

    async fn fixture() -> Fixture {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::at(start));
        let users = Arc::new(UserStore::with_clock(clock.clone()));
        let author = users
            .create(NewUser {
                username: Some("whiskers".to_string()),
                email: Some("whiskers@example.com".to_string()),
                password: Some("meow".to_string()),
            })
            .await
            .unwrap();

        Fixture {
            posts: PostStore::with_clock(users, clock.clone()),
            clock,
            author_id: author.id,
        }
    }

    fn new_post(author_id: u64, description: &str) -> NewPost {
        NewPost {
            author_id: Some(author_id as i64),
            description: Some(description.to_string()),
        }
    }

    fn page(size: i64, from: i64) -> PageRequest {
        PageRequest::new(size, from).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_roundtrip() {
        let f = fixture().await;

        let created = f.posts.create(new_post(f.author_id, "first nap")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.author_id, f.author_id);
        assert_eq!(created.post_date, f.clock.now());

        let fetched = f.posts.get_post_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_requires_description() {
        let f = fixture().await;

        for description in [None, Some(""), Some("   ")] {
            let err = f
                .posts
                .create(NewPost {
                    author_id: Some(f.author_id as i64),
                    description: description.map(str::to_string),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "description"));
        }
        assert_eq!(f.posts.count().await, 0);
    }

    #[tokio::test]
    async fn test_create_requires_known_author() {
        let f = fixture().await;

        for unknown in [999, 0, -5] {
            let err = f
                .posts
                .create(NewPost { author_id: Some(unknown), description: Some("ghost".to_string()) })
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "authorId"));
        }

        let err = f
            .posts
            .create(NewPost { author_id: None, description: Some("anon".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "authorId"));

        assert_eq!(f.posts.count().await, 0);
    }

    #[tokio::test]
    async fn test_find_all_sorts_and_windows_by_date() {
        let f = fixture().await;

        let t1 = f.posts.create(new_post(f.author_id, "t1")).await.unwrap();
        f.clock.advance(Duration::seconds(10));
        let t2 = f.posts.create(new_post(f.author_id, "t2")).await.unwrap();
        f.clock.advance(Duration::seconds(10));
        let t3 = f.posts.create(new_post(f.author_id, "t3")).await.unwrap();

        let asc = f.posts.find_all(SortOrder::Ascending, page(2, 0)).await;
        assert_eq!(asc, vec![t1.clone(), t2.clone()]);

        let desc = f.posts.find_all(SortOrder::Descending, page(2, 0)).await;
        assert_eq!(desc, vec![t3.clone(), t2.clone()]);

        let tail = f.posts.find_all(SortOrder::Descending, page(2, 2)).await;
        assert_eq!(tail, vec![t1]);

        let beyond = f.posts.find_all(SortOrder::Ascending, page(5, 3)).await;
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_description() {
        let f = fixture().await;
        let created = f.posts.create(new_post(f.author_id, "draft")).await.unwrap();
        f.clock.advance(Duration::hours(1));

        let updated = f
            .posts
            .update(PostPatch {
                id: Some(created.id as i64),
                description: Some("final".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.description, "final");
        assert_eq!(updated.post_date, created.post_date);
        assert_eq!(updated.author_id, created.author_id);
        assert_eq!(f.posts.get_post_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_failures() {
        let f = fixture().await;
        let created = f.posts.create(new_post(f.author_id, "keep me")).await.unwrap();

        let err = f
            .posts
            .update(PostPatch { id: None, description: Some("x".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "id"));

        let err = f
            .posts
            .update(PostPatch { id: Some(404), description: Some("x".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = f
            .posts
            .update(PostPatch { id: Some(-1), description: Some("x".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = f
            .posts
            .update(PostPatch { id: Some(created.id as i64), description: Some(" ".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "description"));

        assert_eq!(f.posts.get_post_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let f = fixture().await;
        assert!(matches!(
            f.posts.get_post_by_id(7).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
