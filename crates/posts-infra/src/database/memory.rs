//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use posts_core::domain::{NewPost, Post, PostId, User};
use posts_core::error::RepoError;
use posts_core::ports::{PostRepository, UserRepository};

struct PostTable {
    rows: BTreeMap<PostId, Post>,
    /// Last id handed out. Ids are never reused, even after a delete.
    last_id: PostId,
}

/// In-memory post store backed by an ordered map behind an async RwLock.
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PostTable {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    /// Whether a row with this id is stored.
    pub async fn contains(&self, id: PostId) -> bool {
        self.table.read().await.rows.contains_key(&id)
    }

    /// Whether any stored row has exactly this title.
    pub async fn contains_title(&self, title: &str) -> bool {
        self.table
            .read()
            .await
            .rows
            .values()
            .any(|post| post.title == title)
    }

    /// Stored titles in id order.
    pub async fn list_titles(&self) -> Vec<String> {
        self.table
            .read()
            .await
            .rows
            .values()
            .map(|post| post.title.clone())
            .collect()
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;

        table.last_id += 1;
        let post = Post::stored(table.last_id, post, Utc::now());
        table.rows.insert(post.id, post.clone());

        tracing::debug!(post_id = post.id, "Post stored in memory");
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update_title(&self, id: PostId, post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let stored = table.rows.get_mut(&id).ok_or(RepoError::NotFound)?;

        stored.retitle(post.into_title(), Utc::now());
        Ok(stored.clone())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }
}

/// In-memory user store keyed by id, with a case-insensitive email index.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}
