use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostId, User};
use crate::error::RepoError;

/// User repository backing token issuance.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user. Fails with `RepoError::Constraint` when the email
    /// is already taken.
    async fn create(&self, user: User) -> Result<User, RepoError>;
}

/// Post repository - the persistence store for posts.
///
/// Implementations own every post record. Writes to the same id are
/// last-write-wins.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post, assigning its id and timestamps.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Find a post by id.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Overwrite the title and refresh `updated_at`.
    /// Fails with `RepoError::NotFound` when the id does not resolve.
    async fn update_title(&self, id: PostId, post: NewPost) -> Result<Post, RepoError>;

    /// Remove a post permanently.
    /// Fails with `RepoError::NotFound` when the id does not resolve.
    async fn delete(&self, id: PostId) -> Result<(), RepoError>;

    /// Every stored post, ordered by id.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;
}
