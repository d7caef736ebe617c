//! Post resource operations: create, show, update, delete, list.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{Post, PostId};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;
use crate::validation::validate_post;

const ENTITY: &str = "Post";

/// Stateless post resource handler.
///
/// Callers are expected to have passed authentication already. Payloads are
/// validated here before any write reaches the repository.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// All stored posts.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.list_all().await?)
    }

    /// Validate `payload` and persist a new post.
    pub async fn create(&self, payload: &Value) -> Result<Post, DomainError> {
        let new_post = validate_post(payload)?;
        Ok(self.repo.create(new_post).await?)
    }

    /// Look up a single post.
    pub async fn show(&self, id: PostId) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    /// Replace the title of an existing post.
    ///
    /// The id is resolved before the payload is validated, so an unknown id
    /// reports `NotFound` even when the payload is also invalid.
    pub async fn update(&self, id: PostId, payload: &Value) -> Result<Post, DomainError> {
        self.show(id).await?;
        let new_post = validate_post(payload)?;

        self.repo
            .update_title(id, new_post)
            .await
            .map_err(|e| not_found_as(e, id))
    }

    /// Remove a post permanently.
    pub async fn delete(&self, id: PostId) -> Result<(), DomainError> {
        self.repo.delete(id).await.map_err(|e| not_found_as(e, id))
    }
}

fn not_found_as(err: RepoError, id: PostId) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found(ENTITY, id),
        other => other.into(),
    }
}
