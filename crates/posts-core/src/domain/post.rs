use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post identifier, assigned by the persistence store.
pub type PostId = i64;

/// Post entity - a titled record with timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a freshly stored post with both timestamps set to `now`.
    pub fn stored(id: PostId, new: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the title and refresh `updated_at`.
    pub fn retitle(&mut self, title: String, now: DateTime<Utc>) {
        self.title = title;
        self.updated_at = now;
    }
}

/// A post that passed validation and is waiting to be persisted.
///
/// Only [`crate::validation`] hands these out, so a `NewPost` always
/// carries a non-empty title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
}

impl NewPost {
    pub(crate) fn new(title: String) -> Self {
        Self { title }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn into_title(self) -> String {
        self.title
    }
}
