//! Domain entities - the core business objects.

mod user;

mod post;

pub use post::{NewPost, Post, PostId};
pub use user::{DEFAULT_ROLE, User, mask_email, normalize_email};
