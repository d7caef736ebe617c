//! Application services - the operations exposed over HTTP.

mod post_service;

pub use post_service::PostService;
