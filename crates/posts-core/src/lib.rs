//! # Posts Core
//!
//! The domain layer of the posts API.
//! This crate contains the post resource logic, the validation rules it
//! applies, and the ports that infrastructure must implement. It has zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
pub use services::PostService;
pub use validation::ValidationErrors;
