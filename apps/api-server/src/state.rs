//! Application state - shared across all handlers.

use std::sync::Arc;

use actix_web::web;

use posts_core::PostService;
use posts_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use posts_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use posts_infra::database::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;
use crate::middleware::error::AppError;

/// Which persistence store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    InMemory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::InMemory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub storage: StorageBackend,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        #[cfg(feature = "postgres")]
        if let Some(db_config) = config.database.as_ref() {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    let posts = Arc::new(PostgresPostRepository::new(conn.main.clone()));
                    let users = Arc::new(PostgresUserRepository::new(conn.main.clone()));

                    let mut state = Self::with_stores(posts, users, tokens);
                    state.storage = StorageBackend::Postgres;
                    state.db = Some(conn);

                    tracing::info!("Application state initialized (postgres)");
                    return state;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory repositories");

        tracing::info!("Application state initialized (in-memory)");
        Self::with_stores(
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            tokens,
        )
    }

    /// Assemble state around the given stores, hashing passwords with Argon2.
    pub fn with_stores(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            posts: PostService::new(posts),
            users,
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            storage: StorageBackend::InMemory,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Register the state and extractor configuration on an app or scope.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.clone()))
            .app_data(web::PathConfig::default().error_handler(|_err, req| {
                AppError::NotFound(format!("No resource at {}", req.path())).into()
            }));
    }
}
