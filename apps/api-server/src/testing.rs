//! Shared fixtures for handler and middleware tests.

use std::sync::Arc;

use actix_web::http::header::{self, HeaderName};
use uuid::Uuid;

use posts_core::domain::Post;
use posts_core::ports::{PostRepository, TokenService};
use posts_core::validation::validate_post;
use posts_infra::{InMemoryPostRepository, InMemoryUserRepository, JwtConfig, JwtTokenService};

use crate::state::AppState;

const TEST_SECRET: &str = "test-secret";
const TEST_ISSUER: &str = "posts-api-test";

fn jwt_config(expiration_hours: i64) -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        expiration_hours,
        issuer: TEST_ISSUER.to_string(),
    }
}

/// In-memory application state plus handles for inspecting it.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<InMemoryPostRepository>,
    tokens: JwtTokenService,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryPostRepository::new());
        let state = AppState::with_stores(
            store.clone(),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(JwtTokenService::new(jwt_config(1))),
        );

        Self {
            state,
            store,
            tokens: JwtTokenService::new(jwt_config(1)),
        }
    }

    /// `Authorization` header for an arbitrary authenticated user.
    pub fn auth_header(&self) -> (HeaderName, String) {
        self.auth_header_for(Uuid::new_v4(), "tester@example.com")
    }

    pub fn auth_header_for(&self, user_id: Uuid, email: &str) -> (HeaderName, String) {
        let token = self
            .tokens
            .generate_token(user_id, email, vec!["user".to_string()])
            .expect("token");
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Header carrying a correctly signed token that expired two hours ago.
    pub fn expired_auth_header(&self) -> (HeaderName, String) {
        let token = JwtTokenService::new(jwt_config(-2))
            .generate_token(Uuid::new_v4(), "late@example.com", vec![])
            .expect("token");
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Store a post directly, bypassing HTTP.
    pub async fn seed_post(&self, title: &str) -> Post {
        let new_post = validate_post(&serde_json::json!({ "title": title })).expect("valid title");
        self.store.create(new_post).await.expect("seeded post")
    }
}

/// Build a test service with the full route table over `ctx.state`.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(|cfg| $ctx.state.register(cfg))
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}

pub(crate) use test_app;
