//! Authentication handlers.

use actix_web::{HttpResponse, web};
use serde::de::DeserializeOwned;

use posts_core::domain::{User, mask_email, normalize_email};
use posts_core::validation::{FieldRules, LOGIN_RULES, REGISTER_RULES, validate};
use posts_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use super::json_payload;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.email, user.roles())?;
    let expires_in = u64::try_from(state.tokens.expiration_seconds()).unwrap_or(0);

    Ok(AuthResponse::bearer(token, expires_in))
}

/// Parse and validate a body, then read it as `T`.
fn validated<T: DeserializeOwned>(body: &[u8], rules: &[FieldRules]) -> AppResult<T> {
    let payload = json_payload(body)?;
    validate(&payload, rules).map_err(AppError::Validation)?;

    serde_json::from_value(payload).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// POST /api/auth/register
pub async fn register(state: web::Data<AppState>, body: web::Bytes) -> AppResult<HttpResponse> {
    let req: RegisterUserRequest = validated(&body, REGISTER_RULES)?;
    let email = normalize_email(&req.email);

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state.users.create(User::new(email, password_hash)).await?;

    tracing::info!(user_id = %user.id, email = %mask_email(&user.email), "User registered");
    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(state: web::Data<AppState>, body: web::Bytes) -> AppResult<HttpResponse> {
    let req: LoginRequest = validated(&body, LOGIN_RULES)?;

    let user = state
        .users
        .find_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(email = %mask_email(&req.email), "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    // A valid token for a user that no longer exists
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id.to_string(),
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
    }))
}
