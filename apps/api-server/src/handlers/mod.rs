//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;
use serde_json::{Map, Value};

use crate::middleware::auth::AuthGate;
use crate::middleware::error::{AppError, AppResult};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post resource - every route requires a bearer token
            .service(
                web::scope("/posts")
                    .wrap(AuthGate)
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::store))
                    .route("/{id}", web::get().to(posts::show))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::patch().to(posts::update))
                    .route("/{id}", web::delete().to(posts::destroy)),
            ),
    );
}

/// Parse a request body into a JSON object for validation.
///
/// An empty body is an empty object, so missing fields surface as
/// validation errors instead of parse errors.
pub(crate) fn json_payload(body: &[u8]) -> AppResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!("Malformed JSON body: {e}"))),
    }
}
