//! # Posts API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

#[cfg(test)]
mod testing;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);
    config.warn_on_insecure_defaults();

    tracing::info!(
        service = %config.telemetry.service_name,
        "Starting Posts API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    tracing::info!(storage = state.storage.as_str(), "Storage ready");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            // Registered last so it runs first and its span encloses the rest
            .wrap(RequestIdMiddleware)
            .configure(|cfg| state.register(cfg))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
