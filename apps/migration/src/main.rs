//! Migration CLI tool: `migration up`, `down`, `fresh`, `status`, ...

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    tracing::info!("Running posts schema migrations");
    cli::run_cli(migration::Migrator).await;
}
