//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod routes;
mod services;

use crate::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let db_pool = db::connect(&config.database_url, config.db_max_connections).await?;
    tracing::info!(database = %config.database_url, "Database connection established");

    db::MIGRATOR.run(&db_pool).await?;
    tracing::info!("Database migrations applied");

    let bind_addr = config.bind_addr;
    let app = routes::build_router(AppState::new(db_pool, config));

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
