mod app;
mod auth;
mod config;
mod db;
mod error;
mod images;
mod posts;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "cinephile=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        auth_mode = ?config.auth_mode,
        upload_dir = %config.upload_dir.display(),
        "starting"
    );

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let state = AppState::init(config, db.clone()).await?;
    let served = app::serve(app::build_app(state), app::shutdown_signal()).await;

    db.close().await;
    tracing::info!("database pool closed");
    served
}
