use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::posts::repo::{PgPostRepo, PostRepo};
use crate::storage::UploadStore;

/// Per-request context. Built once at start-up; cloning only bumps `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub posts: Arc<dyn PostRepo>,
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    /// Wires the Postgres repositories over an already connected pool.
    pub async fn init(config: AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let uploads = Arc::new(UploadStore::open(config.upload_dir.clone()).await?);
        Ok(Self::from_parts(
            Arc::new(config),
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgPostRepo::new(db)),
            uploads,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        posts: Arc<dyn PostRepo>,
        uploads: Arc<UploadStore>,
    ) -> Self {
        Self {
            config,
            users,
            posts,
            uploads,
        }
    }
}
