use std::sync::Arc;

use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::config::AppConfig;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self {
            db,
            config,
            sessions: SessionStore::default(),
        })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            config,
            sessions: SessionStore::default(),
        }
    }
}
