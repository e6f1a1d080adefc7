use std::sync::Arc;

use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions};

use crate::config::AppConfig;
use crate::logs::repo::{LogStore, MemoryLogStore, PgLogStore};
use crate::members::repo::{MemberDirectory, MemoryMemberDirectory, PgMemberDirectory};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub logs: Arc<dyn LogStore>,
    pub members: Arc<dyn MemberDirectory>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let Some(database_url) = config.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            return Ok(Self::in_memory(config));
        };

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url)
            .await
            .context("connect to database")?;

        MIGRATOR.run(&db).await.context("run migrations")?;

        Ok(Self::from_parts(
            config,
            Arc::new(PgLogStore::new(db.clone())),
            Arc::new(PgMemberDirectory::new(db)),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        logs: Arc<dyn LogStore>,
        members: Arc<dyn MemberDirectory>,
    ) -> Self {
        Self {
            config,
            logs,
            members,
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(MemoryLogStore::new()),
            Arc::new(MemoryMemberDirectory::new()),
        )
    }
}
