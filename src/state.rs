use crate::auth::{JwtKeys, PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::products::{PgProductStore, ProductStore};
use crate::storage::{Storage, StorageClient};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    /// Connects to Postgres, applies migrations and sets up the media client.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        let storage = Arc::new(Storage::new(&config.media).await) as Arc<dyn StorageClient>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgProductStore::new(db)),
            storage,
        ))
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        Self {
            keys: JwtKeys::new(&config.jwt),
            config: Arc::new(config),
            users,
            products,
            storage,
        }
    }
}
