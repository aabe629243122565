use crate::admin::repo::{AdminStore, PgAdminStore};
use crate::auth::repo::{AccountStore, PgAccountStore};
use crate::company::repo::{CompanyStore, PgCompanyStore};
use crate::config::AppConfig;
use crate::content::repo::{ContentStore, PgContentStore};
use crate::jobs::repo::{JobStore, PgJobStore};
use crate::mailer::{LogMailer, Mailer};
use crate::storage::{Storage, StorageClient};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub accounts: Arc<dyn AccountStore>,
    pub admin: Arc<dyn AdminStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub jobs: Arc<dyn JobStore>,
    pub content: Arc<dyn ContentStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        let storage = Arc::new(Storage::new(&config.storage).await?) as Arc<dyn StorageClient>;

        Ok(Self {
            accounts: Arc::new(PgAccountStore::new(db.clone())),
            admin: Arc::new(PgAdminStore::new(db.clone())),
            companies: Arc::new(PgCompanyStore::new(db.clone())),
            jobs: Arc::new(PgJobStore::new(db.clone())),
            content: Arc::new(PgContentStore::new(db.clone())),
            mailer: Arc::new(LogMailer),
            db,
            config,
            storage,
        })
    }

    /// State wired to in-memory stores. The pool is lazy and never connects.
    #[cfg(test)]
    pub fn fake() -> Self {
        crate::test_support::Harness::new().state
    }
}
