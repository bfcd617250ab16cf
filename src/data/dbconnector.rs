use std::path::PathBuf;

use anyhow::Context;
use log::{debug, info};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::data::configuration::{Configuration, DatabaseConfig};
use crate::data::migration::Migrator;
use crate::data::seed;
use crate::error::DirectoryError;

#[allow(async_fn_in_trait)]
pub trait DirectoryConnection {
    async fn connect(&mut self) -> Result<(), anyhow::Error>;
    async fn check(&self) -> Result<(), anyhow::Error>;
    async fn close(&self) -> Result<(), anyhow::Error>;
}

pub struct SQLConnector {
    url: String,
    data_dir: Option<PathBuf>,
    database_connection: Option<DatabaseConnection>,
}

impl SQLConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        SQLConnector {
            url: config.connection_url(),
            data_dir: config.url.is_none().then(|| PathBuf::from(&config.path)),
            database_connection: None,
        }
    }

    pub fn from_url(url: &str) -> Self {
        SQLConnector {
            url: url.to_string(),
            data_dir: None,
            database_connection: None,
        }
    }

    pub fn connection(&self) -> Result<&DatabaseConnection, DirectoryError> {
        self.database_connection
            .as_ref()
            .ok_or_else(|| DbErr::Custom("store is not connected".into()).into())
    }

    pub async fn is_initialized(&self) -> Result<bool, anyhow::Error> {
        let db = self.connection()?;
        let pending = Migrator::get_pending_migrations(db).await?;
        debug!("{} pending migration(s)", pending.len());
        Ok(pending.is_empty())
    }

    /// Applies pending migrations, then seeds an empty store when configured to.
    pub async fn initialize(&self, config: &Configuration) -> Result<(), anyhow::Error> {
        let db = self.connection()?;
        Migrator::up(db, None)
            .await
            .context("failed to apply migrations")?;
        info!("Database schema is up to date");

        if config.database.seed {
            self.seed().await?;
        }
        Ok(())
    }

    pub async fn seed(&self) -> Result<(), anyhow::Error> {
        if seed::seed_if_empty(self.connection()?).await? {
            info!("Seeded the sample directory");
        } else {
            debug!("Store already holds data, skipping seed");
        }
        Ok(())
    }
}

impl DirectoryConnection for SQLConnector {
    async fn connect(&mut self) -> Result<(), anyhow::Error> {
        if let Some(dir) = &self.data_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let mut opt = ConnectOptions::new(self.url.clone());
        if self.url.contains(":memory:") || self.url.contains("mode=memory") {
            // every pooled connection would open a separate memory database
            opt.max_connections(1).min_connections(1);
        }
        opt.sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .with_context(|| format!("failed to connect to {}", self.url))?;
        debug!("Connected to {}", self.url);

        self.database_connection = Some(db);
        Ok(())
    }
    async fn check(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            db.ping().await?;
        }
        Ok(())
    }
    async fn close(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            let db = db.clone();
            db.close().await?;
        }
        Ok(())
    }
}
