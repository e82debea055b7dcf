// SPDX-License-Identifier: AGPL-3.0-or-later

//! Persistent storage for certificate elements supporting both PostgreSQL and SQLite databases.
//!
//! The main interface is [`SqlStore`] which offers typed access onto the base element table, the
//! seven element variant tables and the shared text properties table.
use std::sync::Arc;

use anyhow::{bail, Error, Result};
use sqlx::any::{Any, AnyKind, AnyPool, AnyPoolOptions};
use sqlx::migrate::{MigrateDatabase, Migrator};

use crate::config::Configuration;
use crate::observer::{LogObserver, StoreObserver};
use crate::storage::StorageService;

pub mod errors;
pub mod models;
pub mod stores;
pub mod traits;
pub mod types;
mod utils;

static SQLITE_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/sqlite");

static POSTGRES_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/postgres");

/// SQL based persistent storage for certificate elements.
#[derive(Clone, Debug)]
pub struct SqlStore {
    pub(crate) pool: Pool,

    /// Blob storage consulted when validating file references.
    pub(crate) storage: Arc<dyn StorageService>,

    /// Receives an event for every committed write.
    pub(crate) observer: Arc<dyn StoreObserver>,
}

impl SqlStore {
    /// Create a new `SqlStore` using the provided db `Pool` and storage service.
    ///
    /// Events are forwarded to the `log` facade, use [`SqlStore::with_observer`] to replace it.
    pub fn new(pool: Pool, storage: Arc<dyn StorageService>) -> Self {
        Self {
            pool,
            storage,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replaces the observer receiving store events.
    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Makes sure the database is created and migrated before returning a ready store.
    pub async fn connect(config: &Configuration, storage: Arc<dyn StorageService>) -> Result<Self> {
        create_database(&config.database_url).await?;
        let pool = connection_pool(&config.database_url, config.database_max_connections).await?;
        run_pending_migrations(&pool).await?;

        Ok(Self::new(pool, storage))
    }

    /// Closes all connections of the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Re-export of generic connection pool type.
pub type Pool = AnyPool;

/// Create database when not existing.
pub async fn create_database(url: &str) -> Result<()> {
    if !Any::database_exists(url).await? {
        Any::create_database(url).await?;
    }

    Ok(())
}

/// Create a database agnostic connection pool.
pub async fn connection_pool(url: &str, max_connections: u32) -> Result<Pool, Error> {
    let pool: Pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Run any pending database migrations from inside the application.
///
/// Auto-incrementing keys are declared differently in SQLite and PostgreSQL, so each backend has
/// its own set of migrations.
pub async fn run_pending_migrations(pool: &Pool) -> Result<()> {
    match pool.any_kind() {
        AnyKind::Sqlite => SQLITE_MIGRATIONS.run(pool).await?,
        AnyKind::Postgres => POSTGRES_MIGRATIONS.run(pool).await?,
        #[allow(unreachable_patterns)]
        kind => bail!("Unsupported database backend {:?}", kind),
    }

    Ok(())
}
