//! Database PKP core
//!
//! Records-management core for land certificates, the Tanah Garapan
//! register, user accounts, and attendance, with an append-only activity
//! log whose deletion snapshots drive soft-restore.

pub mod auth;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod operations;

pub use error::{CoreError, CoreResult};

use crate::config::AppConfig;
use crate::infrastructure::database::Database;
use anyhow::Result;
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use tracing::info;

/// The main context for all core operations
pub struct Core {
    /// Application configuration
    config: AppConfig,

    /// Database handle
    db: Database,
}

impl Core {
    /// Initialize the core at a data directory: load or create the config,
    /// open or create the database, and run pending migrations
    pub async fn open(data_dir: PathBuf) -> Result<Self> {
        info!("Initializing PKP core at {:?}", data_dir);

        let config = AppConfig::load_or_create(&data_dir)?;

        let db_path = config.database_path();
        let db = if db_path.exists() {
            Database::open(&db_path).await?
        } else {
            Database::create(&db_path).await?
        };
        db.migrate().await?;

        Ok(Self { config, db })
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the database connection for operation calls
    pub fn db(&self) -> &DatabaseConnection {
        self.db.conn()
    }
}

/// Install the global tracing subscriber, honoring `RUST_LOG`
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
