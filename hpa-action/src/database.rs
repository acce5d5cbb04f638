//! Database management.
//!
//! The app context tree and the intent catalog tree live in one sled database. Both are
//! written by the placement surface; this controller reads the catalog and rewrites
//! manifest values held by app context resource handles.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sled::{Config as SledConfig, Db, IVec};

use crate::config::Config;

pub type Tree = sled::Tree;

/// The default path to use for data storage.
pub const DEFAULT_DATA_PATH: &str = "/usr/local/hpa-action/db";
/// The DB tree holding app contexts.
const TREE_APPCONTEXT: &str = "appcontext";
/// The DB tree holding the HPA intent catalog.
const TREE_CATALOG: &str = "catalog";

/// The default path to use for data storage.
pub fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}

/// An abstraction over the controller's database.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    /// System runtime config.
    #[allow(dead_code)]
    config: Arc<Config>,
    /// The underlying DB handle.
    db: Db,
}

impl Database {
    /// Open the database for usage.
    pub async fn new(config: Arc<Config>) -> Result<Self> {
        // Determine the database path, and ensure it exists.
        let dbpath = PathBuf::from(&config.storage_data_path);
        tokio::fs::create_dir_all(&dbpath).await.context("error creating dir for database")?;

        Self::spawn_blocking(move || -> Result<Self> {
            let db = SledConfig::new().path(dbpath).mode(sled::Mode::HighThroughput).open()?;
            let inner = Arc::new(DatabaseInner { config, db });
            Ok(Self { inner })
        })
        .await?
    }

    /// Spawn a blocking database-related function, mapping join failures to an error.
    pub async fn spawn_blocking<F, R>(f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        tokio::task::spawn_blocking(f).await.context("error joining blocking database task")
    }

    /// Get a handle to the DB tree holding app contexts.
    pub async fn get_appcontext_tree(&self) -> Result<Tree> {
        let (db, ivname) = (self.inner.db.clone(), IVec::from(TREE_APPCONTEXT));
        Self::spawn_blocking(move || -> Result<Tree> { Ok(db.open_tree(ivname)?) })
            .await
            .and_then(|res| res.with_context(|| format!("could not open DB tree {}", TREE_APPCONTEXT)))
    }

    /// Get a handle to the DB tree holding the intent catalog.
    pub async fn get_catalog_tree(&self) -> Result<Tree> {
        let (db, ivname) = (self.inner.db.clone(), IVec::from(TREE_CATALOG));
        Self::spawn_blocking(move || -> Result<Tree> { Ok(db.open_tree(ivname)?) })
            .await
            .and_then(|res| res.with_context(|| format!("could not open DB tree {}", TREE_CATALOG)))
    }
}
