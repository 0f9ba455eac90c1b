use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::database::LockableDatabase;

/// Returns the path to the mailstore database
///
/// An explicit `path` in the config wins; otherwise the platform data directory is used.
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/mailstore/mailstore.db`
/// - **Linux**: `~/.local/share/mailstore/mailstore.db`
/// - **Windows**: `%LOCALAPPDATA%\mailstore\mailstore.db`
pub fn get_db_path(config: &DatabaseConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &config.path {
        return Ok(path.clone());
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("mailstore").join("mailstore.db"))
}

/// Open (creating and migrating if needed) the database described by `config`
pub fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<Arc<LockableDatabase>> {
    let db_path = get_db_path(config)?;

    let database = LockableDatabase::open(&db_path, config)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    Ok(Arc::new(database))
}
