pub mod config;
pub mod database;
pub mod helpers;

pub use config::{DatabaseConfig, StoreConfig};
pub use database::folders::UpdateFolderOperations;
pub use database::{update, ContentValues, DatabaseError, LockableDatabase};
