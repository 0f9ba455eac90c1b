use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use shared_types::{FolderClass, FolderDetails, FolderType, MoreMessages};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use mailstore::config::StoreConfig;
use mailstore::helpers::database::{get_db_path, initialize_database};
use mailstore::UpdateFolderOperations;

#[derive(Parser, Debug)]
#[command(author, version, about = "Change stored folder settings", long_about = None)]
struct Args {
    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and apply migrations
    Init,
    /// Rename a folder and set its type, looked up by server id
    ChangeFolder {
        server_id: String,
        name: String,
        #[arg(long = "type", default_value = "regular")]
        folder_type: FolderType,
    },
    /// Apply a folder settings snapshot (JSON) read from a file or stdin
    UpdateSettings {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Include or exclude a folder from the unified inbox
    SetUnifiedInbox {
        folder_id: i64,
        #[arg(action = ArgAction::Set, value_name = "true|false")]
        enabled: bool,
    },
    /// Enable or disable syncing a folder
    SetSync {
        folder_id: i64,
        #[arg(action = ArgAction::Set, value_name = "true|false")]
        enabled: bool,
    },
    /// Enable or disable push for a folder
    SetPush {
        folder_id: i64,
        #[arg(action = ArgAction::Set, value_name = "true|false")]
        enabled: bool,
    },
    /// Enable or disable new-mail notifications for a folder
    SetNotifications {
        folder_id: i64,
        #[arg(action = ArgAction::Set, value_name = "true|false")]
        enabled: bool,
    },
    /// Set the display class (no-class, inherited, first-class, second-class)
    SetDisplayClass {
        folder_id: i64,
        display_class: FolderClass,
    },
    /// Record whether the server holds more messages (unknown, false, true)
    SetMoreMessages {
        folder_id: i64,
        state: MoreMessages,
    },
    /// Set the last-checked time in epoch millis (defaults to now)
    SetLastChecked {
        folder_id: i64,
        timestamp: Option<i64>,
    },
    /// Set the status message; without a message the status is cleared
    SetStatus {
        folder_id: i64,
        status: Option<String>,
    },
    /// Set how many messages are shown for a folder
    SetVisibleLimit {
        folder_id: i64,
        limit: i32,
    },
    /// Turn push off for every folder
    DisablePush,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Held until the end of main so buffered log lines are flushed
    let _log_guard = if let Some(log_path) = &args.log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("mailstore.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        None
    };

    let mut config = match &args.config {
        Some(path) => StoreConfig::load_from(path),
        None => StoreConfig::load().map(|(config, _)| config),
    }
    .context("Failed to load config")?;

    if let Some(path) = args.database {
        config.database.path = Some(path);
    }

    let database = initialize_database(&config.database)?;
    let operations = UpdateFolderOperations::new(database);

    match args.command {
        Command::Init => {
            tracing::info!(
                "Database ready at {}",
                get_db_path(&config.database)?.display()
            );
        }
        Command::ChangeFolder {
            server_id,
            name,
            folder_type,
        } => operations.change_folder(&server_id, &name, folder_type)?,
        Command::UpdateSettings { file } => {
            let details = read_folder_details(file)?;
            operations.update_folder_settings(&details)?;
        }
        Command::SetUnifiedInbox { folder_id, enabled } => {
            operations.set_include_in_unified_inbox(folder_id, enabled)?
        }
        Command::SetSync { folder_id, enabled } => {
            operations.set_sync_enabled(folder_id, enabled)?
        }
        Command::SetPush { folder_id, enabled } => {
            operations.set_push_enabled(folder_id, enabled)?
        }
        Command::SetNotifications { folder_id, enabled } => {
            operations.set_notifications_enabled(folder_id, enabled)?
        }
        Command::SetDisplayClass {
            folder_id,
            display_class,
        } => operations.set_display_class(folder_id, display_class)?,
        Command::SetMoreMessages { folder_id, state } => {
            operations.set_more_messages(folder_id, state)?
        }
        Command::SetLastChecked {
            folder_id,
            timestamp,
        } => {
            let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
            operations.set_last_checked(folder_id, timestamp)?
        }
        Command::SetStatus { folder_id, status } => {
            operations.set_status(folder_id, status.as_deref())?
        }
        Command::SetVisibleLimit { folder_id, limit } => {
            operations.set_visible_limit(folder_id, limit)?
        }
        Command::DisablePush => operations.set_push_disabled()?,
    }

    Ok(())
}

fn read_folder_details(file: Option<PathBuf>) -> anyhow::Result<FolderDetails> {
    let json = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read folder settings from stdin")?;
            json
        }
    };

    serde_json::from_str(&json).context("Invalid folder settings JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_every_subcommand_has_help_text() {
        Args::command().debug_assert();

        let command = Args::command();
        for subcommand in command.get_subcommands() {
            assert!(
                subcommand.get_about().is_some(),
                "{} has no help text",
                subcommand.get_name()
            );
        }
    }
}
