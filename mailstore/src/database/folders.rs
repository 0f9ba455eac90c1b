use shared_types::{FolderClass, FolderDetails, FolderType, MoreMessages};
use std::sync::Arc;

use super::{update, ContentValues, LockableDatabase, Result};

const FOLDERS_TABLE: &str = "folders";

/// Writes folder settings to the `folders` table.
///
/// Every operation issues a single `UPDATE` inside a non-exclusive unit of work.
/// An id or server id that matches no row is not an error.
#[derive(Clone)]
pub struct UpdateFolderOperations {
    database: Arc<LockableDatabase>,
}

impl UpdateFolderOperations {
    pub fn new(database: Arc<LockableDatabase>) -> Self {
        Self { database }
    }

    /// Rename a folder and change its type, looked up by server id
    pub fn change_folder(
        &self,
        server_id: &str,
        name: &str,
        folder_type: FolderType,
    ) -> Result<()> {
        let mut values = ContentValues::new();
        values
            .put("name", name.to_string())
            .put("type", folder_type.to_database_folder_type().to_string());

        let rows = self.database.execute(false, |conn| {
            update(conn, FOLDERS_TABLE, &values, Some("server_id = ?"), &[&server_id])
        })?;
        tracing::debug!(server_id, rows, "Changed folder name and type");

        Ok(())
    }

    pub fn update_folder_settings(&self, details: &FolderDetails) -> Result<()> {
        let mut values = ContentValues::new();
        values
            .put("top_group", details.is_in_top_group)
            .put("integrate", details.is_integrate)
            .put("sync_enabled", details.is_sync_enabled)
            .put("display_class", details.display_class.name().to_string())
            .put("notifications_enabled", details.is_notifications_enabled)
            .put("push_enabled", details.is_push_enabled);

        self.update_folder(details.folder.id, &values)
    }

    pub fn set_include_in_unified_inbox(&self, folder_id: i64, include: bool) -> Result<()> {
        self.set_boolean(folder_id, "integrate", include)
    }

    pub fn set_display_class(&self, folder_id: i64, folder_class: FolderClass) -> Result<()> {
        self.set_string(folder_id, "display_class", Some(folder_class.name()))
    }

    pub fn set_sync_enabled(&self, folder_id: i64, enable: bool) -> Result<()> {
        self.set_boolean(folder_id, "sync_enabled", enable)
    }

    pub fn set_push_enabled(&self, folder_id: i64, enable: bool) -> Result<()> {
        self.set_boolean(folder_id, "push_enabled", enable)
    }

    pub fn set_notifications_enabled(&self, folder_id: i64, enable: bool) -> Result<()> {
        self.set_boolean(folder_id, "notifications_enabled", enable)
    }

    pub fn set_more_messages(&self, folder_id: i64, more_messages: MoreMessages) -> Result<()> {
        self.set_string(folder_id, "more_messages", Some(more_messages.database_name()))
    }

    /// Record when the folder was last checked for new mail (epoch millis)
    pub fn set_last_checked(&self, folder_id: i64, timestamp: i64) -> Result<()> {
        let mut values = ContentValues::new();
        values.put("last_updated", timestamp);

        self.update_folder(folder_id, &values)
    }

    /// Set the status message, or clear it with `None`
    pub fn set_status(&self, folder_id: i64, status: Option<&str>) -> Result<()> {
        self.set_string(folder_id, "status", status)
    }

    pub fn set_visible_limit(&self, folder_id: i64, visible_limit: i32) -> Result<()> {
        let mut values = ContentValues::new();
        values.put("visible_limit", visible_limit);

        self.update_folder(folder_id, &values)
    }

    /// Turn push off for every folder
    pub fn set_push_disabled(&self) -> Result<()> {
        let mut values = ContentValues::new();
        values.put("push_enabled", false);

        let rows = self
            .database
            .execute(false, |conn| update(conn, FOLDERS_TABLE, &values, None, &[]))?;
        tracing::debug!(rows, "Disabled push for all folders");

        Ok(())
    }

    fn set_string(&self, folder_id: i64, column: &str, value: Option<&str>) -> Result<()> {
        let mut values = ContentValues::new();
        match value {
            Some(value) => values.put(column, value.to_string()),
            None => values.put_null(column),
        };

        self.update_folder(folder_id, &values)
    }

    fn set_boolean(&self, folder_id: i64, column: &str, value: bool) -> Result<()> {
        let mut values = ContentValues::new();
        values.put(column, value);

        self.update_folder(folder_id, &values)
    }

    fn update_folder(&self, folder_id: i64, values: &ContentValues) -> Result<()> {
        let rows = self.database.execute(false, |conn| {
            update(conn, FOLDERS_TABLE, values, Some("id = ?"), &[&folder_id])
        })?;
        tracing::debug!(folder_id, rows, "Updated folder settings");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{insert_folder, open_temp_database};
    use shared_types::Folder;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq)]
    struct FolderRow {
        server_id: Option<String>,
        name: String,
        folder_type: String,
        top_group: bool,
        integrate: bool,
        sync_enabled: bool,
        display_class: String,
        notifications_enabled: bool,
        push_enabled: bool,
        more_messages: String,
        last_updated: Option<i64>,
        status: Option<String>,
        visible_limit: i64,
    }

    fn setup() -> (TempDir, Arc<LockableDatabase>, UpdateFolderOperations) {
        let (dir, database) = open_temp_database();
        let database = Arc::new(database);
        insert_folder(&database, 1, "INBOX", "Inbox");
        insert_folder(&database, 2, "Archive", "Archive");

        let operations = UpdateFolderOperations::new(database.clone());
        (dir, database, operations)
    }

    fn load_row(database: &LockableDatabase, id: i64) -> FolderRow {
        database
            .execute(false, |conn| {
                Ok(conn.query_row(
                    "SELECT server_id, name, type, top_group, integrate, sync_enabled, display_class,
                            notifications_enabled, push_enabled, more_messages, last_updated, status,
                            visible_limit
                     FROM folders WHERE id = ?",
                    [id],
                    |row| {
                        Ok(FolderRow {
                            server_id: row.get(0)?,
                            name: row.get(1)?,
                            folder_type: row.get(2)?,
                            top_group: row.get(3)?,
                            integrate: row.get(4)?,
                            sync_enabled: row.get(5)?,
                            display_class: row.get(6)?,
                            notifications_enabled: row.get(7)?,
                            push_enabled: row.get(8)?,
                            more_messages: row.get(9)?,
                            last_updated: row.get(10)?,
                            status: row.get(11)?,
                            visible_limit: row.get(12)?,
                        })
                    },
                )?)
            })
            .unwrap()
    }

    fn count_rows(database: &LockableDatabase) -> i64 {
        database
            .execute(false, |conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM folders", [], |row| row.get(0))?)
            })
            .unwrap()
    }

    #[test]
    fn test_change_folder_by_server_id() {
        let (_dir, database, operations) = setup();
        let untouched = load_row(&database, 1);

        operations
            .change_folder("Archive", "Old mail", FolderType::Archive)
            .unwrap();

        let row = load_row(&database, 2);
        assert_eq!(row.name, "Old mail");
        assert_eq!(row.folder_type, "archive");
        assert_eq!(row.server_id.as_deref(), Some("Archive"));
        assert_eq!(load_row(&database, 1), untouched);
    }

    #[test]
    fn test_change_folder_unknown_server_id() {
        let (_dir, database, operations) = setup();
        let before = (load_row(&database, 1), load_row(&database, 2));

        operations
            .change_folder("Missing", "Nothing", FolderType::Trash)
            .unwrap();

        assert_eq!((load_row(&database, 1), load_row(&database, 2)), before);
        assert_eq!(count_rows(&database), 2);
    }

    #[test]
    fn test_update_folder_settings_overwrites_settings_columns() {
        let (_dir, database, operations) = setup();
        operations.set_status(1, Some("Syncing")).unwrap();
        let before = load_row(&database, 1);

        let details = FolderDetails {
            folder: Folder {
                id: 1,
                // Name and type in the snapshot are not written
                name: "Ignored".to_string(),
                folder_type: FolderType::Spam,
                is_local_only: false,
            },
            is_in_top_group: true,
            is_integrate: true,
            is_sync_enabled: true,
            display_class: FolderClass::FirstClass,
            is_notifications_enabled: true,
            is_push_enabled: true,
        };
        operations.update_folder_settings(&details).unwrap();

        let row = load_row(&database, 1);
        assert_eq!(
            row,
            FolderRow {
                top_group: true,
                integrate: true,
                sync_enabled: true,
                display_class: "FIRST_CLASS".to_string(),
                notifications_enabled: true,
                push_enabled: true,
                ..before
            }
        );
        assert_eq!(row.name, "Inbox");
        assert_eq!(row.folder_type, "regular");
        assert_eq!(row.status.as_deref(), Some("Syncing"));
    }

    #[test]
    fn test_boolean_setters_change_only_their_column() {
        let (_dir, database, operations) = setup();
        let original = load_row(&database, 1);
        let other = load_row(&database, 2);

        operations.set_include_in_unified_inbox(1, true).unwrap();
        assert_eq!(
            load_row(&database, 1),
            FolderRow { integrate: true, ..original.clone() }
        );

        operations.set_include_in_unified_inbox(1, false).unwrap();
        operations.set_sync_enabled(1, true).unwrap();
        assert_eq!(
            load_row(&database, 1),
            FolderRow { sync_enabled: true, ..original.clone() }
        );

        operations.set_sync_enabled(1, false).unwrap();
        operations.set_push_enabled(1, true).unwrap();
        assert_eq!(
            load_row(&database, 1),
            FolderRow { push_enabled: true, ..original.clone() }
        );

        operations.set_push_enabled(1, false).unwrap();
        operations.set_notifications_enabled(1, true).unwrap();
        assert_eq!(
            load_row(&database, 1),
            FolderRow { notifications_enabled: true, ..original.clone() }
        );

        assert_eq!(load_row(&database, 2), other);
    }

    #[test]
    fn test_set_display_class() {
        let (_dir, database, operations) = setup();
        let original = load_row(&database, 2);

        operations.set_display_class(2, FolderClass::SecondClass).unwrap();

        assert_eq!(
            load_row(&database, 2),
            FolderRow { display_class: "SECOND_CLASS".to_string(), ..original }
        );
    }

    #[test]
    fn test_set_more_messages() {
        let (_dir, database, operations) = setup();

        operations.set_more_messages(1, MoreMessages::True).unwrap();
        assert_eq!(load_row(&database, 1).more_messages, "true");

        operations.set_more_messages(1, MoreMessages::False).unwrap();
        assert_eq!(load_row(&database, 1).more_messages, "false");
        assert_eq!(load_row(&database, 2).more_messages, "unknown");
    }

    #[test]
    fn test_set_last_checked_and_visible_limit() {
        let (_dir, database, operations) = setup();
        let original = load_row(&database, 1);

        operations.set_last_checked(1, 1_700_000_000_000).unwrap();
        operations.set_visible_limit(1, 100).unwrap();

        assert_eq!(
            load_row(&database, 1),
            FolderRow {
                last_updated: Some(1_700_000_000_000),
                visible_limit: 100,
                ..original
            }
        );
    }

    #[test]
    fn test_set_status_and_clear() {
        let (_dir, database, operations) = setup();

        operations.set_status(1, Some("x")).unwrap();
        assert_eq!(load_row(&database, 1).status.as_deref(), Some("x"));

        operations.set_status(1, None).unwrap();
        assert_eq!(load_row(&database, 1).status, None);
    }

    #[test]
    fn test_set_push_disabled_applies_to_every_row() {
        let (_dir, database, operations) = setup();
        operations.set_push_enabled(1, true).unwrap();
        operations.set_push_enabled(2, true).unwrap();
        let inbox = load_row(&database, 1);

        operations.set_push_disabled().unwrap();

        assert_eq!(load_row(&database, 1), FolderRow { push_enabled: false, ..inbox });
        assert!(!load_row(&database, 2).push_enabled);
        assert_eq!(count_rows(&database), 2);
    }

    #[test]
    fn test_set_push_disabled_on_empty_table() {
        let (_dir, database) = open_temp_database();
        let database = Arc::new(database);
        let operations = UpdateFolderOperations::new(database.clone());

        operations.set_push_disabled().unwrap();

        assert_eq!(count_rows(&database), 0);
    }

    #[test]
    fn test_setters_with_unknown_id_succeed_without_changes() {
        let (_dir, database, operations) = setup();
        let before = (load_row(&database, 1), load_row(&database, 2));

        operations.set_sync_enabled(99, true).unwrap();
        operations.set_display_class(99, FolderClass::FirstClass).unwrap();
        operations.set_more_messages(99, MoreMessages::True).unwrap();
        operations.set_last_checked(99, 1).unwrap();
        operations.set_status(99, Some("gone")).unwrap();
        operations.set_visible_limit(99, 10).unwrap();

        assert_eq!((load_row(&database, 1), load_row(&database, 2)), before);
        assert_eq!(count_rows(&database), 2);
    }
}
