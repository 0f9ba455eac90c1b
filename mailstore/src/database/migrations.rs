use rusqlite::Connection;

use super::Result;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create folders table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS folders (
            id INTEGER PRIMARY KEY,
            server_id TEXT,
            name TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'regular',
            local_only INTEGER NOT NULL DEFAULT 0,
            top_group INTEGER NOT NULL DEFAULT 0,
            integrate INTEGER NOT NULL DEFAULT 0,
            sync_enabled INTEGER NOT NULL DEFAULT 0,
            display_class TEXT NOT NULL DEFAULT 'NO_CLASS',
            notifications_enabled INTEGER NOT NULL DEFAULT 0,
            push_enabled INTEGER NOT NULL DEFAULT 0,
            more_messages TEXT NOT NULL DEFAULT 'unknown',
            last_updated INTEGER,
            status TEXT,
            visible_limit INTEGER NOT NULL DEFAULT 25
        )",
        [],
    )?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_folders_server_id ON folders(server_id)",
        [],
    )?;

    tracing::info!("Folder schema migrations applied");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        conn.execute("INSERT INTO folders (server_id, name) VALUES ('INBOX', 'Inbox')", [])
            .unwrap();

        let (display_class, more_messages, visible_limit, status): (
            String,
            String,
            i64,
            Option<String>,
        ) = conn
            .query_row(
                "SELECT display_class, more_messages, visible_limit, status FROM folders",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();

        assert_eq!(display_class, "NO_CLASS");
        assert_eq!(more_messages, "unknown");
        assert_eq!(visible_limit, 25);
        assert_eq!(status, None);
    }

    #[test]
    fn test_server_id_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute("INSERT INTO folders (server_id, name) VALUES ('INBOX', 'Inbox')", [])
            .unwrap();
        let duplicate =
            conn.execute("INSERT INTO folders (server_id, name) VALUES ('INBOX', 'Other')", []);

        assert!(duplicate.is_err());
    }
}
