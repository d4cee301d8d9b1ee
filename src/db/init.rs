use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub fn init_db() -> Result<Connection> {
    open_db(&crate::global::db_file()?)
}

/// Open (creating if needed) and migrate the database at `db_path`.
pub fn open_db(db_path: &Path) -> Result<Connection> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let conn = Connection::open(db_path).context("Failed to open database connection")?;

    migrate(&conn)?;

    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS keyword_lists (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            last_modified TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create keyword_lists table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS keywords (
            id TEXT PRIMARY KEY,
            list_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            checked INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create keywords table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_keywords_list_position ON keywords(list_id, position)",
        [],
    )
    .context("Failed to create index on keywords list_id")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_keyword_lists_last_modified ON keyword_lists(last_modified DESC)",
        [],
    )
    .context("Failed to create index on last_modified")?;

    Ok(())
}
