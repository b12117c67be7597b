use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    // One row per storage key; values are JSON documents
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_entries (
            key VARCHAR PRIMARY KEY,
            value VARCHAR NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
