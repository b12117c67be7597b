use super::migrations::run_migrations;
use super::{KeyValueStore, StoreError};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// Key-value store backed by a single SQLite table.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (or create) the database file and run migrations.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        // Migrate on a plain connection before the pool hands any out
        {
            let conn = Connection::open(db_path)?;
            run_migrations(&conn)?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(())
        });
        let pool = Pool::builder().max_size(4).build(manager)?;

        tracing::debug!("Opened SQLite store at {}", db_path.display());
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }
}

fn upsert(conn: &Connection, key: &str, value: &str, now: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        upsert(&conn, key, value, chrono::Utc::now().timestamp())?;
        tracing::debug!("Wrote {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", [key])?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let now = chrono::Utc::now().timestamp();

        let tx = conn.transaction()?;
        for (key, value) in entries {
            upsert(&tx, key, value, now)?;
        }
        tx.commit()?;

        tracing::debug!("Wrote {} keys in one transaction", entries.len());
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv_entries WHERE key = ?1", [key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pipedesk.sqlite3");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("crm_contacts", "[]").unwrap();
            store.set("crm_contacts", "[{\"id\":\"c1\"}]").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("crm_contacts").unwrap().as_deref(),
            Some("[{\"id\":\"c1\"}]")
        );
        assert_eq!(store.get("crm_leads").unwrap(), None);
    }

    #[test]
    fn test_set_many_and_remove_many() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("kv.sqlite3")).unwrap();

        store
            .set_many(&[
                ("crm_leads", "[]".to_string()),
                ("crm_tasks", "[]".to_string()),
            ])
            .unwrap();
        assert!(store.get("crm_tasks").unwrap().is_some());

        store.remove_many(&["crm_leads", "crm_tasks"]).unwrap();
        assert_eq!(store.get("crm_leads").unwrap(), None);
        assert_eq!(store.get("crm_tasks").unwrap(), None);
    }
}
