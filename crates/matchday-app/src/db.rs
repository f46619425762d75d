// SQLite persistence for the league store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use tracing::info;

use crate::store::{LeagueSettings, LeagueStore};

/// Key the whole league store is saved under.
pub const STORE_KEY: &str = "league-storage";

/// SQLite-backed key-value persistence. The league store is kept as one
/// JSON document, so every save replaces the previous one whole.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path != Path::new(":memory:") {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS store_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database mutex poisoned"))
    }

    /// Persist an arbitrary JSON value under `key`, replacing any previous
    /// value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn()?;
        let json_str = serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO store_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. `None` if the key does
    /// not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT value FROM store_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query store state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn save_store(&self, store: &LeagueStore) -> Result<()> {
        let value = serde_json::to_value(store).context("failed to serialize league store")?;
        self.save_state(STORE_KEY, &value)
    }

    /// The saved league store, or `None` before the first save.
    pub fn load_store(&self) -> Result<Option<LeagueStore>> {
        self.load_state(STORE_KEY)?
            .map(|value| serde_json::from_value(value).context("saved league store is malformed"))
            .transpose()
    }

    /// Load the saved store, or build, seed and save a fresh one with
    /// `settings` on first run.
    pub fn load_or_init_store(&self, settings: &LeagueSettings) -> Result<LeagueStore> {
        if let Some(store) = self.load_store()? {
            return Ok(store);
        }
        let mut store = LeagueStore::new(settings.clone());
        store.initialize();
        self.save_store(&store)?;
        info!("Created new league store");
        Ok(store)
    }

    /// Delete everything saved.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM store_state", [])
            .context("failed to clear store state")?;
        Ok(())
    }
}
