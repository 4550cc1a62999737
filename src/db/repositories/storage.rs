use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::Database;

pub const FAVORITES_KEY: &str = "favorites";
pub const SESSIONS_KEY: &str = "sessions";
pub const SESSION_CHECKPOINT_KEY: &str = "session_checkpoint";
/// Where an unreadable checkpoint is kept for manual inspection.
pub const CORRUPT_CHECKPOINT_KEY: &str = "session_checkpoint_corrupt";

pub(crate) fn read_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM storage WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read storage key '{key}'"))
}

pub(crate) fn delete_raw(conn: &Connection, key: &str) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM storage WHERE key = ?1", params![key])
        .with_context(|| format!("failed to delete storage key '{key}'"))?;
    Ok(removed > 0)
}

pub(crate) fn write_raw(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().to_rfc3339()],
    )
    .with_context(|| format!("failed to write storage key '{key}'"))?;
    Ok(())
}

impl Database {
    /// Reads and decodes the JSON value stored under `key`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let owned_key = key.to_string();
        let raw = self.execute(move |conn| read_raw(conn, &owned_key))?;
        raw.map(|value| {
            serde_json::from_str(&value)
                .with_context(|| format!("storage key '{key}' holds malformed JSON"))
        })
        .transpose()
    }

    /// Overwrites the whole value stored under `key`.
    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = serde_json::to_string(value)
            .with_context(|| format!("failed to serialize value for '{key}'"))?;
        let key = key.to_string();
        self.execute(move |conn| write_raw(conn, &key, &serialized))
    }
}
