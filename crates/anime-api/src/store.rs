//! SQLite persistence for the result cache and the per-id record cache.

use crate::cache::CacheStore;
use crate::service::AnimeRecordStore;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use shared::{AnimeSummary, CacheEntry, Database};
use std::sync::Mutex;
use tracing::debug;

/// Shared database handle; every operation is a single statement
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let db = self
            .db
            .lock()
            .map_err(|_| anyhow!("Database mutex poisoned"))?;
        f(db.conn())
    }
}

impl CacheStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<CacheEntry>> {
        let row = self.with_conn(|conn| {
            conn.query_row(
                "SELECT value, expires_at, updated_at FROM cache_entries WHERE key = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, DateTime<Utc>>(1)?,
                        row.get::<_, DateTime<Utc>>(2)?,
                    ))
                },
            )
            .optional()
            .with_context(|| format!("Failed to read cache entry: {}", key))
        })?;

        let Some((value, expires_at, updated_at)) = row else {
            return Ok(None);
        };

        let value: Vec<AnimeSummary> = serde_json::from_str(&value)
            .with_context(|| format!("Failed to decode cache entry: {}", key))?;

        Ok(Some(CacheEntry {
            key: key.to_string(),
            value,
            expires_at,
            updated_at,
        }))
    }

    fn upsert(&self, entry: &CacheEntry) -> Result<()> {
        let value = serde_json::to_string(&entry.value).context("Failed to encode cache entry")?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cache_entries (key, value, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    expires_at = excluded.expires_at,
                    updated_at = excluded.updated_at",
                params![entry.key, value, entry.expires_at, entry.updated_at],
            )
            .with_context(|| format!("Failed to write cache entry: {}", entry.key))
        })?;

        Ok(())
    }
}

impl AnimeRecordStore for SqliteStore {
    fn find(&self, mal_id: u32) -> Result<Option<AnimeSummary>> {
        let payload: Option<String> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT payload FROM anime_records WHERE mal_id = ?1",
                params![mal_id],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read anime record {}", mal_id))
        })?;

        payload
            .map(|p| {
                serde_json::from_str(&p)
                    .with_context(|| format!("Failed to decode anime record {}", mal_id))
            })
            .transpose()
    }

    fn insert(&self, anime: &AnimeSummary) -> Result<()> {
        let payload = serde_json::to_string(anime).context("Failed to encode anime record")?;

        let inserted = self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO anime_records (mal_id, title, payload, fetched_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![anime.mal_id, anime.title, payload, Utc::now()],
            )
            .with_context(|| format!("Failed to store anime record {}", anime.mal_id))
        })?;

        debug!(mal_id = anime.mal_id, inserted = inserted > 0, "Anime record stored");
        Ok(())
    }
}
