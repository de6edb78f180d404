use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::PathBuf;

use crate::paths;
use crate::translation::TranslationRequest;

/// Sentence-level translation cache stored in SQLite.
pub struct CacheManager {
    db_path: PathBuf,
}

impl CacheManager {
    /// Opens the cache at `$XDG_CACHE_HOME/gtl/translations.db`.
    pub fn new() -> Result<Self> {
        Self::with_path(paths::cache_dir()?.join("translations.db"))
    }

    /// Opens (and initializes if needed) a cache database at `db_path`.
    pub fn with_path(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let manager = Self { db_path };
        manager.init_db()?;

        Ok(manager)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sentences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cache_key TEXT UNIQUE NOT NULL,
                source_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                source_language TEXT NOT NULL,
                target_language TEXT NOT NULL,
                model TEXT NOT NULL,
                endpoint TEXT NOT NULL,
                prompt_hash TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                accessed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("Failed to create sentences table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cache_key ON sentences(cache_key)",
            [],
        )
        .context("Failed to create index")?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open cache database: {}", self.db_path.display()))
    }

    pub fn get(&self, request: &TranslationRequest) -> Result<Option<String>> {
        let cache_key = request.cache_key();
        let conn = self.connect()?;

        let result: Option<String> = conn
            .query_row(
                "SELECT translated_text FROM sentences WHERE cache_key = ?1",
                [&cache_key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query translation cache")?;

        if result.is_some() {
            conn.execute(
                "UPDATE sentences SET accessed_at = CURRENT_TIMESTAMP WHERE cache_key = ?1",
                [&cache_key],
            )?;
        }

        Ok(result)
    }

    pub fn put(&self, request: &TranslationRequest, translated_text: &str) -> Result<()> {
        let cache_key = request.cache_key();
        let prompt_hash = TranslationRequest::prompt_hash();
        let conn = self.connect()?;

        conn.execute(
            "INSERT OR REPLACE INTO sentences
             (cache_key, source_text, translated_text, source_language, target_language, model, endpoint, prompt_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                cache_key,
                request.source_text,
                translated_text,
                request.source_language,
                request.target_language,
                request.model,
                request.endpoint,
                prompt_hash,
            ],
        )
        .context("Failed to insert translation into cache")?;

        Ok(())
    }
}
