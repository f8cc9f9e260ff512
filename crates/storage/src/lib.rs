use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use tracing::debug;

use shared::{domain::BoardList, protocol::WriteResult};

/// Whole-document access to the board collection.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn fetch_board(&self, name: &str) -> Result<Option<StoredBoard>>;
    async fn replace_board_lists(&self, name: &str, lists: &[BoardList]) -> Result<WriteResult>;
    async fn health_check(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBoard {
    pub id: i64,
    pub name: String,
    pub lists: Vec<BoardList>,
    pub updated_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite database url '{database_url}'"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply board migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn fetch_board(&self, name: &str) -> Result<Option<StoredBoard>> {
        let row = sqlx::query("SELECT id, name, lists, updated_at FROM boards WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load board '{name}'"))?;

        let Some(row) = row else {
            debug!(board = name, "board document not found");
            return Ok(None);
        };

        let raw_lists: String = row.try_get("lists")?;
        let lists: Vec<BoardList> = serde_json::from_str(&raw_lists)
            .with_context(|| format!("board '{name}' holds malformed lists"))?;

        Ok(Some(StoredBoard {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            lists,
            updated_at: row.try_get("updated_at")?,
        }))
    }

    /// Upserts the board's list collection and stamps `updated_at` with the
    /// current time. Last write wins.
    pub async fn replace_board_lists(&self, name: &str, lists: &[BoardList]) -> Result<WriteResult> {
        let raw_lists = serde_json::to_string(lists).context("failed to encode board lists")?;
        let now = Utc::now();

        // One statement, so the write lock is taken before anything is read
        // and concurrent writers queue on the busy timeout.
        let row = sqlx::query(
            "INSERT INTO boards (name, lists, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET
                 lists = excluded.lists,
                 updated_at = excluded.updated_at,
                 revision = boards.revision + 1
             RETURNING id, revision",
        )
        .bind(name)
        .bind(raw_lists.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed to write board '{name}'"))?;

        let id: i64 = row.try_get("id")?;
        let revision: i64 = row.try_get("revision")?;
        debug!(board = name, id, revision, "board lists replaced");
        if revision == 0 {
            Ok(WriteResult::inserted(id))
        } else {
            Ok(WriteResult::updated())
        }
    }

    /// Removes the board document. Returns whether one existed.
    pub async fn delete_board(&self, name: &str) -> Result<bool> {
        let done = sqlx::query("DELETE FROM boards WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete board '{name}'"))?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl BoardRepository for Storage {
    async fn fetch_board(&self, name: &str) -> Result<Option<StoredBoard>> {
        Storage::fetch_board(self, name).await
    }

    async fn replace_board_lists(&self, name: &str, lists: &[BoardList]) -> Result<WriteResult> {
        Storage::replace_board_lists(self, name, lists).await
    }

    async fn health_check(&self) -> Result<()> {
        Storage::health_check(self).await
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
