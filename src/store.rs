//! SQLite persistence for user records and conversation state.
//!
//! The schema is applied inline via `include_str!` when the store is
//! opened. Sessions are stored as JSON so the conversation survives a
//! restart; [`SessionStore`] keeps them in memory and writes through.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::i18n::Language;
use crate::session::Session;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// A stored session could not be (de)serialized.
    #[error("session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The database directory could not be created.
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),

    /// The user was never registered with `/start`.
    #[error("user {0} not found")]
    UserNotFound(i64),
}

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Telegram user ID.
    pub user_id: i64,
    /// Telegram username without the `@`, if the user has one.
    pub username: Option<String>,
    /// Interface language.
    pub language: Language,
    /// How many files the user has sent.
    pub number_of_files_sent: i64,
}

/// The bot's SQLite database.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, the database or the schema
    /// cannot be created.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::raw_sql(include_str!("../migrations/001_schema.sql"))
            .execute(&pool)
            .await?;
        Ok(Self { pool })
    }

    /// Create the user record if it does not exist yet.
    ///
    /// Returns `true` when a new record was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn register_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        language: Language,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (user_id, username, language) VALUES (?1, ?2, ?3) \
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(username)
        .bind(language.code())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch a user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
        let row: Option<(i64, Option<String>, String, i64)> = sqlx::query_as(
            "SELECT user_id, username, language, number_of_files_sent FROM users WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(user_id, username, language, number_of_files_sent)| UserRecord {
                user_id,
                username,
                language: Language::from_code(&language),
                number_of_files_sent,
            },
        ))
    }

    /// Store the user's language, creating the record if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set_language(&self, user_id: i64, language: Language) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (user_id, language) VALUES (?1, ?2) \
             ON CONFLICT(user_id) DO UPDATE SET language = ?2, updated_at = datetime('now')",
        )
        .bind(user_id)
        .bind(language.code())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Count one more file sent by the user. Returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UserNotFound`] if the user was never
    /// registered.
    pub async fn increment_files_sent(&self, user_id: i64) -> Result<i64, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE users SET number_of_files_sent = number_of_files_sent + 1, \
             updated_at = datetime('now') WHERE user_id = ?1 RETURNING number_of_files_sent",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|(n,)| n).ok_or(StoreError::UserNotFound(user_id))
    }

    /// Refresh the stored Telegram username.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn update_username(
        &self,
        user_id: i64,
        username: Option<&str>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET username = ?2, updated_at = datetime('now') WHERE user_id = ?1",
        )
        .bind(user_id)
        .bind(username)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persist a conversation state.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub async fn save_session(&self, user_id: i64, session: &Session) -> Result<(), StoreError> {
        let state = serde_json::to_string(session)?;
        sqlx::query(
            "INSERT INTO sessions (user_id, state, updated_at) VALUES (?1, ?2, datetime('now')) \
             ON CONFLICT(user_id) DO UPDATE SET state = ?2, updated_at = datetime('now')",
        )
        .bind(user_id)
        .bind(state)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Load a persisted conversation state.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored JSON is invalid.
    pub async fn load_session(&self, user_id: i64) -> Result<Option<Session>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT state FROM sessions WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(state,)| serde_json::from_str(&state))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Forget a persisted conversation state.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_session(&self, user_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// One user's cached session; `None` until first loaded.
type Slot = Arc<Mutex<Option<Session>>>;

/// In-memory sessions keyed by Telegram user ID, written through to SQLite.
///
/// Each user has their own lock, so a slow write for one user never holds
/// up another.
#[derive(Debug)]
pub struct SessionStore {
    store: Store,
    slots: Mutex<HashMap<i64, Slot>>,
}

impl SessionStore {
    /// Create an empty cache over `store`.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying database.
    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn slot(&self, user_id: i64) -> Slot {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(user_id).or_default())
    }

    async fn load(&self, user_id: i64) -> Result<Session, StoreError> {
        match self.store.load_session(user_id).await {
            Ok(Some(session)) => return Ok(session),
            Ok(None) => {}
            Err(StoreError::Encoding(e)) => {
                warn!(user_id, error = %e, "discarding unreadable session");
            }
            Err(e) => return Err(e),
        }
        let language = self
            .store
            .get_user(user_id)
            .await?
            .map(|u| u.language)
            .unwrap_or_default();
        debug!(user_id, "starting new session");
        Ok(Session::new(language))
    }

    /// Snapshot of the user's session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has to be loaded and the query fails.
    pub async fn get(&self, user_id: i64) -> Result<Session, StoreError> {
        let slot = self.slot(user_id).await;
        let mut cached = slot.lock().await;
        if let Some(session) = cached.as_ref() {
            return Ok(session.clone());
        }
        let session = self.load(user_id).await?;
        *cached = Some(session.clone());
        Ok(session)
    }

    /// Apply `f` to the user's session and persist the result.
    ///
    /// The user's lock is held for the whole update so concurrent updates
    /// for the same user apply in order.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the session fails; the cached
    /// state keeps the change either way.
    pub async fn update<R>(
        &self,
        user_id: i64,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, StoreError> {
        let slot = self.slot(user_id).await;
        let mut cached = slot.lock().await;
        let mut session = match cached.take() {
            Some(session) => session,
            None => self.load(user_id).await?,
        };
        let result = f(&mut session);
        let saved = self.store.save_session(user_id, &session).await;
        *cached = Some(session);
        saved?;
        Ok(result)
    }
}
