//! User records and session persistence against in-memory SQLite.

use std::path::PathBuf;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use coverbot::i18n::Language;
use coverbot::session::{ClipFile, ModuleChoice, Session};
use coverbot::store::{SessionStore, Store, StoreError};

async fn fresh_pool() -> SqlitePool {
    let opts = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);
    // In-memory databases are per-connection.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .expect("in-memory pool should connect")
}

async fn fresh_store() -> Store {
    Store::from_pool(fresh_pool().await)
        .await
        .expect("schema should apply")
}

fn voice() -> ClipFile {
    ClipFile {
        path: PathBuf::from("/tmp/u/voice.ogg"),
        message_id: 7,
        duration_secs: 12,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_user_creates_record_once() {
    let store = fresh_store().await;

    let created = store
        .register_user(42, Some("alice"), Language::En)
        .await
        .expect("register should succeed");
    assert!(created);

    let again = store
        .register_user(42, Some("alice2"), Language::Fa)
        .await
        .expect("second register should succeed");
    assert!(!again, "existing user should not be recreated");

    let user = store
        .get_user(42)
        .await
        .expect("query should succeed")
        .expect("user should exist");
    assert_eq!(user.username.as_deref(), Some("alice"));
    assert_eq!(user.language, Language::En);
    assert_eq!(user.number_of_files_sent, 0);
}

#[tokio::test]
async fn get_unknown_user_is_none() {
    let store = fresh_store().await;
    let user = store.get_user(1).await.expect("query should succeed");
    assert!(user.is_none());
}

#[tokio::test]
async fn increment_counts_files() {
    let store = fresh_store().await;
    store
        .register_user(5, None, Language::En)
        .await
        .expect("register should succeed");

    assert_eq!(store.increment_files_sent(5).await.expect("increment"), 1);
    assert_eq!(store.increment_files_sent(5).await.expect("increment"), 2);
}

#[tokio::test]
async fn increment_unknown_user_fails() {
    let store = fresh_store().await;
    let result = store.increment_files_sent(99).await;
    assert!(matches!(result, Err(StoreError::UserNotFound(99))));
}

#[tokio::test]
async fn set_language_upserts() {
    let store = fresh_store().await;

    store
        .set_language(8, Language::Fa)
        .await
        .expect("set_language should create the user");
    let user = store.get_user(8).await.expect("query").expect("user");
    assert_eq!(user.language, Language::Fa);

    store
        .set_language(8, Language::En)
        .await
        .expect("set_language should update the user");
    let user = store.get_user(8).await.expect("query").expect("user");
    assert_eq!(user.language, Language::En);
}

#[tokio::test]
async fn update_username_overwrites() {
    let store = fresh_store().await;
    store
        .register_user(3, Some("old"), Language::En)
        .await
        .expect("register");
    store
        .update_username(3, Some("new"))
        .await
        .expect("update should succeed");
    let user = store.get_user(3).await.expect("query").expect("user");
    assert_eq!(user.username.as_deref(), Some("new"));
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_round_trips_through_database() {
    let store = fresh_store().await;
    let mut session = Session::new(Language::Fa);
    session.attach_voice(voice());

    store.save_session(11, &session).await.expect("save");
    let loaded = store
        .load_session(11)
        .await
        .expect("load")
        .expect("session should exist");
    assert_eq!(loaded, session);

    store.delete_session(11).await.expect("delete");
    assert!(store.load_session(11).await.expect("load").is_none());
}

#[tokio::test]
async fn corrupt_session_row_is_an_encoding_error() {
    let pool = fresh_pool().await;
    let store = Store::from_pool(pool.clone()).await.expect("schema");
    sqlx::query("INSERT INTO sessions (user_id, state) VALUES (1, 'not json')")
        .execute(&pool)
        .await
        .expect("raw insert");

    let result = store.load_session(1).await;
    assert!(matches!(result, Err(StoreError::Encoding(_))));
}

#[tokio::test]
async fn session_store_starts_in_user_language() {
    let store = fresh_store().await;
    store
        .register_user(21, None, Language::Fa)
        .await
        .expect("register");
    let sessions = SessionStore::new(store);

    let session = sessions.get(21).await.expect("get");
    assert_eq!(session, Session::new(Language::Fa));
}

#[tokio::test]
async fn session_store_writes_through() {
    let pool = fresh_pool().await;
    let store = Store::from_pool(pool).await.expect("schema");
    let sessions = SessionStore::new(store.clone());

    let selected = sessions
        .update(4, |s| {
            s.attach_voice(voice());
            s.select(ModuleChoice::VoiceToAudio)
        })
        .await
        .expect("update should persist");
    assert!(selected.is_ok());

    let persisted = store
        .load_session(4)
        .await
        .expect("load")
        .expect("session should be persisted");
    assert_eq!(persisted, sessions.get(4).await.expect("get"));

    // A fresh cache over the same database sees the same state.
    let restarted = SessionStore::new(store);
    assert_eq!(restarted.get(4).await.expect("get"), persisted);
}

#[tokio::test]
async fn session_store_replaces_unreadable_session() {
    let pool = fresh_pool().await;
    let store = Store::from_pool(pool.clone()).await.expect("schema");
    sqlx::query("INSERT INTO sessions (user_id, state) VALUES (2, '{\"broken\":')")
        .execute(&pool)
        .await
        .expect("raw insert");

    let sessions = SessionStore::new(store);
    let session = sessions.get(2).await.expect("unreadable session should be replaced");
    assert_eq!(session, Session::new(Language::En));
}

#[tokio::test]
async fn open_creates_database_file() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("nested").join("coverbot.db");

    let store = Store::open(&path).await.expect("open should succeed");
    store
        .register_user(1, None, Language::En)
        .await
        .expect("register");
    assert!(path.exists());
}

#[tokio::test]
async fn concurrent_updates_keep_per_user_order() {
    const USERS: i64 = 4;
    const UPLOADS: i32 = 8;
    const REPLACED: usize = 7;

    let store = fresh_store().await;
    let sessions = std::sync::Arc::new(SessionStore::new(store.clone()));

    let mut tasks = tokio::task::JoinSet::new();
    for user_id in 0..USERS {
        for n in 0..UPLOADS {
            let sessions = std::sync::Arc::clone(&sessions);
            tasks.spawn(async move {
                let clip = ClipFile {
                    path: PathBuf::from(format!("/tmp/{user_id}/{n}.ogg")),
                    message_id: n,
                    duration_secs: 1,
                };
                sessions
                    .update(user_id, |s| s.attach_voice(clip))
                    .await
                    .expect("update should persist")
            });
        }
    }

    let mut superseded = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        superseded.extend(joined.expect("task should not panic"));
    }

    for user_id in 0..USERS {
        let mut session = sessions.get(user_id).await.expect("get");
        assert_eq!(
            store.load_session(user_id).await.expect("load"),
            Some(session.clone()),
            "cache and database should agree"
        );
        // Every upload was replaced exactly once, except the one still attached.
        let remaining = session.reset();
        assert_eq!(remaining.len(), 1);
        let replaced = superseded
            .iter()
            .filter(|p| p.starts_with(format!("/tmp/{user_id}/")))
            .count();
        assert_eq!(replaced, REPLACED);
        assert!(!superseded.contains(&remaining[0]));
    }
}
