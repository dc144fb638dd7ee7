//! SQLite-backed checkpoint store.
//!
//! Checkpoints are stored as JSON documents, one row per thread, so a thread
//! interrupted in one process can be resumed from another.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{Checkpoint, CheckpointStore, StoreError, ThreadStatus};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS checkpoints (
    thread_id  TEXT PRIMARY KEY,
    agent      TEXT NOT NULL,
    status     TEXT NOT NULL,
    state      TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_checkpoints_updated_at ON checkpoints(updated_at);
";

#[derive(Clone)]
pub struct SqliteCheckpointStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCheckpointStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let conn = Connection::open(path)?;
        tracing::info!("Opened checkpoint database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Private database that lives as long as the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection off the async runtime.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("checkpoint connection poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("checkpoint task failed: {}", e)))?
    }
}

fn status_label(status: ThreadStatus) -> Result<String, StoreError> {
    Ok(serde_json::to_value(status)?
        .as_str()
        .unwrap_or_default()
        .to_string())
}

#[async_trait]
impl CheckpointStore for SqliteCheckpointStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, StoreError> {
        let thread_id = thread_id.to_string();
        self.with_conn(move |conn| {
            let state: Option<String> = conn
                .query_row(
                    "SELECT state FROM checkpoints WHERE thread_id = ?1",
                    params![thread_id],
                    |row| row.get(0),
                )
                .optional()?;
            state
                .map(|s| serde_json::from_str(&s).map_err(StoreError::from))
                .transpose()
        })
        .await
    }

    async fn put(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        let state = serde_json::to_string(checkpoint)?;
        let status = status_label(checkpoint.status)?;
        let cp = checkpoint.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO checkpoints (thread_id, agent, status, state, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(thread_id) DO UPDATE SET
                    agent = excluded.agent,
                    status = excluded.status,
                    state = excluded.state,
                    updated_at = excluded.updated_at",
                params![
                    cp.thread_id,
                    cp.agent,
                    status,
                    state,
                    cp.created_at,
                    cp.updated_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn put_if_unchanged(
        &self,
        checkpoint: &Checkpoint,
        expected_status: ThreadStatus,
        expected_updated_at: &str,
    ) -> Result<bool, StoreError> {
        let state = serde_json::to_string(checkpoint)?;
        let status = status_label(checkpoint.status)?;
        let expected_status = status_label(expected_status)?;
        let expected_updated_at = expected_updated_at.to_string();
        let cp = checkpoint.clone();
        self.with_conn(move |conn| {
            let updated = conn.execute(
                "UPDATE checkpoints
                 SET agent = ?2, status = ?3, state = ?4, updated_at = ?5
                 WHERE thread_id = ?1 AND status = ?6 AND updated_at = ?7",
                params![
                    cp.thread_id,
                    cp.agent,
                    status,
                    state,
                    cp.updated_at,
                    expected_status,
                    expected_updated_at
                ],
            )?;
            Ok(updated > 0)
        })
        .await
    }

    async fn delete(&self, thread_id: &str) -> Result<bool, StoreError> {
        let thread_id = thread_id.to_string();
        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM checkpoints WHERE thread_id = ?1",
                params![thread_id],
            )?;
            Ok(removed > 0)
        })
        .await
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Checkpoint>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT state FROM checkpoints ORDER BY updated_at DESC LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt.query_map(params![limit, offset], |row| row.get::<_, String>(0))?;
            let mut checkpoints = Vec::new();
            for row in rows {
                checkpoints.push(serde_json::from_str(&row?)?);
            }
            Ok(checkpoints)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::{PendingToolCall, ThreadStatus};
    use crate::llm::{ChatMessage, ToolCall};
    use serde_json::json;

    fn interrupted_checkpoint() -> Checkpoint {
        let call = ToolCall::new(
            "call_email",
            "send_email",
            &json!({"email": "john.doe@example.com", "subject": "s", "body": "b"}),
        );
        let mut cp = Checkpoint::new("thread-1", "claim_setup");
        cp.messages.push(ChatMessage::system("prompt"));
        cp.messages.push(ChatMessage::assistant(None, Some(vec![call.clone()])));
        cp.status = ThreadStatus::Interrupted;
        cp.pending = Some(PendingToolCall {
            tool_call: call,
            interrupt: json!({"action": "send_email"}),
            remaining: Vec::new(),
        });
        cp.iterations = 5;
        cp
    }

    #[tokio::test]
    async fn checkpoint_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state").join("checkpoints.db");

        let original = interrupted_checkpoint();
        {
            let store = SqliteCheckpointStore::open(&path).expect("open");
            store.put(&original).await.expect("put");
        }

        let reopened = SqliteCheckpointStore::open(&path).expect("reopen");
        let cp = reopened
            .get("thread-1")
            .await
            .expect("get")
            .expect("checkpoint exists");
        assert_eq!(cp, original);
        assert!(reopened.is_persistent());
    }

    #[tokio::test]
    async fn put_replaces_existing_row() {
        let store = SqliteCheckpointStore::open_in_memory().expect("open");
        let mut cp = interrupted_checkpoint();
        store.put(&cp).await.expect("put");

        cp.status = ThreadStatus::Completed;
        cp.pending = None;
        cp.touch();
        store.put(&cp).await.expect("update");

        let loaded = store.get("thread-1").await.expect("get").expect("exists");
        assert_eq!(loaded.status, ThreadStatus::Completed);
        assert!(loaded.pending.is_none());
        assert_eq!(store.list(10, 0).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn missing_thread_and_delete() {
        let store = SqliteCheckpointStore::open_in_memory().expect("open");
        assert!(store.get("nope").await.expect("get").is_none());
        store.put(&interrupted_checkpoint()).await.expect("put");
        assert!(store.delete("thread-1").await.expect("delete"));
        assert!(!store.delete("thread-1").await.expect("delete again"));
    }

    #[tokio::test]
    async fn conditional_put_rejects_stale_writer() {
        let store = SqliteCheckpointStore::open_in_memory().expect("open");
        let original = interrupted_checkpoint();
        store.put(&original).await.expect("put");

        let mut claimed = original.clone();
        claimed.status = ThreadStatus::Running;
        claimed.pending = None;
        claimed.updated_at = "9999-01-01T00:00:00+00:00".to_string();
        assert!(store
            .put_if_unchanged(&claimed, ThreadStatus::Interrupted, &original.updated_at)
            .await
            .expect("first claim"));
        assert!(!store
            .put_if_unchanged(&claimed, ThreadStatus::Interrupted, &original.updated_at)
            .await
            .expect("stale claim"));

        let loaded = store.get("thread-1").await.expect("get").expect("exists");
        assert_eq!(loaded.status, ThreadStatus::Running);
        assert!(loaded.pending.is_none());
    }
}
