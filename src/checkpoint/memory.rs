//! In-memory checkpoint store (non-persistent).

use super::{Checkpoint, CheckpointStore, StoreError, ThreadStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryCheckpointStore {
    threads: Arc<RwLock<HashMap<String, Checkpoint>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self {
            threads: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCheckpointStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, StoreError> {
        Ok(self.threads.read().await.get(thread_id).cloned())
    }

    async fn put(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        self.threads
            .write()
            .await
            .insert(checkpoint.thread_id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn put_if_unchanged(
        &self,
        checkpoint: &Checkpoint,
        expected_status: ThreadStatus,
        expected_updated_at: &str,
    ) -> Result<bool, StoreError> {
        let mut threads = self.threads.write().await;
        match threads.get_mut(&checkpoint.thread_id) {
            Some(stored)
                if stored.status == expected_status && stored.updated_at == expected_updated_at =>
            {
                *stored = checkpoint.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, thread_id: &str) -> Result<bool, StoreError> {
        Ok(self.threads.write().await.remove(thread_id).is_some())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Checkpoint>, StoreError> {
        let mut threads: Vec<Checkpoint> = self.threads.read().await.values().cloned().collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(threads.into_iter().skip(offset).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;

    #[tokio::test]
    async fn threads_are_isolated() {
        let store = InMemoryCheckpointStore::new();
        let mut a = Checkpoint::new("thread-a", "claim_setup");
        a.messages.push(ChatMessage::user("FNOL-2025-001234"));
        let b = Checkpoint::new("thread-b", "fnol_intake");
        store.put(&a).await.expect("put a");
        store.put(&b).await.expect("put b");

        a.status = ThreadStatus::Completed;
        store.put(&a).await.expect("update a");

        let b_after = store.get("thread-b").await.expect("get b").expect("b exists");
        assert_eq!(b_after.status, ThreadStatus::Running);
        assert!(b_after.messages.is_empty());
        let a_after = store.get("thread-a").await.expect("get a").expect("a exists");
        assert_eq!(a_after.status, ThreadStatus::Completed);
        assert_eq!(a_after.messages.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = InMemoryCheckpointStore::new();
        store
            .put(&Checkpoint::new("t", "fnol_intake"))
            .await
            .expect("put");
        assert!(store.delete("t").await.expect("delete"));
        assert!(!store.delete("t").await.expect("delete again"));
        assert!(store.get("t").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn list_pages_newest_first() {
        let store = InMemoryCheckpointStore::new();
        for (idx, stamp) in ["2025-01-01T00:00:00+00:00", "2025-01-03T00:00:00+00:00", "2025-01-02T00:00:00+00:00"]
            .iter()
            .enumerate()
        {
            let mut cp = Checkpoint::new(format!("t{}", idx), "claim_setup");
            cp.updated_at = stamp.to_string();
            store.put(&cp).await.expect("put");
        }

        let page: Vec<String> = store
            .list(2, 0)
            .await
            .expect("list")
            .into_iter()
            .map(|c| c.thread_id)
            .collect();
        assert_eq!(page, vec!["t1", "t2"]);

        let rest = store.list(10, 2).await.expect("list offset");
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].thread_id, "t0");
    }

    #[tokio::test]
    async fn conditional_put_only_applies_to_unchanged_checkpoint() {
        let store = InMemoryCheckpointStore::new();
        let mut cp = Checkpoint::new("t", "claim_setup");
        cp.status = ThreadStatus::Interrupted;
        cp.updated_at = "2025-01-01T00:00:00+00:00".to_string();
        store.put(&cp).await.expect("put");

        let mut claimed = cp.clone();
        claimed.status = ThreadStatus::Running;
        claimed.updated_at = "2025-01-01T00:00:01+00:00".to_string();
        assert!(store
            .put_if_unchanged(&claimed, ThreadStatus::Interrupted, &cp.updated_at)
            .await
            .expect("first claim"));
        assert!(!store
            .put_if_unchanged(&claimed, ThreadStatus::Interrupted, &cp.updated_at)
            .await
            .expect("second claim"));
        assert!(!store
            .put_if_unchanged(&Checkpoint::new("missing", "claim_setup"), ThreadStatus::Running, "x")
            .await
            .expect("missing thread"));

        let stored = store.get("t").await.expect("get").expect("exists");
        assert_eq!(stored.status, ThreadStatus::Running);
    }
}
