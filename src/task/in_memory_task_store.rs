use crate::errors::{AgentError, AgentResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::task_store::TaskStore;
use crate::a2a::{Artifact, Message, Task, TaskStatus};

/// In-memory implementation of TaskStore.
///
/// Thread-safe via an RwLock; every mutation happens while holding the
/// write lock, so concurrent appends and status updates never lose work.
/// Suitable for development and testing — tasks accumulate until deleted,
/// so production deployments want a database-backed implementation.
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all tasks from storage. Primarily used in tests.
    pub async fn clear(&self) {
        let mut tasks = self.tasks.write().await;
        tasks.clear();
    }

    /// Number of tasks currently stored.
    pub async fn len(&self) -> usize {
        let tasks = self.tasks.read().await;
        tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get_task(&self, task_id: &str) -> AgentResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(task_id).cloned())
    }

    async fn save_task(&self, task: &Task) -> AgentResult<()> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> AgentResult<()> {
        let mut tasks = self.tasks.write().await;
        tasks.remove(task_id);
        Ok(())
    }

    async fn task_exists(&self, task_id: &str) -> AgentResult<bool> {
        let tasks = self.tasks.read().await;
        Ok(tasks.contains_key(task_id))
    }

    async fn list_tasks(&self, context_id: Option<&str>) -> AgentResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = match context_id {
            Some(context_filter) => tasks
                .values()
                .filter(|task| task.context_id == context_filter)
                .cloned()
                .collect(),
            None => tasks.values().cloned().collect(),
        };

        // Stable ordering for callers; the store has no creation clock.
        result.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(result)
    }

    async fn append_message(&self, task_id: &str, message: Message) -> AgentResult<()> {
        let mut tasks = self.tasks.write().await;

        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| AgentError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        task.history.push(message);
        Ok(())
    }

    async fn append_artifact(&self, task_id: &str, artifact: Artifact) -> AgentResult<()> {
        let mut tasks = self.tasks.write().await;

        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| AgentError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        task.artifacts.push(artifact);
        Ok(())
    }

    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> AgentResult<()> {
        let mut tasks = self.tasks.write().await;

        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| AgentError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        task.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2a::{TaskState, TASK_KIND};

    fn make_task(task_id: &str, context_id: &str) -> Task {
        Task {
            kind: TASK_KIND.to_string(),
            id: task_id.to_string(),
            context_id: context_id.to_string(),
            status: TaskStatus {
                state: TaskState::Submitted,
                timestamp: None,
                message: None,
            },
            history: Vec::new(),
            artifacts: Vec::new(),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemoryTaskStore::new();
        store.save_task(&make_task("t1", "c1")).await.unwrap();

        let task = store.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.context_id, "c1");

        assert!(store.get_task("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryTaskStore::new();
        store.save_task(&make_task("t1", "c1")).await.unwrap();

        store.delete_task("t1").await.unwrap();
        assert!(!store.task_exists("t1").await.unwrap());

        // Second delete succeeds silently
        store.delete_task("t1").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_tasks_filters_by_context() {
        let store = InMemoryTaskStore::new();
        store.save_task(&make_task("t1", "c1")).await.unwrap();
        store.save_task(&make_task("t2", "c1")).await.unwrap();
        store.save_task(&make_task("t3", "c2")).await.unwrap();

        let all = store.list_tasks(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let c1 = store.list_tasks(Some("c1")).await.unwrap();
        assert_eq!(c1.len(), 2);
        assert!(c1.iter().all(|task| task.context_id == "c1"));
    }

    #[tokio::test]
    async fn test_append_to_missing_task_fails() {
        let store = InMemoryTaskStore::new();
        let err = store
            .append_message("missing", crate::a2a::Message::user_text("hi"))
            .await;
        assert!(matches!(
            err,
            Err(AgentError::TaskNotFound { task_id }) if task_id == "missing"
        ));
    }

    #[tokio::test]
    async fn test_update_status() {
        let store = InMemoryTaskStore::new();
        store.save_task(&make_task("t1", "c1")).await.unwrap();

        store
            .update_task_status(
                "t1",
                TaskStatus {
                    state: TaskState::Working,
                    timestamp: None,
                    message: None,
                },
            )
            .await
            .unwrap();

        let task = store.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.status.state, TaskState::Working);
    }
}
