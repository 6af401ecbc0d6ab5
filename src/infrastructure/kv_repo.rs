use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{kv::KeyValueStore, lock::KvLock};
use crate::domain::{
    error::{TaskError, TaskResult},
    repository::TaskRepository,
    task::{CreateTask, Task, TaskId, TaskStatus, UpdateTask},
};

pub const KEY_TASK_AUTO_INCREMENT_ID: &str = "tasks_auto_increment_id";
pub const KEY_TASK_MAP: &str = "tasks_map";

/// Persisted form of a task, stored as JSON under its id in [`KEY_TASK_MAP`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TaskRecord {
    id: u64,
    name: String,
    status: i64,
}

impl TaskRecord {
    fn field(id: TaskId) -> String { id.0.to_string() }

    fn decode(raw: &str) -> TaskResult<Self> {
        Ok(serde_json::from_str(raw).context("failed to decode stored task")?)
    }

    fn encode(&self) -> TaskResult<String> {
        Ok(serde_json::to_string(self).context("failed to encode task")?)
    }

    fn into_task(self) -> TaskResult<Task> {
        let status = TaskStatus::from_code(self.status)
            .ok_or_else(|| anyhow!("stored task {} has unknown status {}", self.id, self.status))?;
        Ok(Task { id: TaskId(self.id), name: self.name, status })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self { id: task.id.0, name: task.name, status: task.status.code() }
    }
}

/// Repository over a [`KeyValueStore`]. Ids come from an atomic counter; each task
/// is one field of a single hash.
///
/// `update` reads, merges and writes back in separate commands, so two concurrent
/// updates of the same task can lose one of the writes.
/// [`with_update_lock`](Self::with_update_lock) serializes `update` and `delete`
/// per task through the advisory lock.
#[derive(Clone)]
pub struct KvTaskRepository<S> {
    store: S,
    lock: Option<KvLock<S>>,
}

impl<S: KeyValueStore + Clone> KvTaskRepository<S> {
    pub fn new(store: S) -> Self { Self { store, lock: None } }

    pub fn with_update_lock(mut self, lock: KvLock<S>) -> Self {
        self.lock = Some(lock);
        self
    }

    fn lock_key(id: TaskId) -> String { format!("task:{id}") }

    async fn guarded<T>(
        &self,
        id: TaskId,
        op: impl std::future::Future<Output = TaskResult<T>> + Send,
    ) -> TaskResult<T> {
        let Some(lock) = &self.lock else { return op.await };
        // Dropping the guard mid-operation still frees the key.
        let guard = lock.acquire_guard(&Self::lock_key(id)).await?;
        let result = op.await;
        // An unreleased marker lapses with its lease.
        if let Err(err) = guard.release().await {
            tracing::warn!(%id, error = %err, "failed to release task lock");
        }
        result
    }

    async fn read_modify_write(&self, id: TaskId, input: UpdateTask) -> TaskResult<()> {
        let field = TaskRecord::field(id);
        let raw = self
            .store
            .hget(KEY_TASK_MAP, &field)
            .await
            .context("failed to get task")?
            .ok_or(TaskError::NotFound(id))?;
        let mut task = TaskRecord::decode(&raw)?.into_task()?;
        input.apply(&mut task);
        let encoded = TaskRecord::from(task).encode()?;
        self.store
            .hset(KEY_TASK_MAP, &field, &encoded)
            .await
            .context("failed to update task")?;
        tracing::debug!(%id, "task updated");
        Ok(())
    }

    async fn remove(&self, id: TaskId) -> TaskResult<()> {
        let removed = self
            .store
            .hdel(KEY_TASK_MAP, &TaskRecord::field(id))
            .await
            .context("failed to delete task")?;
        if !removed {
            return Err(TaskError::NotFound(id));
        }
        tracing::debug!(%id, "task deleted");
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore + Clone> TaskRepository for KvTaskRepository<S> {
    async fn create(&self, input: CreateTask) -> TaskResult<TaskId> {
        let next = self
            .store
            .incr(KEY_TASK_AUTO_INCREMENT_ID)
            .await
            .context("failed to allocate task id")?;
        let id = TaskId(u64::try_from(next).context("task id counter went negative")?);
        let record =
            TaskRecord { id: id.0, name: input.name, status: TaskStatus::Incomplete.code() };
        self.store
            .hset(KEY_TASK_MAP, &TaskRecord::field(id), &record.encode()?)
            .await
            .context("failed to create task")?;
        tracing::debug!(%id, "task created");
        Ok(id)
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let entries = self.store.hgetall(KEY_TASK_MAP).await.context("failed to list tasks")?;
        let mut records = entries
            .iter()
            .map(|(_, raw)| TaskRecord::decode(raw))
            .collect::<TaskResult<Vec<_>>>()?;
        records.sort_by_key(|record| record.id);
        records.into_iter().map(TaskRecord::into_task).collect()
    }

    async fn update(&self, id: TaskId, input: UpdateTask) -> TaskResult<()> {
        self.guarded(id, self.read_modify_write(id, input)).await
    }

    async fn delete(&self, id: TaskId) -> TaskResult<()> {
        self.guarded(id, self.remove(id)).await
    }
}
