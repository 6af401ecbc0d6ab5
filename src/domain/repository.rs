use async_trait::async_trait;

use super::error::TaskResult;
use super::task::{CreateTask, Task, TaskId, UpdateTask};

/// Storage for tasks. Implementations assign ids and keep listing in creation order.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Stores a new incomplete task and returns the id it was given.
    async fn create(&self, input: CreateTask) -> TaskResult<TaskId>;
    /// All tasks, oldest first.
    async fn list(&self) -> TaskResult<Vec<Task>>;
    async fn update(&self, id: TaskId, input: UpdateTask) -> TaskResult<()>;
    async fn delete(&self, id: TaskId) -> TaskResult<()>;
}
