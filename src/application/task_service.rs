use crate::domain::error::{TaskError, TaskResult};
use crate::domain::repository::TaskRepository;
use crate::domain::task::{CreateTask, Task, TaskId, TaskStatus, UpdateTask};
use async_trait::async_trait;

/// Update request as received from a client; `status` is the raw integer code
/// and is checked against [`TaskStatus`] before it reaches storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub status: Option<i64>,
}

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn create_task(&self, input: CreateTask) -> TaskResult<TaskId>;
    async fn list_tasks(&self) -> TaskResult<Vec<Task>>;
    async fn update_task(&self, id: TaskId, input: UpdateTaskRequest) -> TaskResult<()>;
    async fn delete_task(&self, id: TaskId) -> TaskResult<()>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn create_task(&self, input: CreateTask) -> TaskResult<TaskId> {
        if input.name.is_empty() {
            return Err(TaskError::Validation("task name is required".into()));
        }
        self.repo.create(input).await
    }

    async fn list_tasks(&self) -> TaskResult<Vec<Task>> { self.repo.list().await }

    async fn update_task(&self, id: TaskId, input: UpdateTaskRequest) -> TaskResult<()> {
        let status = match input.status {
            Some(code) => Some(
                TaskStatus::from_code(code)
                    .ok_or_else(|| TaskError::Validation(format!("invalid task status: {code}")))?,
            ),
            None => None,
        };
        self.repo.update(id, UpdateTask { name: input.name, status }).await
    }

    async fn delete_task(&self, id: TaskId) -> TaskResult<()> { self.repo.delete(id).await }
}
