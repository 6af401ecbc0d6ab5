use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{
    error::{TaskError, TaskResult},
    repository::TaskRepository,
    task::{CreateTask, Task, TaskId, TaskStatus, UpdateTask},
};

/// Process-local repository. Lookups by id are a linear scan over the task list,
/// which is fine for the handful of tasks a single process holds.
#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    last_id: u64,
    tasks: Vec<StoredTask>,
}

#[derive(Clone)]
struct StoredTask {
    task: Task,
    created_at: DateTime<Utc>,
}

impl State {
    fn position(&self, id: TaskId) -> TaskResult<usize> {
        self.tasks.iter().position(|stored| stored.task.id == id).ok_or(TaskError::NotFound(id))
    }
}

impl InMemoryTaskRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<TaskId> {
        let mut state = self.state.write();
        state.last_id += 1;
        let id = TaskId(state.last_id);
        state.tasks.push(StoredTask {
            task: Task { id, name: input.name, status: TaskStatus::Incomplete },
            created_at: Utc::now(),
        });
        tracing::debug!(%id, "task created");
        Ok(id)
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let mut tasks = self.state.read().tasks.clone();
        tasks.sort_by_key(|stored| (stored.created_at, stored.task.id));
        Ok(tasks.into_iter().map(|stored| stored.task).collect())
    }

    async fn update(&self, id: TaskId, input: UpdateTask) -> TaskResult<()> {
        let mut state = self.state.write();
        let index = state.position(id)?;
        input.apply(&mut state.tasks[index].task);
        tracing::debug!(%id, "task updated");
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskResult<()> {
        let mut state = self.state.write();
        let index = state.position(id)?;
        state.tasks.remove(index);
        tracing::debug!(%id, "task deleted");
        Ok(())
    }
}
