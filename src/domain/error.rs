use thiserror::Error;

use super::task::TaskId;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),

    #[error("task not found: id={0}")]
    NotFound(TaskId),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;
