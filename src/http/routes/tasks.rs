use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::{routing::{get, put}, Json, Router};
use serde::{Deserialize, Serialize};

use crate::application::task_service::{TaskService, UpdateTaskRequest};
use crate::domain::task::{CreateTask, Task, TaskId};
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct AppState<S: TaskService> { pub service: S }

pub fn router<S: TaskService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/tasks/:id", put(update_task::<S>).delete(delete_task::<S>))
        .with_state(state)
}

/// Wire form of a task; `status` is the integer code.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDetail {
    pub id: u64,
    pub name: String,
    pub status: i64,
}

impl From<Task> for TaskDetail {
    fn from(task: Task) -> Self {
        Self { id: task.id.0, name: task.name, status: task.status.code() }
    }
}

#[derive(Deserialize)]
struct CreateTaskBody { name: String }

#[derive(Deserialize)]
struct UpdateTaskBody { name: Option<String>, status: Option<i64> }

async fn list_tasks<S: TaskService>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<TaskDetail>>, ApiError> {
    let tasks = state.service.list_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskDetail::from).collect()))
}

async fn create_task<S: TaskService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = payload?;
    let id = state.service.create_task(CreateTask { name: body.name }).await?;
    tracing::info!(%id, "task created");
    Ok(StatusCode::CREATED)
}

async fn update_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let request = UpdateTaskRequest { name: body.name, status: body.status };
    state.service.update_task(id, request).await?;
    Ok(StatusCode::OK)
}

async fn delete_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_task(id).await?;
    Ok(StatusCode::OK)
}

/// Ids are positive integers; anything else is rejected before the service is called.
fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(TaskId(id as u64)),
        _ => Err(ApiError::bad_request(format!("invalid task id: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(1))]
    #[case("42", Some(42))]
    #[case("0", None)]
    #[case("-999", None)]
    #[case("a", None)]
    #[case("1.5", None)]
    #[case("99999999999999999999", None)]
    fn parse_id_accepts_positive_integers(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_id(raw).ok().map(|id| id.0), expected);
    }
}
