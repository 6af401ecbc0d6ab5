use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Completion state of a task. Travels as the integer code from [`TaskStatus::code`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    Incomplete,
    Completed,
}

impl TaskStatus {
    pub fn code(self) -> i64 {
        match self {
            TaskStatus::Incomplete => 0,
            TaskStatus::Completed => 1,
        }
    }

    /// Closed-set lookup; any code other than 0 or 1 is rejected.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TaskStatus::Incomplete),
            1 => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTask {
    pub name: String,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    pub fn apply(self, task: &mut Task) {
        if let Some(name) = self.name { task.name = name; }
        if let Some(status) = self.status { task.status = status; }
    }
}
