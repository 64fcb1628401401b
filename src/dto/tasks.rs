use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dto::double_option,
    kanban::filters::{DueDateRange, SortDirection, TaskSortField},
    models::{
        labels::TaskLabel,
        subtasks::Subtask,
        tasks::{Task, TaskPriority, TaskStatus},
    },
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub board_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub label_ids: Option<Vec<Uuid>>,
}

/// Partial task update. A status change overrides `position` with the end of
/// the destination column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<String>>,
    pub position: Option<i32>,
    pub label_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTaskLabelsRequest {
    pub label_ids: Vec<Uuid>,
}

/// Query string of `GET /api/tasks`. `status` and `priority` are comma
/// separated lists where `all` disables the filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub board_id: Option<Uuid>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub due: Option<DueDateRange>,
    pub search: Option<String>,
    pub sort: Option<TaskSortField>,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskWithRelations {
    #[serde(flatten)]
    pub task: Task,
    pub labels: Vec<TaskLabel>,
    pub subtasks: Vec<Subtask>,
}
