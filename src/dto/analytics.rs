use serde::Serialize;
use uuid::Uuid;

use crate::{kanban::analytics::StatusCounts, models::tasks::Task};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityBoard {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

/// A recently updated task with the board it lives on.
#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    #[serde(flatten)]
    pub task: Task,
    pub board: ActivityBoard,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_boards: i64,
    pub total_tasks: i64,
    pub tasks_by_status: StatusCounts,
    pub completion_rate: i64,
    pub recent_activity: Vec<RecentActivity>,
}
