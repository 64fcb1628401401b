use serde::{Deserialize, Serialize};

use crate::{
    dto::{double_option, tasks::TaskWithRelations},
    kanban::analytics::StatusCounts,
    models::boards::Board,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Partial update. `description` and `icon` accept an explicit `null` to
/// clear the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
}

impl UpdateBoardRequest {
    pub fn changed_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name".to_string());
        }
        if self.description.is_some() {
            fields.push("description".to_string());
        }
        if self.color.is_some() {
            fields.push("color".to_string());
        }
        if self.icon.is_some() {
            fields.push("icon".to_string());
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct BoardCount {
    pub tasks: i64,
}

/// Board card on the dashboard.
#[derive(Debug, Serialize)]
pub struct BoardSummary {
    #[serde(flatten)]
    pub board: Board,
    #[serde(rename = "_count")]
    pub count: BoardCount,
    pub stats: StatusCounts,
}

impl BoardSummary {
    pub fn new(board: Board, stats: StatusCounts) -> Self {
        Self {
            board,
            count: BoardCount {
                tasks: stats.total(),
            },
            stats,
        }
    }
}

/// Board page payload with every task in render order.
#[derive(Debug, Serialize)]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub tasks: Vec<TaskWithRelations>,
    #[serde(rename = "_count")]
    pub count: BoardCount,
    pub stats: StatusCounts,
}

impl BoardDetail {
    pub fn new(board: Board, tasks: Vec<TaskWithRelations>) -> Self {
        let stats = StatusCounts::from_statuses(tasks.iter().map(|entry| entry.task.status));
        Self {
            board,
            count: BoardCount {
                tasks: stats.total(),
            },
            tasks,
            stats,
        }
    }
}
