use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::tasks::TaskStatus;

#[derive(Debug, Serialize)]
#[serde(tag = "event_type")]
pub enum BusinessEvent {
    BoardCreated {
        board_id: Uuid,
    },
    BoardUpdated {
        board_id: Uuid,
        fields: Vec<String>,
    },
    BoardDeleted {
        board_id: Uuid,
        tasks_removed: i64,
    },
    TaskCreated {
        task_id: Uuid,
        board_id: Uuid,
        status: TaskStatus,
        position: i32,
    },
    TaskMoved {
        task_id: Uuid,
        board_id: Uuid,
        from: TaskStatus,
        to: TaskStatus,
        position: i32,
    },
    TaskDeleted {
        task_id: Uuid,
        board_id: Uuid,
    },
    LabelCreated {
        label_id: Uuid,
    },
    LabelDeleted {
        label_id: Uuid,
    },
    DataExported {
        format: &'static str,
        boards: usize,
        tasks: usize,
    },
}

impl BusinessEvent {
    pub fn log(&self) {
        let event_json = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        info!(
            target: "business_events",
            event = %event_json,
            "Business event occurred"
        );
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::BusinessEvent;
    use crate::models::tasks::TaskStatus;

    #[test]
    fn task_moved_serializes_with_tag_and_snake_case_status() {
        let event = BusinessEvent::TaskMoved {
            task_id: Uuid::nil(),
            board_id: Uuid::nil(),
            from: TaskStatus::Todo,
            to: TaskStatus::InProgress,
            position: 3,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_type"], "TaskMoved");
        assert_eq!(value["from"], "todo");
        assert_eq!(value["to"], "in_progress");
        assert_eq!(value["position"], 3);
    }
}
