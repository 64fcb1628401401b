use serde::Serialize;

use crate::models::tasks::TaskStatus;

/// Number of tasks per status column.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

impl StatusCounts {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        let mut counts = Self::default();
        for status in statuses {
            counts.add(status, 1);
        }
        counts
    }

    pub fn add(&mut self, status: TaskStatus, count: i64) {
        match status {
            TaskStatus::Todo => self.todo += count,
            TaskStatus::InProgress => self.in_progress += count,
            TaskStatus::Done => self.done += count,
        }
    }

    /// Adds a grouped count keyed by the raw status name. Unknown names are
    /// ignored.
    pub fn add_named(&mut self, status: &str, count: i64) {
        if let Some(status) = TaskStatus::parse(status) {
            self.add(status, count);
        }
    }

    pub fn total(&self) -> i64 {
        self.todo + self.in_progress + self.done
    }
}

/// Percentage of done tasks, rounded half up on the exact ratio. Zero when
/// there are no tasks.
pub fn completion_rate(done: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (200 * done.max(0) + total) / (2 * total)
}
