use crate::models::tasks::TaskStatus;

/// Position for a task appended to a column whose current maximum is `max`.
///
/// An empty column behaves as if its maximum were -1, so the first task
/// lands at 0.
pub fn next_position(max: Option<i32>) -> i32 {
    max.unwrap_or(-1).saturating_add(1)
}

/// How an update decides the task's persisted position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionPlan {
    /// Leave the stored position untouched.
    Keep,
    /// Write the caller-supplied position as is (reordering within a column).
    Explicit(i32),
    /// Move to the end of the given column, ignoring any caller position.
    AppendTo(TaskStatus),
}

/// Resolves the position rule for an update against the stored status.
///
/// A real status change always appends to the end of the destination column.
/// Otherwise an explicit position is honored verbatim.
pub fn plan_position(
    stored_status: TaskStatus,
    requested_status: Option<TaskStatus>,
    requested_position: Option<i32>,
) -> PositionPlan {
    match requested_status {
        Some(status) if status != stored_status => PositionPlan::AppendTo(status),
        _ => match requested_position {
            Some(position) => PositionPlan::Explicit(position),
            None => PositionPlan::Keep,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{PositionPlan, next_position, plan_position};
    use crate::models::tasks::TaskStatus;

    #[test]
    fn empty_column_starts_at_zero() {
        assert_eq!(next_position(None), 0);
    }

    #[test]
    fn appends_after_current_max() {
        assert_eq!(next_position(Some(0)), 1);
        assert_eq!(next_position(Some(41)), 42);
    }

    #[test]
    fn sequential_appends_are_contiguous() {
        let mut max = None;
        let mut positions = Vec::new();
        for _ in 0..5 {
            let position = next_position(max);
            positions.push(position);
            max = Some(position);
        }
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn status_change_overrides_explicit_position() {
        let plan = plan_position(TaskStatus::Todo, Some(TaskStatus::Done), Some(0));
        assert_eq!(plan, PositionPlan::AppendTo(TaskStatus::Done));
    }

    #[test]
    fn same_status_keeps_explicit_position() {
        let plan = plan_position(TaskStatus::Todo, Some(TaskStatus::Todo), Some(7));
        assert_eq!(plan, PositionPlan::Explicit(7));
    }

    #[test]
    fn no_status_no_position_keeps_stored_value() {
        assert_eq!(plan_position(TaskStatus::InProgress, None, None), PositionPlan::Keep);
        assert_eq!(
            plan_position(TaskStatus::InProgress, Some(TaskStatus::InProgress), None),
            PositionPlan::Keep
        );
    }
}
