use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::models::tasks::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortField {
    #[default]
    Position,
    CreatedAt,
    UpdatedAt,
    Priority,
    DueDate,
    Title,
}

impl TaskSortField {
    fn default_direction(self) -> SortDirection {
        match self {
            TaskSortField::CreatedAt | TaskSortField::UpdatedAt => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: TaskSortField,
    pub direction: SortDirection,
}

impl Default for TaskSort {
    fn default() -> Self {
        Self::new(TaskSortField::default(), None)
    }
}

impl TaskSort {
    /// Timestamps default to newest first, everything else ascending.
    pub fn new(field: TaskSortField, direction: Option<SortDirection>) -> Self {
        Self {
            field,
            direction: direction.unwrap_or_else(|| field.default_direction()),
        }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = match self.field {
            TaskSortField::Position => a
                .position
                .cmp(&b.position)
                .then_with(|| b.created_at.cmp(&a.created_at)),
            TaskSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            TaskSortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
            TaskSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            TaskSortField::DueDate => {
                // Undated tasks stay at the bottom in both directions.
                return match (a.due_date, b.due_date) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(left), Some(right)) => self.directed(left.cmp(&right)),
                };
            }
        };
        self.directed(ordering)
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DueDateRange {
    #[default]
    All,
    Overdue,
    Today,
    Week,
    Month,
}

impl DueDateRange {
    pub fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
        if self == DueDateRange::All {
            return true;
        }
        let Some(due) = task.due_date else {
            return false;
        };

        let today = now.date_naive();
        let due_day = due.date_naive();
        match self {
            DueDateRange::All => true,
            DueDateRange::Overdue => due_day < today && task.status != TaskStatus::Done,
            DueDateRange::Today => due_day == today,
            DueDateRange::Week => due_day >= today && due_day < today + Duration::days(7),
            DueDateRange::Month => due_day >= today && due_day < today + Duration::days(30),
        }
    }
}

/// Combined quick filters. Empty sets match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub statuses: Vec<TaskStatus>,
    pub priorities: Vec<TaskPriority>,
    pub assignees: Vec<String>,
    pub due: DueDateRange,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&task.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }
        if !self.assignees.is_empty() && !matches_assignee(task, &self.assignees) {
            return false;
        }
        if !self.due.matches(task, now) {
            return false;
        }
        match &self.search {
            Some(query) => matches_search(task, query),
            None => true,
        }
    }
}

/// Case-insensitive substring match on title or description.
pub fn matches_search(task: &Task, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(&query)
        || task
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(&query))
}

fn matches_assignee(task: &Task, assignees: &[String]) -> bool {
    let Some(assigned) = task.assigned_to.as_deref() else {
        return false;
    };
    let assigned = assigned.trim();
    assignees
        .iter()
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(assigned))
}

pub fn apply(
    mut tasks: Vec<Task>,
    filter: &TaskFilter,
    sort: TaskSort,
    now: DateTime<Utc>,
) -> Vec<Task> {
    tasks.retain(|task| filter.matches(task, now));
    tasks.sort_by(|a, b| sort.compare(a, b));
    tasks
}

/// Parses a comma separated filter list. `all` or an empty value disables
/// the filter. Returns the first unrecognized value on failure.
pub fn parse_list<T>(raw: Option<&str>, parse: fn(&str) -> Option<T>) -> Result<Vec<T>, String>
where
    T: PartialEq,
{
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut values = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        if part == "all" {
            return Ok(Vec::new());
        }
        let value = parse(part).ok_or_else(|| part.to_string())?;
        if !values.contains(&value) {
            values.push(value);
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::{
        DueDateRange, SortDirection, TaskFilter, TaskSort, TaskSortField, apply, matches_search,
        parse_list,
    };
    use crate::models::tasks::{Task, TaskPriority, TaskStatus};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn task(title: &str, minutes: i64) -> Task {
        let created = now() - Duration::minutes(minutes);
        Task {
            id: Uuid::now_v7(),
            board_id: Uuid::nil(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            assigned_to: None,
            position: 0,
            created_at: created,
            updated_at: created,
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let mut with_description = task("Deploy", 1);
        with_description.description = Some("Roll out the API Gateway".to_string());

        assert!(matches_search(&with_description, "gateway"));
        assert!(matches_search(&with_description, "DEPLOY"));
        assert!(!matches_search(&with_description, "database"));
        assert!(matches_search(&task("Anything", 1), "   "));
    }

    #[test]
    fn default_sort_is_position_then_newest() {
        let mut first = task("first", 10);
        first.position = 0;
        let mut older_tie = task("older-tie", 30);
        older_tie.position = 1;
        let mut newer_tie = task("newer-tie", 5);
        newer_tie.position = 1;

        let sorted = apply(
            vec![older_tie, newer_tie, first],
            &TaskFilter::default(),
            TaskSort::default(),
            now(),
        );
        assert_eq!(titles(&sorted), vec!["first", "newer-tie", "older-tie"]);
    }

    #[test]
    fn priority_sort_puts_high_first() {
        let mut low = task("low", 1);
        low.priority = TaskPriority::Low;
        let mut high = task("high", 2);
        high.priority = TaskPriority::High;
        let medium = task("medium", 3);

        let sorted = apply(
            vec![low, medium, high],
            &TaskFilter::default(),
            TaskSort::new(TaskSortField::Priority, None),
            now(),
        );
        assert_eq!(titles(&sorted), vec!["high", "medium", "low"]);
    }

    #[test]
    fn due_date_sort_keeps_undated_last_in_both_directions() {
        let mut soon = task("soon", 1);
        soon.due_date = Some(now() + Duration::days(1));
        let mut later = task("later", 2);
        later.due_date = Some(now() + Duration::days(5));
        let undated = task("undated", 3);

        let asc = apply(
            vec![undated.clone(), later.clone(), soon.clone()],
            &TaskFilter::default(),
            TaskSort::new(TaskSortField::DueDate, Some(SortDirection::Asc)),
            now(),
        );
        assert_eq!(titles(&asc), vec!["soon", "later", "undated"]);

        let desc = apply(
            vec![undated, soon, later],
            &TaskFilter::default(),
            TaskSort::new(TaskSortField::DueDate, Some(SortDirection::Desc)),
            now(),
        );
        assert_eq!(titles(&desc), vec!["later", "soon", "undated"]);
    }

    #[test]
    fn created_at_defaults_to_newest_first() {
        let sorted = apply(
            vec![task("old", 60), task("new", 1)],
            &TaskFilter::default(),
            TaskSort::new(TaskSortField::CreatedAt, None),
            now(),
        );
        assert_eq!(titles(&sorted), vec!["new", "old"]);
    }

    #[test]
    fn overdue_excludes_done_tasks() {
        let mut late = task("late", 1);
        late.due_date = Some(now() - Duration::days(2));
        let mut late_done = late.clone();
        late_done.status = TaskStatus::Done;

        assert!(DueDateRange::Overdue.matches(&late, now()));
        assert!(!DueDateRange::Overdue.matches(&late_done, now()));
        assert!(!DueDateRange::Today.matches(&late, now()));
        assert!(!DueDateRange::Week.matches(&task("undated", 1), now()));
        assert!(DueDateRange::All.matches(&task("undated", 1), now()));
    }

    #[test]
    fn week_and_month_windows() {
        let mut in_five_days = task("five", 1);
        in_five_days.due_date = Some(now() + Duration::days(5));
        let mut in_twenty_days = task("twenty", 1);
        in_twenty_days.due_date = Some(now() + Duration::days(20));

        assert!(DueDateRange::Week.matches(&in_five_days, now()));
        assert!(!DueDateRange::Week.matches(&in_twenty_days, now()));
        assert!(DueDateRange::Month.matches(&in_twenty_days, now()));
    }

    #[test]
    fn combined_filter_requires_every_criterion() {
        let mut mine = task("mine", 1);
        mine.assigned_to = Some("Jane Smith".to_string());
        mine.priority = TaskPriority::High;
        let mut theirs = task("theirs", 2);
        theirs.assigned_to = Some("John Doe".to_string());
        theirs.priority = TaskPriority::High;

        let filter = TaskFilter {
            priorities: vec![TaskPriority::High],
            assignees: vec!["jane smith".to_string()],
            ..TaskFilter::default()
        };

        let result = apply(vec![mine, theirs], &filter, TaskSort::default(), now());
        assert_eq!(titles(&result), vec!["mine"]);
    }

    #[test]
    fn parse_list_handles_all_and_rejects_unknown() {
        assert_eq!(parse_list(None, TaskStatus::parse), Ok(vec![]));
        assert_eq!(parse_list(Some("all"), TaskStatus::parse), Ok(vec![]));
        assert_eq!(
            parse_list(Some("todo, done,todo"), TaskStatus::parse),
            Ok(vec![TaskStatus::Todo, TaskStatus::Done])
        );
        assert_eq!(
            parse_list(Some("todo,blocked"), TaskStatus::parse),
            Err("blocked".to_string())
        );
    }
}
