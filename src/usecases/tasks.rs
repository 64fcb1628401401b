use std::collections::HashMap;

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    dto::tasks::{
        CreateTaskRequest, ReplaceTaskLabelsRequest, TaskListQuery, TaskWithRelations,
        UpdateTaskRequest,
    },
    error::AppError,
    kanban::{
        filters::{self, TaskFilter, TaskSort},
        position::{PositionPlan, next_position, plan_position},
    },
    models::{
        labels::TaskLabel,
        subtasks::Subtask,
        tasks::{Task, TaskPriority, TaskStatus},
    },
    repositories::{
        boards as board_repo, labels as label_repo, subtasks as subtask_repo,
        tasks::{self as task_repo, NewTask, TaskChanges},
    },
    telemetry::BusinessEvent,
    usecases::{boards::board_not_found, validation},
};

pub struct TaskService;

impl TaskService {
    pub async fn list_tasks(pool: &PgPool, query: TaskListQuery) -> Result<Vec<Task>, AppError> {
        let (filter, sort) = build_query(query.clone())?;
        let tasks = task_repo::list_tasks(pool, query.board_id).await?;

        Ok(filters::apply(tasks, &filter, sort, Utc::now()))
    }

    pub async fn get_task(pool: &PgPool, task_id: Uuid) -> Result<TaskWithRelations, AppError> {
        let task = task_repo::find_task(pool, task_id)
            .await?
            .ok_or_else(task_not_found)?;
        let mut tasks = Self::with_relations(pool, vec![task]).await?;

        tasks.pop().ok_or_else(task_not_found)
    }

    /// Appends a new task to the end of its column.
    pub async fn create_task(pool: &PgPool, req: CreateTaskRequest) -> Result<Task, AppError> {
        let new_task = validate_new_task(req.clone())?;
        let label_ids = dedupe(req.label_ids.unwrap_or_default());

        let mut tx = pool.begin().await?;
        if !board_repo::lock_board(&mut tx, new_task.board_id).await? {
            return Err(board_not_found());
        }
        let max = task_repo::max_position(&mut tx, new_task.board_id, new_task.status).await?;
        let task = task_repo::insert_task(
            &mut tx,
            NewTask {
                position: next_position(max),
                ..new_task
            },
        )
        .await?;
        if !label_ids.is_empty() {
            assign_labels(&mut tx, task.id, &label_ids).await?;
        }
        tx.commit().await?;

        BusinessEvent::TaskCreated {
            task_id: task.id,
            board_id: task.board_id,
            status: task.status,
            position: task.position,
        }
        .log();
        Ok(task)
    }

    /// Applies a partial update. A status change moves the task to the end
    /// of the destination column regardless of any requested position.
    pub async fn update_task(
        pool: &PgPool,
        task_id: Uuid,
        req: UpdateTaskRequest,
    ) -> Result<Task, AppError> {
        let label_ids = req.label_ids.clone().map(dedupe);
        let mut changes = validate_task_changes(req)?;

        let mut tx = pool.begin().await?;
        let board_id = task_repo::find_board_id(&mut tx, task_id)
            .await?
            .ok_or_else(task_not_found)?;
        // Lock before reading the stored status so a concurrent move cannot
        // slip between the read and the append.
        board_repo::lock_board(&mut tx, board_id).await?;
        let stored = task_repo::find_task_in_tx(&mut tx, task_id)
            .await?
            .ok_or_else(task_not_found)?;

        match plan_position(stored.status, changes.status, changes.position) {
            PositionPlan::Keep => changes.position = None,
            PositionPlan::Explicit(position) => changes.position = Some(position),
            PositionPlan::AppendTo(status) => {
                let max = task_repo::max_position(&mut tx, board_id, status).await?;
                changes.position = Some(next_position(max));
            }
        }

        let task = task_repo::update_task(&mut tx, task_id, changes).await?;
        if let Some(label_ids) = label_ids {
            assign_labels(&mut tx, task_id, &label_ids).await?;
        }
        tx.commit().await?;

        if task.status != stored.status {
            BusinessEvent::TaskMoved {
                task_id,
                board_id,
                from: stored.status,
                to: task.status,
                position: task.position,
            }
            .log();
        }
        Ok(task)
    }

    pub async fn replace_labels(
        pool: &PgPool,
        task_id: Uuid,
        req: ReplaceTaskLabelsRequest,
    ) -> Result<Vec<TaskLabel>, AppError> {
        let label_ids = dedupe(req.label_ids);

        let mut tx = pool.begin().await?;
        if !task_repo::lock_task(&mut tx, task_id).await? {
            return Err(task_not_found());
        }
        assign_labels(&mut tx, task_id, &label_ids).await?;
        tx.commit().await?;

        label_repo::list_task_labels(pool, &[task_id]).await
    }

    pub async fn delete_task(pool: &PgPool, task_id: Uuid) -> Result<(), AppError> {
        let board_id = task_repo::delete_task(pool, task_id)
            .await?
            .ok_or_else(task_not_found)?;

        BusinessEvent::TaskDeleted { task_id, board_id }.log();
        Ok(())
    }

    /// Attaches labels and subtasks, keeping the order of `tasks`.
    pub async fn with_relations(
        pool: &PgPool,
        tasks: Vec<Task>,
    ) -> Result<Vec<TaskWithRelations>, AppError> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }
        let task_ids: Vec<Uuid> = tasks.iter().map(|task| task.id).collect();
        let (labels, subtasks) = futures::try_join!(
            label_repo::list_task_labels(pool, &task_ids),
            subtask_repo::list_subtasks(pool, &task_ids),
        )?;

        Ok(group_relations(tasks, labels, subtasks))
    }
}

pub(crate) fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".to_string())
}

fn group_relations(
    tasks: Vec<Task>,
    labels: Vec<TaskLabel>,
    subtasks: Vec<Subtask>,
) -> Vec<TaskWithRelations> {
    let mut labels_by_task: HashMap<Uuid, Vec<TaskLabel>> = HashMap::new();
    for label in labels {
        labels_by_task.entry(label.task_id).or_default().push(label);
    }
    let mut subtasks_by_task: HashMap<Uuid, Vec<Subtask>> = HashMap::new();
    for subtask in subtasks {
        subtasks_by_task
            .entry(subtask.task_id)
            .or_default()
            .push(subtask);
    }

    tasks
        .into_iter()
        .map(|task| TaskWithRelations {
            labels: labels_by_task.remove(&task.id).unwrap_or_default(),
            subtasks: subtasks_by_task.remove(&task.id).unwrap_or_default(),
            task,
        })
        .collect()
}

async fn assign_labels(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    label_ids: &[Uuid],
) -> Result<(), AppError> {
    if !label_ids.is_empty() {
        let existing = label_repo::count_existing(tx, label_ids).await?;
        if existing != label_ids.len() as i64 {
            return Err(AppError::ValidationError(
                "One or more labels do not exist".to_string(),
            ));
        }
    }
    label_repo::replace_task_labels(tx, task_id, label_ids).await
}

fn dedupe(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

fn build_query(query: TaskListQuery) -> Result<(TaskFilter, TaskSort), AppError> {
    let statuses = filters::parse_list(query.status.as_deref(), TaskStatus::parse)
        .map_err(|value| AppError::ValidationError(format!("Invalid status: {value}")))?;
    let priorities = filters::parse_list(query.priority.as_deref(), TaskPriority::parse)
        .map_err(|value| AppError::ValidationError(format!("Invalid priority: {value}")))?;
    let assignees = query
        .assignee
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let filter = TaskFilter {
        statuses,
        priorities,
        assignees,
        due: query.due.unwrap_or_default(),
        search: query.search.filter(|search| !search.trim().is_empty()),
    };
    let sort = TaskSort::new(query.sort.unwrap_or_default(), query.direction);

    Ok((filter, sort))
}

fn validate_new_task(req: CreateTaskRequest) -> Result<NewTask, AppError> {
    let title = validation::required_text(
        req.title.as_deref(),
        validation::TASK_TITLE_MAX,
        "Task title is required",
        "Task title must be less than 200 characters",
    )?;
    let description = validation::optional_text(
        req.description,
        validation::TASK_DESCRIPTION_MAX,
        "Description must be less than 2000 characters",
    )?;
    let assigned_to = validation::optional_text(
        req.assigned_to,
        validation::ASSIGNEE_MAX,
        "Assigned to must be less than 100 characters",
    )?;
    let board_id = req
        .board_id
        .ok_or_else(|| AppError::ValidationError("Board ID is required".to_string()))?;

    Ok(NewTask {
        id: Uuid::now_v7(),
        board_id,
        title,
        description,
        status: req.status.unwrap_or(TaskStatus::Todo),
        priority: req.priority.unwrap_or(TaskPriority::Medium),
        due_date: req.due_date,
        assigned_to,
        position: 0,
    })
}

fn validate_task_changes(req: UpdateTaskRequest) -> Result<TaskChanges, AppError> {
    let title = match req.title {
        Some(title) => Some(validation::required_text(
            Some(&title),
            validation::TASK_TITLE_MAX,
            "Task title is required",
            "Task title must be less than 200 characters",
        )?),
        None => None,
    };
    let description = validation::optional_patch_text(
        req.description,
        validation::TASK_DESCRIPTION_MAX,
        "Description must be less than 2000 characters",
    )?;
    let assigned_to = validation::optional_patch_text(
        req.assigned_to,
        validation::ASSIGNEE_MAX,
        "Assigned to must be less than 100 characters",
    )?;
    let position = req.position.map(validation::position).transpose()?;

    Ok(TaskChanges {
        title,
        description,
        status: req.status,
        priority: req.priority,
        due_date: req.due_date,
        assigned_to,
        position,
    })
}
