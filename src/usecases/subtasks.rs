use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dto::subtasks::{CreateSubtaskRequest, UpdateSubtaskRequest},
    error::AppError,
    kanban::position::next_position,
    models::subtasks::Subtask,
    repositories::{subtasks as subtask_repo, tasks as task_repo},
    usecases::{tasks::task_not_found, validation},
};

pub struct SubtaskService;

impl SubtaskService {
    pub async fn list_subtasks(pool: &PgPool, task_id: Uuid) -> Result<Vec<Subtask>, AppError> {
        task_repo::find_task(pool, task_id)
            .await?
            .ok_or_else(task_not_found)?;

        subtask_repo::list_subtasks(pool, &[task_id]).await
    }

    pub async fn create_subtask(
        pool: &PgPool,
        task_id: Uuid,
        req: CreateSubtaskRequest,
    ) -> Result<Subtask, AppError> {
        let title = subtask_title(req.title.as_deref())?;

        let mut tx = pool.begin().await?;
        if !task_repo::lock_task(&mut tx, task_id).await? {
            return Err(task_not_found());
        }
        let max = subtask_repo::max_position(&mut tx, task_id).await?;
        let subtask = subtask_repo::insert_subtask(
            &mut tx,
            Uuid::now_v7(),
            task_id,
            title,
            next_position(max),
        )
        .await?;
        tx.commit().await?;

        Ok(subtask)
    }

    pub async fn update_subtask(
        pool: &PgPool,
        task_id: Uuid,
        subtask_id: Uuid,
        req: UpdateSubtaskRequest,
    ) -> Result<Subtask, AppError> {
        let title = req
            .title
            .as_deref()
            .map(|title| subtask_title(Some(title)))
            .transpose()?;
        let position = req.position.map(validation::position).transpose()?;

        subtask_repo::update_subtask(pool, task_id, subtask_id, title, req.completed, position)
            .await?
            .ok_or_else(subtask_not_found)
    }

    pub async fn delete_subtask(
        pool: &PgPool,
        task_id: Uuid,
        subtask_id: Uuid,
    ) -> Result<(), AppError> {
        if !subtask_repo::delete_subtask(pool, task_id, subtask_id).await? {
            return Err(subtask_not_found());
        }
        Ok(())
    }
}

fn subtask_not_found() -> AppError {
    AppError::NotFound("Subtask not found".to_string())
}

fn subtask_title(title: Option<&str>) -> Result<String, AppError> {
    validation::required_text(
        title,
        validation::SUBTASK_TITLE_MAX,
        "Subtask title is required",
        "Subtask title must be less than 200 characters",
    )
}
