use sqlx::PgPool;

use crate::{
    dto::analytics::AnalyticsResponse,
    error::AppError,
    kanban::analytics::{StatusCounts, completion_rate},
    repositories::{boards as board_repo, tasks as task_repo},
};

const RECENT_ACTIVITY_LIMIT: i64 = 10;

pub struct AnalyticsService;

impl AnalyticsService {
    pub async fn summary(pool: &PgPool) -> Result<AnalyticsResponse, AppError> {
        let (total_boards, total_tasks, grouped, recent_activity) = futures::try_join!(
            board_repo::count_boards(pool),
            task_repo::count_tasks(pool),
            task_repo::count_tasks_by_status(pool),
            task_repo::list_recently_updated(pool, RECENT_ACTIVITY_LIMIT),
        )?;

        let mut tasks_by_status = StatusCounts::default();
        for (status, count) in &grouped {
            tasks_by_status.add_named(status, *count);
        }

        Ok(AnalyticsResponse {
            total_boards,
            total_tasks,
            tasks_by_status,
            completion_rate: completion_rate(tasks_by_status.done, total_tasks),
            recent_activity,
        })
    }
}
