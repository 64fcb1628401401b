//! Store-backed behavior. These need a reachable Postgres in `DATABASE_URL`:
//! `cargo test -- --ignored`.

use futures::future::join_all;
use sqlx::PgPool;
use taskboard::{
    dto::{
        boards::CreateBoardRequest,
        labels::{CreateLabelRequest, UpdateLabelRequest},
        subtasks::{CreateSubtaskRequest, UpdateSubtaskRequest},
        tasks::{CreateTaskRequest, ReplaceTaskLabelsRequest, UpdateTaskRequest},
    },
    error::AppError,
    models::{
        boards::Board,
        tasks::{Task, TaskStatus},
    },
    repositories::labels::DUPLICATE_LABEL_MESSAGE,
    usecases::{
        analytics::AnalyticsService, boards::BoardService, labels::LabelService,
        subtasks::SubtaskService, tasks::TaskService,
    },
};
use uuid::Uuid;

async fn board(pool: &PgPool, name: &str) -> Board {
    BoardService::create_board(
        pool,
        CreateBoardRequest {
            name: Some(name.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

async fn task(pool: &PgPool, board_id: Uuid, title: &str, status: TaskStatus) -> Task {
    TaskService::create_task(
        pool,
        CreateTaskRequest {
            board_id: Some(board_id),
            title: Some(title.to_string()),
            status: Some(status),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

async fn label(pool: &PgPool, name: &str) -> Result<taskboard::models::labels::Label, AppError> {
    LabelService::create_label(
        pool,
        CreateLabelRequest {
            name: Some(name.to_string()),
            color: None,
        },
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn sequential_creates_fill_positions_from_zero(pool: PgPool) {
    let board = board(&pool, "Positions").await;

    let mut positions = Vec::new();
    for index in 0..4 {
        let task = task(&pool, board.id, &format!("t{index}"), TaskStatus::Todo).await;
        positions.push(task.position);
    }
    let first_done = task(&pool, board.id, "done", TaskStatus::Done).await;

    assert_eq!(positions, vec![0, 1, 2, 3]);
    assert_eq!(first_done.position, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn status_change_appends_and_ignores_requested_position(pool: PgPool) {
    let board = board(&pool, "Moves").await;
    let moving = task(&pool, board.id, "moving", TaskStatus::Todo).await;
    task(&pool, board.id, "d0", TaskStatus::Done).await;
    task(&pool, board.id, "d1", TaskStatus::Done).await;

    let moved = TaskService::update_task(
        &pool,
        moving.id,
        UpdateTaskRequest {
            status: Some(TaskStatus::Done),
            position: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(moved.status, TaskStatus::Done);
    assert_eq!(moved.position, 2);

    let into_empty = TaskService::update_task(
        &pool,
        moved.id,
        UpdateTaskRequest {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(into_empty.position, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_creates_never_share_a_position(pool: PgPool) {
    let board = board(&pool, "Race").await;

    let created = join_all((0..8).map(|index| {
        TaskService::create_task(
            &pool,
            CreateTaskRequest {
                board_id: Some(board.id),
                title: Some(format!("racer {index}")),
                status: Some(TaskStatus::Todo),
                ..Default::default()
            },
        )
    }))
    .await;

    let mut positions = created
        .into_iter()
        .map(|result| result.unwrap().position)
        .collect::<Vec<_>>();
    positions.sort_unstable();
    assert_eq!(positions, (0..8).collect::<Vec<_>>());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_create_and_move_append_to_distinct_slots(pool: PgPool) {
    let board = board(&pool, "Race moves").await;
    task(&pool, board.id, "d0", TaskStatus::Done).await;
    task(&pool, board.id, "d1", TaskStatus::Done).await;
    let mut movers = Vec::new();
    for index in 0..3 {
        movers.push(task(&pool, board.id, &format!("mover {index}"), TaskStatus::Todo).await);
    }

    let creates = join_all((0..3).map(|index| {
        TaskService::create_task(
            &pool,
            CreateTaskRequest {
                board_id: Some(board.id),
                title: Some(format!("fresh {index}")),
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
    }));
    let moves = join_all(movers.iter().map(|mover| {
        TaskService::update_task(
            &pool,
            mover.id,
            UpdateTaskRequest {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
    }));
    let (created, moved) = tokio::join!(creates, moves);

    let mut positions = created
        .into_iter()
        .chain(moved)
        .map(|result| {
            let task = result.unwrap();
            assert_eq!(task.status, TaskStatus::Done);
            task.position
        })
        .collect::<Vec<_>>();
    positions.sort_unstable();
    assert_eq!(positions, (2..8).collect::<Vec<_>>());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn same_status_keeps_explicit_position(pool: PgPool) {
    let board = board(&pool, "Reorder").await;
    let first = task(&pool, board.id, "first", TaskStatus::Todo).await;

    let updated = TaskService::update_task(
        &pool,
        first.id,
        UpdateTaskRequest {
            status: Some(TaskStatus::Todo),
            position: Some(7),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.position, 7);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleting_board_cascades_but_keeps_labels(pool: PgPool) {
    let board = board(&pool, "Cascade").await;
    let doomed = task(&pool, board.id, "doomed", TaskStatus::Todo).await;
    let bug = label(&pool, "Bug").await.unwrap();
    TaskService::replace_labels(
        &pool,
        doomed.id,
        ReplaceTaskLabelsRequest {
            label_ids: vec![bug.id],
        },
    )
    .await
    .unwrap();
    SubtaskService::create_subtask(
        &pool,
        doomed.id,
        CreateSubtaskRequest {
            title: Some("step".to_string()),
        },
    )
    .await
    .unwrap();

    BoardService::delete_board(&pool, board.id).await.unwrap();

    let err = TaskService::get_task(&pool, doomed.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kanban.subtask")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kanban.task_label")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
    assert_eq!(LabelService::get_label(&pool, bug.id).await.unwrap().name, "Bug");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn label_names_collide_after_trim_but_not_across_case(pool: PgPool) {
    label(&pool, "Bug").await.unwrap();

    let err = label(&pool, "Bug ").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::ValidationError(message) if message == DUPLICATE_LABEL_MESSAGE
    ));

    let upper = label(&pool, "BUG").await.unwrap();
    let err = LabelService::update_label(
        &pool,
        upper.id,
        UpdateLabelRequest {
            name: Some(" Bug".to_string()),
            color: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn subtask_must_belong_to_path_task(pool: PgPool) {
    let board = board(&pool, "Subtasks").await;
    let owner = task(&pool, board.id, "owner", TaskStatus::Todo).await;
    let other = task(&pool, board.id, "other", TaskStatus::Todo).await;

    let first = SubtaskService::create_subtask(
        &pool,
        owner.id,
        CreateSubtaskRequest {
            title: Some(" one ".to_string()),
        },
    )
    .await
    .unwrap();
    let second = SubtaskService::create_subtask(
        &pool,
        owner.id,
        CreateSubtaskRequest {
            title: Some("two".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(first.title, "one");
    assert_eq!((first.position, second.position), (0, 1));

    let err = SubtaskService::update_subtask(
        &pool,
        other.id,
        first.id,
        UpdateSubtaskRequest {
            completed: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(message) if message == "Subtask not found"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn analytics_and_board_stats_agree(pool: PgPool) {
    let empty = AnalyticsService::summary(&pool).await.unwrap();
    assert_eq!(empty.completion_rate, 0);

    let board = board(&pool, "Stats").await;
    task(&pool, board.id, "a", TaskStatus::Todo).await;
    task(&pool, board.id, "b", TaskStatus::InProgress).await;
    task(&pool, board.id, "c", TaskStatus::Done).await;

    let summary = AnalyticsService::summary(&pool).await.unwrap();
    assert_eq!(summary.total_boards, 1);
    assert_eq!(summary.total_tasks, 3);
    assert_eq!(summary.tasks_by_status.done, 1);
    assert_eq!(summary.completion_rate, 33);
    assert_eq!(summary.recent_activity.len(), 3);
    assert_eq!(summary.recent_activity[0].board.name, "Stats");

    let boards = BoardService::list_boards(&pool).await.unwrap();
    assert_eq!(boards[0].count.tasks, 3);
    assert_eq!(boards[0].stats.in_progress, 1);

    let detail = BoardService::get_board(&pool, board.id).await.unwrap();
    assert_eq!(detail.tasks.len(), 3);
    assert_eq!(detail.stats, summary.tasks_by_status);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn creating_task_on_missing_board_is_not_found(pool: PgPool) {
    let err = TaskService::create_task(
        &pool,
        CreateTaskRequest {
            board_id: Some(Uuid::now_v7()),
            title: Some("orphan".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(message) if message == "Board not found"));
}
