//! Resets the database to a small demo data set.

use std::env;

use chrono::{TimeZone, Utc};
use sqlx::postgres::PgPoolOptions;
use taskboard::{
    dto::{
        boards::CreateBoardRequest,
        labels::CreateLabelRequest,
        tasks::CreateTaskRequest,
    },
    models::tasks::{TaskPriority, TaskStatus},
    usecases::{boards::BoardService, labels::LabelService, tasks::TaskService},
};

struct SeedTask {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_to: Option<&'static str>,
    due: Option<(i32, u32, u32)>,
}

const fn seed(
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
) -> SeedTask {
    SeedTask {
        title,
        description,
        status,
        priority,
        assigned_to: None,
        due: None,
    }
}

struct SeedBoard {
    name: &'static str,
    description: &'static str,
    color: &'static str,
    icon: &'static str,
    tasks: Vec<SeedTask>,
}

fn boards() -> Vec<SeedBoard> {
    use TaskPriority::{High, Low, Medium};
    use TaskStatus::{Done, InProgress, Todo};

    vec![
        SeedBoard {
            name: "Project Alpha",
            description: "Main product development board",
            color: "#6366f1",
            icon: "rocket",
            tasks: vec![
                seed(
                    "Set up project infrastructure",
                    "Initialize repository, CI pipeline and deployment configs",
                    Done,
                    High,
                ),
                seed(
                    "Design system architecture",
                    "Component diagrams and data flow",
                    Done,
                    High,
                ),
                SeedTask {
                    assigned_to: Some("John Doe"),
                    ..seed(
                        "Implement user authentication",
                        "Session handling with refresh tokens",
                        InProgress,
                        High,
                    )
                },
                SeedTask {
                    assigned_to: Some("Jane Smith"),
                    ..seed(
                        "Build dashboard UI",
                        "Responsive dashboard with charts and metrics",
                        InProgress,
                        Medium,
                    )
                },
                seed("API rate limiting", "Rate limiting middleware", Todo, Medium),
                seed("Write unit tests", "Cover the core flows", Todo, Low),
                SeedTask {
                    due: Some((2026, 2, 15)),
                    ..seed(
                        "Performance optimization",
                        "Optimize database queries and caching",
                        Todo,
                        Medium,
                    )
                },
            ],
        },
        SeedBoard {
            name: "Marketing Campaign",
            description: "Marketing initiatives and content calendar",
            color: "#ec4899",
            icon: "megaphone",
            tasks: vec![
                seed(
                    "Create social media calendar",
                    "Plan posts for the quarter",
                    Done,
                    High,
                ),
                SeedTask {
                    assigned_to: Some("Marketing Team"),
                    ..seed(
                        "Design email newsletter",
                        "New template for product announcements",
                        InProgress,
                        Medium,
                    )
                },
                SeedTask {
                    due: Some((2026, 1, 30)),
                    ..seed("Launch landing page", "A/B test two variations", Todo, High)
                },
                seed("Influencer outreach", "Contact 20 micro-influencers", Todo, Medium),
            ],
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "DATABASE_URL must be set")
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Boards cascade to tasks, subtasks and label links.
    sqlx::query("DELETE FROM kanban.board").execute(&pool).await?;
    sqlx::query("DELETE FROM kanban.label").execute(&pool).await?;

    for (name, color) in [("Bug", "#ef4444"), ("Feature", "#22c55e"), ("Docs", "#3b82f6")] {
        LabelService::create_label(
            &pool,
            CreateLabelRequest {
                name: Some(name.to_string()),
                color: Some(color.to_string()),
            },
        )
        .await?;
    }

    let mut board_count = 0usize;
    let mut task_count = 0usize;
    for seed_board in boards() {
        let board = BoardService::create_board(
            &pool,
            CreateBoardRequest {
                name: Some(seed_board.name.to_string()),
                description: Some(seed_board.description.to_string()),
                color: Some(seed_board.color.to_string()),
                icon: Some(seed_board.icon.to_string()),
            },
        )
        .await?;
        board_count += 1;

        for task in seed_board.tasks {
            let due_date = task.due.and_then(|(year, month, day)| {
                Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
            });
            TaskService::create_task(
                &pool,
                CreateTaskRequest {
                    board_id: Some(board.id),
                    title: Some(task.title.to_string()),
                    description: Some(task.description.to_string()),
                    status: Some(task.status),
                    priority: Some(task.priority),
                    due_date,
                    assigned_to: task.assigned_to.map(str::to_string),
                    label_ids: None,
                },
            )
            .await?;
            task_count += 1;
        }
    }

    println!("seeded {} boards with {} tasks", board_count, task_count);
    Ok(())
}
