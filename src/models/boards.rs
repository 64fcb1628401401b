use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const DEFAULT_BOARD_ICON: &str = "clipboard";

/// Colors handed out to boards created without an explicit color.
pub const BOARD_PALETTE: [&str; 10] = [
    "#6366f1", // Indigo
    "#8b5cf6", // Violet
    "#ec4899", // Pink
    "#ef4444", // Red
    "#f97316", // Orange
    "#eab308", // Yellow
    "#22c55e", // Green
    "#14b8a6", // Teal
    "#06b6d4", // Cyan
    "#3b82f6", // Blue
];

/// Picks a palette color from the random tail of a board id.
pub fn palette_color_for(board_id: Uuid) -> &'static str {
    let bytes = board_id.as_bytes();
    let index = usize::from(bytes[bytes.len() - 1]) % BOARD_PALETTE.len();
    BOARD_PALETTE[index]
}

#[derive(Debug, Clone, Deserialize, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
