use chrono::NaiveDateTime;
use serde::Serialize;

/// Append-only task comment, ordered by creation time.
#[derive(sqlx::FromRow, Serialize)]
pub struct Comment {
    pub comment_id: i64,
    pub task_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: NaiveDateTime,
}
