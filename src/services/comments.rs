//! Comment creation and its fan-out.
//!
//! Same pattern as status changes: assignees and project leads hear about a
//! new comment, the author does not.

use chrono::Utc;
use log::info;
use sqlx::MySqlPool;

use crate::error::{AppError, Result};
use crate::models::comment::Comment;
use crate::services::notifications::{self, RealtimeChannel};
use crate::services::scope;
use crate::services::task_update::TaskScope;

pub async fn add_comment(
    pool: &MySqlPool,
    realtime: &dyn RealtimeChannel,
    scope_ids: TaskScope,
    author_id: i64,
    content: &str,
) -> Result<Comment> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("comment content is empty".to_string()));
    }

    let task_row = scope::load_task_in_project(
        pool,
        scope_ids.organization_id,
        scope_ids.project_id,
        scope_ids.task_id,
    )
    .await?;

    scope::membership_role(pool, scope_ids.organization_id, author_id)
        .await?
        .ok_or_else(|| {
            AppError::PermissionDenied("author is not a member of this organization".to_string())
        })?;

    let outcome = sqlx::query(
        "INSERT INTO Comments_ (task_id, author_id, content) VALUES (?, ?, ?)",
    )
    .bind(scope_ids.task_id)
    .bind(author_id)
    .bind(content)
    .execute(pool)
    .await?;
    let comment_id = outcome.last_insert_id() as i64;
    info!("comment {} added on task {} by user {}", comment_id, scope_ids.task_id, author_id);

    let assignees = scope::task_assignee_ids(pool, scope_ids.task_id).await?;
    let leads = scope::project_lead_ids(pool, scope_ids.project_id).await?;
    let link = notifications::task_link(scope_ids.project_id, scope_ids.task_id);
    let drafts = notifications::plan_comment(&task_row.title, &assignees, &leads, author_id, &link);
    notifications::dispatch(pool, realtime, drafts).await?;

    Ok(Comment {
        comment_id,
        task_id: scope_ids.task_id,
        author_id,
        content: content.to_string(),
        created_at: Utc::now().naive_utc(),
    })
}
