//! Scoped lookups shared by the mutation services.
//!
//! Every mutation re-reads the facts it depends on (role, lead membership,
//! current assignees) inside the same logical operation instead of trusting
//! client-supplied prior state.

use std::collections::HashSet;

use sqlx::{MySqlPool, Row};

use crate::error::{AppError, Result};
use crate::models::project::ProjectRow;
use crate::models::role::Role;
use crate::models::task::TaskRow;

pub async fn load_project_in_org(
    pool: &MySqlPool,
    organization_id: i64,
    project_id: i64,
) -> Result<ProjectRow> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "SELECT project_id, organization_id, project_title, project_description,
                start_date, end_date, archived
         FROM Projects_
         WHERE project_id = ? AND organization_id = ?",
    )
    .bind(project_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| {
        AppError::NotFound(format!(
            "project {} not found in organization {}",
            project_id, organization_id
        ))
    })
}

/// Loads a task only if it belongs to the given project and the project to
/// the given organization.
pub async fn load_task_in_project(
    pool: &MySqlPool,
    organization_id: i64,
    project_id: i64,
    task_id: i64,
) -> Result<TaskRow> {
    let row = sqlx::query_as::<_, TaskRow>(
        "SELECT t.task_id, t.project_id, t.title, t.description, t.status,
                t.start_date, t.end_date, t.display_order, t.expense, t.color, t.created_at
         FROM Tasks_ t
         JOIN Projects_ p ON t.project_id = p.project_id
         WHERE t.task_id = ? AND t.project_id = ? AND p.organization_id = ?",
    )
    .bind(task_id)
    .bind(project_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| {
        AppError::NotFound(format!(
            "task {} not found in project {}",
            task_id, project_id
        ))
    })
}

/// The actor's organization-wide role, if they hold a membership at all.
pub async fn membership_role(
    pool: &MySqlPool,
    organization_id: i64,
    user_id: i64,
) -> Result<Option<Role>> {
    let row = sqlx::query("SELECT role FROM Memberships_ WHERE organization_id = ? AND user_id = ?")
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        None => Ok(None),
        Some(record) => {
            let role: String = record.get("role");
            Role::parse(&role).map(Some).ok_or_else(|| {
                AppError::Validation(format!("membership has unknown role '{}'", role))
            })
        }
    }
}

pub async fn project_lead_ids(pool: &MySqlPool, project_id: i64) -> Result<HashSet<i64>> {
    let rows = sqlx::query("SELECT user_id FROM ProjectLeads_ WHERE project_id = ?")
        .bind(project_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.get("user_id")).collect())
}

pub async fn task_assignee_ids(pool: &MySqlPool, task_id: i64) -> Result<HashSet<i64>> {
    let rows = sqlx::query("SELECT user_id FROM TaskAssignees_ WHERE task_id = ?")
        .bind(task_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.get("user_id")).collect())
}

/// Returns the subset of `ids` that hold no membership in the organization,
/// sorted and deduplicated. Empty means every id is a valid assignee.
pub async fn missing_member_ids(
    pool: &MySqlPool,
    organization_id: i64,
    ids: &[i64],
) -> Result<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let query_str = format!(
        "SELECT user_id FROM Memberships_ WHERE organization_id = ? AND user_id IN ({})",
        placeholders
    );

    let mut query = sqlx::query(&query_str).bind(organization_id);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;

    let found: HashSet<i64> = rows.into_iter().map(|r| r.get("user_id")).collect();
    let mut missing: Vec<i64> = ids
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    Ok(missing)
}
