//! Bulk task reordering within a project.
//!
//! The submitted list is validated against the project's current task set
//! before any write; the renumbering itself runs inside one transaction so
//! readers never see a partially reordered project.

use std::collections::HashSet;

use log::info;
use sqlx::{MySqlPool, Row};

use crate::error::{AppError, Result};
use crate::services::scope;

/// Checks that every submitted id belongs to the project and appears once.
/// The count of matched existing tasks must equal the request length.
pub fn validate_reorder(existing: &HashSet<i64>, requested: &[i64]) -> Result<()> {
    let mut seen = HashSet::with_capacity(requested.len());
    let mut foreign = Vec::new();
    let mut duplicates = Vec::new();

    for id in requested {
        if !existing.contains(id) {
            foreign.push(*id);
        }
        if !seen.insert(*id) {
            duplicates.push(*id);
        }
    }

    if !foreign.is_empty() {
        let listed: Vec<String> = foreign.iter().map(|id| id.to_string()).collect();
        return Err(AppError::Validation(format!(
            "task ids not in this project: {}",
            listed.join(", ")
        )));
    }
    if !duplicates.is_empty() {
        let listed: Vec<String> = duplicates.iter().map(|id| id.to_string()).collect();
        return Err(AppError::Validation(format!(
            "duplicate task ids in reorder request: {}",
            listed.join(", ")
        )));
    }
    Ok(())
}

/// Re-assigns `display_order = index` for the submitted sequence. Tasks the
/// caller omitted keep their prior order value.
pub async fn reorder_tasks(
    pool: &MySqlPool,
    organization_id: i64,
    project_id: i64,
    actor_id: i64,
    ordered_task_ids: &[i64],
) -> Result<()> {
    scope::load_project_in_org(pool, organization_id, project_id).await?;

    let leads = scope::project_lead_ids(pool, project_id).await?;
    let role = scope::membership_role(pool, organization_id, actor_id)
        .await?
        .ok_or_else(|| {
            AppError::PermissionDenied("actor is not a member of this organization".to_string())
        })?;
    let actor = crate::services::permissions::ActorContext {
        role,
        is_project_lead: leads.contains(&actor_id),
        is_assignee: false,
    };
    if !actor.has_full_task_rights() {
        return Err(AppError::PermissionDenied(
            "no permission to reorder tasks in this project".to_string(),
        ));
    }

    let rows = sqlx::query("SELECT task_id FROM Tasks_ WHERE project_id = ?")
        .bind(project_id)
        .fetch_all(pool)
        .await?;
    let existing: HashSet<i64> = rows.into_iter().map(|r| r.get("task_id")).collect();

    validate_reorder(&existing, ordered_task_ids)?;

    let mut tx = pool.begin().await?;
    for (index, task_id) in ordered_task_ids.iter().enumerate() {
        sqlx::query("UPDATE Tasks_ SET display_order = ? WHERE task_id = ? AND project_id = ?")
            .bind(index as i32)
            .bind(task_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!(
        "project {} reordered ({} tasks) by user {}",
        project_id,
        ordered_task_ids.len(),
        actor_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[i64]) -> HashSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn full_permutation_is_valid() {
        assert!(validate_reorder(&ids(&[1, 2, 3]), &[3, 1, 2]).is_ok());
    }

    #[test]
    fn foreign_id_is_rejected() {
        let err = validate_reorder(&ids(&[1, 2]), &[1, 2, 99]).unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("99")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_id_is_rejected() {
        assert!(validate_reorder(&ids(&[1, 2, 3]), &[1, 2, 2]).is_err());
    }

    #[test]
    fn omitting_tasks_is_the_callers_problem() {
        // Omitted tasks keep their prior display order; no validation here.
        assert!(validate_reorder(&ids(&[1, 2, 3]), &[3, 1]).is_ok());
    }

    #[test]
    fn empty_request_against_empty_project_is_valid() {
        assert!(validate_reorder(&ids(&[]), &[]).is_ok());
    }
}
