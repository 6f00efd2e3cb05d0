//! Task mutation engine.
//!
//! Applies a permission-filtered update to a task, detects the observable
//! changes (status, assignee set) against freshly re-read prior state, and
//! hands a change descriptor to the notification fan-out after the
//! transaction commits.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::info;
use sqlx::MySqlPool;

use crate::error::{AppError, Result};
use crate::models::task::{Task, TaskStatus};
use crate::services::notifications::{
    self, NotificationDraft, RealtimeChannel,
};
use crate::services::permissions::{authorize_task_update, ActorContext, TaskField};
use crate::services::scope;

/// Identifies one task through its full ownership chain.
#[derive(Debug, Clone, Copy)]
pub struct TaskScope {
    pub organization_id: i64,
    pub project_id: i64,
    pub task_id: i64,
}

/// Partial update payload. Dates arrive as `YYYY-MM-DD` strings and status
/// as its snake_case string; both are parsed before anything is written.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub expense: Option<f64>,
    pub color: Option<String>,
    pub display_order: Option<i32>,
    pub assignee_ids: Option<Vec<i64>>,
}

impl TaskUpdate {
    /// Names every field present in the payload, for the permission check.
    pub fn requested_fields(&self) -> Vec<TaskField> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push(TaskField::Title);
        }
        if self.description.is_some() {
            fields.push(TaskField::Description);
        }
        if self.status.is_some() {
            fields.push(TaskField::Status);
        }
        if self.start_date.is_some() {
            fields.push(TaskField::StartDate);
        }
        if self.end_date.is_some() {
            fields.push(TaskField::EndDate);
        }
        if self.expense.is_some() {
            fields.push(TaskField::Expense);
        }
        if self.color.is_some() {
            fields.push(TaskField::Color);
        }
        if self.display_order.is_some() {
            fields.push(TaskField::DisplayOrder);
        }
        if self.assignee_ids.is_some() {
            fields.push(TaskField::Assignees);
        }
        fields
    }
}

/// Observable outcome of one task mutation, consumed by the fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDescriptor {
    pub status_changed: bool,
    pub old_status: TaskStatus,
    pub new_status: TaskStatus,
    pub assignees_added: Vec<i64>,
    pub assignees_removed: Vec<i64>,
}

/// Set difference in both directions, sorted for deterministic fan-out.
pub fn diff_assignees(old: &HashSet<i64>, new: &HashSet<i64>) -> (Vec<i64>, Vec<i64>) {
    let mut added: Vec<i64> = new.difference(old).copied().collect();
    let mut removed: Vec<i64> = old.difference(new).copied().collect();
    added.sort_unstable();
    removed.sort_unstable();
    (added, removed)
}

pub fn describe_changes(
    old_status: TaskStatus,
    requested_status: Option<TaskStatus>,
    old_assignees: &HashSet<i64>,
    new_assignees: Option<&HashSet<i64>>,
) -> ChangeDescriptor {
    let new_status = requested_status.unwrap_or(old_status);
    let (added, removed) = match new_assignees {
        Some(new) => diff_assignees(old_assignees, new),
        None => (Vec::new(), Vec::new()),
    };
    ChangeDescriptor {
        status_changed: new_status != old_status,
        old_status,
        new_status,
        assignees_added: added,
        assignees_removed: removed,
    }
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid {}: '{}'", field, value)))
}

fn parse_status(value: &str) -> Result<TaskStatus> {
    TaskStatus::parse(value)
        .ok_or_else(|| AppError::Validation(format!("invalid status: '{}'", value)))
}

async fn validate_assignees(pool: &MySqlPool, organization_id: i64, ids: &[i64]) -> Result<()> {
    let missing = scope::missing_member_ids(pool, organization_id, ids).await?;
    if !missing.is_empty() {
        let listed: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
        return Err(AppError::Validation(format!(
            "assignee ids not in organization: {}",
            listed.join(", ")
        )));
    }
    Ok(())
}

async fn load_task_with_assignees(
    pool: &MySqlPool,
    scope_ids: TaskScope,
) -> Result<Task> {
    let row = scope::load_task_in_project(
        pool,
        scope_ids.organization_id,
        scope_ids.project_id,
        scope_ids.task_id,
    )
    .await?;
    let mut task = Task::try_from(row)?;
    let mut assignees: Vec<i64> = scope::task_assignee_ids(pool, scope_ids.task_id)
        .await?
        .into_iter()
        .collect();
    assignees.sort_unstable();
    task.assignee_ids = assignees;
    Ok(task)
}

async fn actor_context(
    pool: &MySqlPool,
    organization_id: i64,
    actor_id: i64,
    leads: &HashSet<i64>,
    assignees: &HashSet<i64>,
) -> Result<ActorContext> {
    let role = scope::membership_role(pool, organization_id, actor_id)
        .await?
        .ok_or_else(|| {
            AppError::PermissionDenied("actor is not a member of this organization".to_string())
        })?;
    Ok(ActorContext {
        role,
        is_project_lead: leads.contains(&actor_id),
        is_assignee: assignees.contains(&actor_id),
    })
}

/// Applies a partial update to one task.
///
/// Prior status and assignees are re-read here, the permitted scalar fields
/// and any assignee replacement are written inside one transaction, and the
/// fan-out runs once the transaction has committed.
pub async fn update_task(
    pool: &MySqlPool,
    realtime: &dyn RealtimeChannel,
    scope_ids: TaskScope,
    actor_id: i64,
    update: TaskUpdate,
) -> Result<Task> {
    let project =
        scope::load_project_in_org(pool, scope_ids.organization_id, scope_ids.project_id).await?;
    let task_row = scope::load_task_in_project(
        pool,
        scope_ids.organization_id,
        scope_ids.project_id,
        scope_ids.task_id,
    )
    .await?;
    let old_status = TaskStatus::parse(&task_row.status).ok_or_else(|| {
        AppError::Validation(format!("task has unknown status '{}'", task_row.status))
    })?;

    let leads = scope::project_lead_ids(pool, scope_ids.project_id).await?;
    let old_assignees = scope::task_assignee_ids(pool, scope_ids.task_id).await?;

    let actor =
        actor_context(pool, scope_ids.organization_id, actor_id, &leads, &old_assignees).await?;
    authorize_task_update(&actor, &update.requested_fields())?;

    // Parse and validate everything before touching the store.
    let new_status = update.status.as_deref().map(parse_status).transpose()?;
    let start_date = update
        .start_date
        .as_deref()
        .map(|v| parse_date("start_date", v))
        .transpose()?;
    let end_date = update
        .end_date
        .as_deref()
        .map(|v| parse_date("end_date", v))
        .transpose()?;

    let new_assignees: Option<HashSet<i64>> = match &update.assignee_ids {
        Some(ids) => {
            validate_assignees(pool, scope_ids.organization_id, ids).await?;
            Some(ids.iter().copied().collect())
        }
        None => None,
    };

    let mut tx = pool.begin().await?;

    let mut sets: Vec<&'static str> = Vec::new();
    if update.title.is_some() {
        sets.push("title = ?");
    }
    if update.description.is_some() {
        sets.push("description = ?");
    }
    if new_status.is_some() {
        sets.push("status = ?");
    }
    if start_date.is_some() {
        sets.push("start_date = ?");
    }
    if end_date.is_some() {
        sets.push("end_date = ?");
    }
    if update.expense.is_some() {
        sets.push("expense = ?");
    }
    if update.color.is_some() {
        sets.push("color = ?");
    }
    if update.display_order.is_some() {
        sets.push("display_order = ?");
    }

    if !sets.is_empty() {
        let query_str = format!("UPDATE Tasks_ SET {} WHERE task_id = ?", sets.join(", "));
        let mut query = sqlx::query(&query_str);
        if let Some(title) = &update.title {
            query = query.bind(title);
        }
        if let Some(description) = &update.description {
            query = query.bind(description);
        }
        if let Some(status) = new_status {
            query = query.bind(status.as_str());
        }
        if let Some(date) = start_date {
            query = query.bind(date);
        }
        if let Some(date) = end_date {
            query = query.bind(date);
        }
        if let Some(expense) = update.expense {
            query = query.bind(expense);
        }
        if let Some(color) = &update.color {
            query = query.bind(color);
        }
        if let Some(order) = update.display_order {
            query = query.bind(order);
        }
        query.bind(scope_ids.task_id).execute(&mut *tx).await?;
    }

    // Clear-and-insert so readers never observe a partial assignee set.
    if let Some(new) = &new_assignees {
        sqlx::query("DELETE FROM TaskAssignees_ WHERE task_id = ?")
            .bind(scope_ids.task_id)
            .execute(&mut *tx)
            .await?;
        for user_id in new {
            sqlx::query("INSERT INTO TaskAssignees_ (task_id, user_id) VALUES (?, ?)")
                .bind(scope_ids.task_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    let changes = describe_changes(old_status, new_status, &old_assignees, new_assignees.as_ref());
    info!(
        "task {} updated by user {} (status_changed: {}, +{} / -{} assignees)",
        scope_ids.task_id,
        actor_id,
        changes.status_changed,
        changes.assignees_added.len(),
        changes.assignees_removed.len()
    );

    let link = notifications::task_link(scope_ids.project_id, scope_ids.task_id);
    let mut drafts: Vec<NotificationDraft> = notifications::plan_assignment_changes(
        &task_row.title,
        &project.project_title,
        &link,
        &changes.assignees_added,
        &changes.assignees_removed,
    );
    if changes.status_changed {
        let current_assignees = new_assignees.as_ref().unwrap_or(&old_assignees);
        drafts.extend(notifications::plan_status_change(
            &task_row.title,
            changes.old_status,
            changes.new_status,
            current_assignees,
            &leads,
            actor_id,
            &link,
        ));
    }
    notifications::dispatch(pool, realtime, drafts).await?;

    load_task_with_assignees(pool, scope_ids).await
}

/// Creation payload. Both dates are required; status defaults to planned.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub expense: Option<f64>,
    pub color: String,
    #[serde(default)]
    pub assignee_ids: Vec<i64>,
}

/// Creates a task at the end of the project's display order.
pub async fn create_task(
    pool: &MySqlPool,
    realtime: &dyn RealtimeChannel,
    organization_id: i64,
    project_id: i64,
    actor_id: i64,
    new_task: NewTask,
) -> Result<Task> {
    let project = scope::load_project_in_org(pool, organization_id, project_id).await?;
    let leads = scope::project_lead_ids(pool, project_id).await?;
    let actor = actor_context(pool, organization_id, actor_id, &leads, &HashSet::new()).await?;
    if !actor.has_full_task_rights() {
        return Err(AppError::PermissionDenied(
            "no permission to create tasks in this project".to_string(),
        ));
    }

    let status = match new_task.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => TaskStatus::Planned,
    };
    let start_date = parse_date("start_date", &new_task.start_date)?;
    let end_date = parse_date("end_date", &new_task.end_date)?;
    validate_assignees(pool, organization_id, &new_task.assignee_ids).await?;

    let mut tx = pool.begin().await?;

    let next_order: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(display_order) + 1, 0) FROM Tasks_ WHERE project_id = ?",
    )
    .bind(project_id)
    .fetch_one(&mut *tx)
    .await?;

    let outcome = sqlx::query(
        "INSERT INTO Tasks_ (project_id, title, description, status, start_date, end_date,
                             display_order, expense, color)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(project_id)
    .bind(&new_task.title)
    .bind(&new_task.description)
    .bind(status.as_str())
    .bind(start_date)
    .bind(end_date)
    .bind(next_order as i32)
    .bind(new_task.expense)
    .bind(&new_task.color)
    .execute(&mut *tx)
    .await?;
    let task_id = outcome.last_insert_id() as i64;

    let mut assignees: Vec<i64> = new_task.assignee_ids.clone();
    assignees.sort_unstable();
    assignees.dedup();
    for user_id in &assignees {
        sqlx::query("INSERT INTO TaskAssignees_ (task_id, user_id) VALUES (?, ?)")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!("task {} created in project {} by user {}", task_id, project_id, actor_id);

    let link = notifications::task_link(project_id, task_id);
    let drafts = notifications::plan_assignment_changes(
        &new_task.title,
        &project.project_title,
        &link,
        &assignees,
        &[],
    );
    notifications::dispatch(pool, realtime, drafts).await?;

    load_task_with_assignees(
        pool,
        TaskScope {
            organization_id,
            project_id,
            task_id,
        },
    )
    .await
}

/// Deletes a task together with its comments and assignee links.
pub async fn delete_task(pool: &MySqlPool, scope_ids: TaskScope, actor_id: i64) -> Result<()> {
    scope::load_task_in_project(
        pool,
        scope_ids.organization_id,
        scope_ids.project_id,
        scope_ids.task_id,
    )
    .await?;
    let leads = scope::project_lead_ids(pool, scope_ids.project_id).await?;
    let actor =
        actor_context(pool, scope_ids.organization_id, actor_id, &leads, &HashSet::new()).await?;
    if !actor.has_full_task_rights() {
        return Err(AppError::PermissionDenied(
            "no permission to delete this task".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM Comments_ WHERE task_id = ?")
        .bind(scope_ids.task_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM TaskAssignees_ WHERE task_id = ?")
        .bind(scope_ids.task_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM Tasks_ WHERE task_id = ?")
        .bind(scope_ids.task_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("task {} deleted by user {}", scope_ids.task_id, actor_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[i64]) -> HashSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn diff_detects_added_and_removed() {
        let (added, removed) = diff_assignees(&ids(&[1, 2]), &ids(&[2, 3]));
        assert_eq!(added, vec![3]);
        assert_eq!(removed, vec![1]);
    }

    #[test]
    fn diff_of_identical_sets_is_empty() {
        let (added, removed) = diff_assignees(&ids(&[1, 2]), &ids(&[1, 2]));
        assert!(added.is_empty());
        assert!(removed.is_empty());
    }

    #[test]
    fn describe_changes_reports_status_transition() {
        let changes = describe_changes(
            TaskStatus::Planned,
            Some(TaskStatus::InProgress),
            &ids(&[1]),
            None,
        );
        assert!(changes.status_changed);
        assert_eq!(changes.old_status, TaskStatus::Planned);
        assert_eq!(changes.new_status, TaskStatus::InProgress);
        assert!(changes.assignees_added.is_empty());
    }

    #[test]
    fn same_status_is_not_a_change() {
        let changes = describe_changes(
            TaskStatus::Stuck,
            Some(TaskStatus::Stuck),
            &ids(&[]),
            None,
        );
        assert!(!changes.status_changed);
    }

    #[test]
    fn assignee_replacement_is_diffed_against_prior_state() {
        let changes = describe_changes(
            TaskStatus::Planned,
            None,
            &ids(&[1, 2]),
            Some(&ids(&[2, 3])),
        );
        assert_eq!(changes.assignees_added, vec![3]);
        assert_eq!(changes.assignees_removed, vec![1]);
        assert!(!changes.status_changed);
    }

    #[test]
    fn requested_fields_match_payload() {
        let update = TaskUpdate {
            status: Some("completed".to_string()),
            title: Some("x".to_string()),
            ..Default::default()
        };
        let fields = update.requested_fields();
        assert!(fields.contains(&TaskField::Status));
        assert!(fields.contains(&TaskField::Title));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn dates_must_be_calendar_dates() {
        assert!(parse_date("start_date", "2026-02-30").is_err());
        assert!(parse_date("start_date", "not-a-date").is_err());
        assert_eq!(
            parse_date("start_date", "2026-08-25").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
        );
    }
}
