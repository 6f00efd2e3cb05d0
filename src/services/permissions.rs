//! Field-level authorization for task mutations.
//!
//! Two independent facts feed the decision: the actor's organization-wide
//! role and whether the actor is a lead of this specific project. They are
//! looked up fresh on every request; nothing here is cached.

use crate::error::AppError;
use crate::models::role::Role;

/// Every mutable task field, used to name what a request wants to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Description,
    Assignees,
    Status,
    StartDate,
    EndDate,
    Expense,
    Color,
    DisplayOrder,
}

impl TaskField {
    pub fn name(&self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::Assignees => "assignees",
            TaskField::Status => "status",
            TaskField::StartDate => "start_date",
            TaskField::EndDate => "end_date",
            TaskField::Expense => "expense",
            TaskField::Color => "color",
            TaskField::DisplayOrder => "display_order",
        }
    }
}

/// Actor facts relevant to one task mutation, resolved per request.
#[derive(Debug, Clone, Copy)]
pub struct ActorContext {
    pub role: Role,
    /// Lead of the task's project (project-scoped, independent of role).
    pub is_project_lead: bool,
    /// Current assignee of the task being mutated.
    pub is_assignee: bool,
}

impl ActorContext {
    /// Full edit rights: org-wide admin, or a team leader who leads this
    /// exact project.
    pub fn has_full_task_rights(&self) -> bool {
        self.role >= Role::Admin || (self.role == Role::TeamLeader && self.is_project_lead)
    }
}

/// Decides whether the actor may change the requested field set.
///
/// Admins and project-lead team leaders may change everything. A mere
/// assignee may change only the status; anything else in the request is a
/// hard failure naming the offending fields. Everyone else is denied.
pub fn authorize_task_update(actor: &ActorContext, requested: &[TaskField]) -> Result<(), AppError> {
    if actor.has_full_task_rights() {
        return Ok(());
    }

    if actor.is_assignee {
        let disallowed: Vec<&str> = requested
            .iter()
            .filter(|f| **f != TaskField::Status)
            .map(|f| f.name())
            .collect();
        if disallowed.is_empty() {
            return Ok(());
        }
        return Err(AppError::PermissionDenied(format!(
            "assignees may only change task status; not permitted: {}",
            disallowed.join(", ")
        )));
    }

    Err(AppError::PermissionDenied(
        "no permission to modify this task".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, is_project_lead: bool, is_assignee: bool) -> ActorContext {
        ActorContext {
            role,
            is_project_lead,
            is_assignee,
        }
    }

    #[test]
    fn admin_may_change_everything() {
        let ctx = actor(Role::Admin, false, false);
        assert!(authorize_task_update(
            &ctx,
            &[TaskField::Title, TaskField::Assignees, TaskField::DisplayOrder]
        )
        .is_ok());
    }

    #[test]
    fn project_lead_team_leader_may_change_everything() {
        let ctx = actor(Role::TeamLeader, true, false);
        assert!(authorize_task_update(
            &ctx,
            &[TaskField::Status, TaskField::Assignees, TaskField::Expense]
        )
        .is_ok());
    }

    #[test]
    fn team_leader_without_lead_membership_is_denied() {
        // Org role alone is not enough; leadership is project-scoped.
        let ctx = actor(Role::TeamLeader, false, false);
        assert!(authorize_task_update(&ctx, &[TaskField::Title]).is_err());
    }

    #[test]
    fn assignee_may_change_status_only() {
        let ctx = actor(Role::Employee, false, true);
        assert!(authorize_task_update(&ctx, &[TaskField::Status]).is_ok());
    }

    #[test]
    fn assignee_requesting_more_is_denied_naming_fields() {
        let ctx = actor(Role::Employee, false, true);
        let err = authorize_task_update(&ctx, &[TaskField::Status, TaskField::Title]).unwrap_err();
        match err {
            AppError::PermissionDenied(msg) => {
                assert!(msg.contains("title"), "message should name the field: {msg}");
                assert!(!msg.contains("status,"), "status itself is permitted");
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_employee_is_denied_outright() {
        let ctx = actor(Role::Employee, false, false);
        assert!(authorize_task_update(&ctx, &[TaskField::Status]).is_err());
    }

    #[test]
    fn assignee_team_leader_of_other_project_still_status_only() {
        let ctx = actor(Role::TeamLeader, false, true);
        assert!(authorize_task_update(&ctx, &[TaskField::Status]).is_ok());
        assert!(authorize_task_update(&ctx, &[TaskField::Assignees]).is_err());
    }
}
