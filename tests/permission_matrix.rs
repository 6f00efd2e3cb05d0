//! Role/assignment-based field authorization for task mutations.

use taskhive_backend::error::AppError;
use taskhive_backend::models::role::Role;
use taskhive_backend::services::permissions::{authorize_task_update, ActorContext, TaskField};
use taskhive_backend::services::task_update::TaskUpdate;

const ALL_FIELDS: [TaskField; 9] = [
    TaskField::Title,
    TaskField::Description,
    TaskField::Assignees,
    TaskField::Status,
    TaskField::StartDate,
    TaskField::EndDate,
    TaskField::Expense,
    TaskField::Color,
    TaskField::DisplayOrder,
];

#[test]
fn assignee_submitting_status_and_title_is_denied_naming_title() {
    let actor = ActorContext {
        role: Role::Employee,
        is_project_lead: false,
        is_assignee: true,
    };
    let update = TaskUpdate {
        status: Some("completed".to_string()),
        title: Some("x".to_string()),
        ..Default::default()
    };
    let err = authorize_task_update(&actor, &update.requested_fields()).unwrap_err();
    match err {
        AppError::PermissionDenied(msg) => assert!(msg.contains("title")),
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
}

#[test]
fn assignee_submitting_status_alone_succeeds() {
    let actor = ActorContext {
        role: Role::Employee,
        is_project_lead: false,
        is_assignee: true,
    };
    let update = TaskUpdate {
        status: Some("completed".to_string()),
        ..Default::default()
    };
    assert!(authorize_task_update(&actor, &update.requested_fields()).is_ok());
}

#[test]
fn project_lead_team_leader_may_update_every_field() {
    let actor = ActorContext {
        role: Role::TeamLeader,
        is_project_lead: true,
        is_assignee: false,
    };
    assert!(authorize_task_update(&actor, &ALL_FIELDS).is_ok());
}

#[test]
fn admins_do_not_need_lead_membership() {
    for role in [Role::Admin, Role::SuperAdmin] {
        let actor = ActorContext {
            role,
            is_project_lead: false,
            is_assignee: false,
        };
        assert!(authorize_task_update(&actor, &ALL_FIELDS).is_ok());
    }
}

#[test]
fn team_leader_of_a_different_project_is_denied() {
    // Leadership is project-scoped; the org role alone grants nothing here.
    let actor = ActorContext {
        role: Role::TeamLeader,
        is_project_lead: false,
        is_assignee: false,
    };
    assert!(authorize_task_update(&actor, &[TaskField::Status]).is_err());
}
