//! Derived project status across representative task mixes.

use taskhive_backend::models::project::ProjectStatus;
use taskhive_backend::models::task::TaskStatus::{self, *};
use taskhive_backend::services::status::project_health;

fn health(statuses: &[TaskStatus]) -> (ProjectStatus, u8) {
    let h = project_health(statuses);
    (h.status, h.completion_percentage)
}

#[test]
fn stuck_takes_priority_over_completion() {
    assert_eq!(health(&[Completed, Completed, Stuck]), (ProjectStatus::AtRisk, 67));
    assert_eq!(health(&[Stuck]), (ProjectStatus::AtRisk, 0));
}

#[test]
fn empty_project_reads_as_planned() {
    assert_eq!(health(&[]), (ProjectStatus::Planned, 0));
}

#[test]
fn fully_completed_project_reads_as_completed() {
    assert_eq!(health(&[Completed, Completed]), (ProjectStatus::Completed, 100));
}

#[test]
fn untouched_project_reads_as_planned() {
    assert_eq!(health(&[Planned, Planned]), (ProjectStatus::Planned, 0));
}

#[test]
fn any_progress_reads_as_in_progress() {
    assert_eq!(health(&[Planned, InProgress, Completed]), (ProjectStatus::InProgress, 33));
    assert_eq!(health(&[InProgress]), (ProjectStatus::InProgress, 0));
}

#[test]
fn recompute_on_unchanged_input_is_stable() {
    let statuses = vec![Completed, Planned, Stuck, InProgress];
    let first = project_health(&statuses);
    let second = project_health(&statuses);
    assert_eq!(first, second);
}

#[test]
fn completion_rounds_to_nearest_percent() {
    // 1 of 3 completed = 33.3% -> 33; 2 of 3 = 66.7% -> 67.
    assert_eq!(health(&[Completed, Planned, Planned]).1, 33);
    assert_eq!(health(&[Completed, Completed, Planned]).1, 67);
}
