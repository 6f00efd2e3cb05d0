//! Derived project status.
//!
//! A project's status and completion percentage are a pure function of its
//! tasks' statuses at read time. Nothing here is persisted or cached; every
//! project read recomputes from the current task collection.

use crate::models::project::ProjectStatus;
use crate::models::task::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ProjectHealth {
    pub status: ProjectStatus,
    pub completion_percentage: u8,
}

/// Derives a project's aggregate health from its task statuses.
///
/// A single stuck task marks the whole project at-risk, even when every
/// other task is completed.
pub fn project_health(statuses: &[TaskStatus]) -> ProjectHealth {
    if statuses.is_empty() {
        return ProjectHealth {
            status: ProjectStatus::Planned,
            completion_percentage: 0,
        };
    }

    let total = statuses.len();
    let completed = statuses
        .iter()
        .filter(|s| **s == TaskStatus::Completed)
        .count();
    let completion = (100.0 * completed as f64 / total as f64).round() as u8;

    let any_stuck = statuses.iter().any(|s| *s == TaskStatus::Stuck);
    let all_planned = statuses.iter().all(|s| *s == TaskStatus::Planned);

    let status = if any_stuck {
        ProjectStatus::AtRisk
    } else if completion == 100 {
        ProjectStatus::Completed
    } else if completion == 0 && all_planned {
        ProjectStatus::Planned
    } else {
        ProjectStatus::InProgress
    };

    ProjectHealth {
        status,
        completion_percentage: completion,
    }
}
