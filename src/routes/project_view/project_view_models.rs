use serde::{Deserialize, Serialize};

use crate::models::project::ProjectStatus;

#[derive(Deserialize)]
pub struct GetProjectListRequest {
    pub organization_id: i64,
    pub actor_user_id: i64,
}

/// Project annotated with its derived health. Status and completion are
/// recomputed from the task set on every read.
#[derive(Serialize)]
pub struct ProjectSummary {
    pub project_id: i64,
    pub project_title: String,
    pub project_description: Option<String>,
    pub archived: bool,
    pub status: ProjectStatus,
    pub completion_percentage: u8,
    pub lead_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct GetProjectListResponse {
    pub projects: Vec<ProjectSummary>,
}
