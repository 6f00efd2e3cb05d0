use chrono::NaiveDate;
use serde::Serialize;

/// Derived project status. Never persisted; recomputed from the task set on
/// every read so it cannot go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    AtRisk,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::AtRisk => "at_risk",
            ProjectStatus::Completed => "completed",
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct ProjectRow {
    pub project_id: i64,
    pub organization_id: i64,
    pub project_title: String,
    pub project_description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub project_id: i64,
    pub organization_id: i64,
    pub project_title: String,
    pub project_description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub archived: bool,
    pub lead_ids: Vec<i64>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            project_id: row.project_id,
            organization_id: row.organization_id,
            project_title: row.project_title,
            project_description: row.project_description,
            start_date: row.start_date,
            end_date: row.end_date,
            archived: row.archived,
            lead_ids: Vec::new(),
        }
    }
}
