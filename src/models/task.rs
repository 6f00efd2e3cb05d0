use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Task lifecycle status. Closed set; the database stores the snake_case
/// string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Planned,
    InProgress,
    Stuck,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Planned => "planned",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Stuck => "stuck",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "planned" => Some(TaskStatus::Planned),
            "in_progress" => Some(TaskStatus::InProgress),
            "stuck" => Some(TaskStatus::Stuck),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Row shape of `Tasks_` as it comes back from MySQL.
#[derive(sqlx::FromRow)]
pub struct TaskRow {
    pub task_id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub display_order: i32,
    pub expense: Option<f64>,
    pub color: String,
    pub created_at: NaiveDateTime,
}

/// Domain task, free of persistence relation wrappers. Assignee ids live on
/// a join table and are attached by the service layer after the row load.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub task_id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub display_order: i32,
    pub expense: Option<f64>,
    pub color: String,
    pub assignee_ids: Vec<i64>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::parse(&row.status).ok_or_else(|| {
            AppError::Validation(format!(
                "task {} has unknown status '{}'",
                row.task_id, row.status
            ))
        })?;
        Ok(Task {
            task_id: row.task_id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            status,
            start_date: row.start_date,
            end_date: row.end_date,
            display_order: row.display_order,
            expense: row.expense,
            color: row.color,
            assignee_ids: Vec::new(),
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("done"), None);
    }
}
