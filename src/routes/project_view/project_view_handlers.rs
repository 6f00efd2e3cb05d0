use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};
use sqlx::MySqlPool;

use super::project_view_models::{GetProjectListRequest, GetProjectListResponse, ProjectSummary};
use crate::error::AppError;
use crate::models::project::ProjectRow;
use crate::models::role::Role;
use crate::models::task::TaskStatus;
use crate::services::scope;
use crate::services::status::project_health;

pub async fn project_view_get() -> impl Responder {
    HttpResponse::Ok().body("Hello, this is the Project View endpoint.")
}

/// Lists the projects the actor may see, each annotated with freshly
/// derived status and completion.
///
/// Visibility: admins see every project in the organization, team leaders
/// the projects they lead, employees the projects holding a task assigned
/// to them.
pub async fn get_project_list(
    pool: web::Data<MySqlPool>,
    request: web::Json<GetProjectListRequest>,
) -> Result<HttpResponse, AppError> {
    let organization_id = request.organization_id;
    let actor_id = request.actor_user_id;
    info!("get_project_list for organization {}", organization_id);

    let role = scope::membership_role(pool.get_ref(), organization_id, actor_id)
        .await?
        .ok_or_else(|| {
            AppError::PermissionDenied("actor is not a member of this organization".to_string())
        })?;

    let rows: Vec<ProjectRow> = if role >= Role::Admin {
        sqlx::query_as::<_, ProjectRow>(
            "SELECT project_id, organization_id, project_title, project_description,
                    start_date, end_date, archived
             FROM Projects_ WHERE organization_id = ?",
        )
        .bind(organization_id)
        .fetch_all(pool.get_ref())
        .await?
    } else if role == Role::TeamLeader {
        sqlx::query_as::<_, ProjectRow>(
            "SELECT p.project_id, p.organization_id, p.project_title, p.project_description,
                    p.start_date, p.end_date, p.archived
             FROM Projects_ p
             JOIN ProjectLeads_ pl ON p.project_id = pl.project_id
             WHERE p.organization_id = ? AND pl.user_id = ?",
        )
        .bind(organization_id)
        .bind(actor_id)
        .fetch_all(pool.get_ref())
        .await?
    } else {
        sqlx::query_as::<_, ProjectRow>(
            "SELECT DISTINCT p.project_id, p.organization_id, p.project_title,
                    p.project_description, p.start_date, p.end_date, p.archived
             FROM Projects_ p
             JOIN Tasks_ t ON t.project_id = p.project_id
             JOIN TaskAssignees_ ta ON ta.task_id = t.task_id
             WHERE p.organization_id = ? AND ta.user_id = ?",
        )
        .bind(organization_id)
        .bind(actor_id)
        .fetch_all(pool.get_ref())
        .await?
    };

    let mut projects = Vec::with_capacity(rows.len());
    for row in rows {
        let status_rows: Vec<(String,)> =
            sqlx::query_as("SELECT status FROM Tasks_ WHERE project_id = ?")
                .bind(row.project_id)
                .fetch_all(pool.get_ref())
                .await?;
        let statuses: Vec<TaskStatus> = status_rows
            .into_iter()
            .filter_map(|(s,)| {
                let parsed = TaskStatus::parse(&s);
                if parsed.is_none() {
                    warn!("project {} has task with unknown status '{}'", row.project_id, s);
                }
                parsed
            })
            .collect();
        let health = project_health(&statuses);

        let mut lead_ids: Vec<i64> = scope::project_lead_ids(pool.get_ref(), row.project_id)
            .await?
            .into_iter()
            .collect();
        lead_ids.sort_unstable();

        projects.push(ProjectSummary {
            project_id: row.project_id,
            project_title: row.project_title,
            project_description: row.project_description,
            archived: row.archived,
            status: health.status,
            completion_percentage: health.completion_percentage,
            lead_ids,
        });
    }

    Ok(HttpResponse::Ok().json(GetProjectListResponse { projects }))
}
