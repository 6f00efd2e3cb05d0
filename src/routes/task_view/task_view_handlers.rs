use actix_web::{web, HttpResponse, Responder};
use log::info;
use sqlx::MySqlPool;

use super::task_view_models::{
    AddCommentRequest, AddCommentResponse, CreateTaskRequest, DeleteTaskRequest,
    GetTaskListRequest, GetTaskListResponse, ReorderTasksRequest, SuccessResponse, TaskDetail,
    TaskResponse, UpdateTaskRequest,
};
use crate::error::AppError;
use crate::models::comment::Comment;
use crate::models::task::{Task, TaskRow};
use crate::services::notifications::RealtimeChannel;
use crate::services::reorder;
use crate::services::task_update::{self, TaskScope};
use crate::services::{comments, scope};

pub async fn task_view_get() -> impl Responder {
    HttpResponse::Ok().body("Hello, this is the Task View endpoint.")
}

pub async fn create_task(
    pool: web::Data<MySqlPool>,
    realtime: web::Data<dyn RealtimeChannel>,
    request: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    info!("create_task in project {}", request.project_id);
    let task = task_update::create_task(
        pool.get_ref(),
        realtime.get_ref(),
        request.organization_id,
        request.project_id,
        request.actor_user_id,
        request.task,
    )
    .await?;
    Ok(HttpResponse::Ok().json(TaskResponse { task }))
}

pub async fn update_task(
    pool: web::Data<MySqlPool>,
    realtime: web::Data<dyn RealtimeChannel>,
    request: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    info!("update_task {}", request.task_id);
    let task = task_update::update_task(
        pool.get_ref(),
        realtime.get_ref(),
        TaskScope {
            organization_id: request.organization_id,
            project_id: request.project_id,
            task_id: request.task_id,
        },
        request.actor_user_id,
        request.update,
    )
    .await?;
    Ok(HttpResponse::Ok().json(TaskResponse { task }))
}

pub async fn delete_task(
    pool: web::Data<MySqlPool>,
    request: web::Json<DeleteTaskRequest>,
) -> Result<HttpResponse, AppError> {
    info!("delete_task {}", request.task_id);
    task_update::delete_task(
        pool.get_ref(),
        TaskScope {
            organization_id: request.organization_id,
            project_id: request.project_id,
            task_id: request.task_id,
        },
        request.actor_user_id,
    )
    .await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: true,
        message: "Task deleted successfully".to_string(),
    }))
}

pub async fn reorder_tasks(
    pool: web::Data<MySqlPool>,
    request: web::Json<ReorderTasksRequest>,
) -> Result<HttpResponse, AppError> {
    info!("reorder_tasks in project {}", request.project_id);
    reorder::reorder_tasks(
        pool.get_ref(),
        request.organization_id,
        request.project_id,
        request.actor_user_id,
        &request.ordered_task_ids,
    )
    .await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: true,
        message: "Tasks reordered successfully".to_string(),
    }))
}

/// Tasks of one project in display order, with assignees and comments
/// attached per task.
pub async fn get_task_list(
    pool: web::Data<MySqlPool>,
    request: web::Json<GetTaskListRequest>,
) -> Result<HttpResponse, AppError> {
    scope::load_project_in_org(pool.get_ref(), request.organization_id, request.project_id)
        .await?;

    let rows = sqlx::query_as::<_, TaskRow>(
        "SELECT task_id, project_id, title, description, status, start_date, end_date,
                display_order, expense, color, created_at
         FROM Tasks_ WHERE project_id = ? ORDER BY display_order",
    )
    .bind(request.project_id)
    .fetch_all(pool.get_ref())
    .await?;

    let mut tasks = Vec::with_capacity(rows.len());
    for row in rows {
        let task_id = row.task_id;
        let mut task = Task::try_from(row)?;
        let mut assignee_ids: Vec<i64> = scope::task_assignee_ids(pool.get_ref(), task_id)
            .await?
            .into_iter()
            .collect();
        assignee_ids.sort_unstable();
        task.assignee_ids = assignee_ids;

        let comments = sqlx::query_as::<_, Comment>(
            "SELECT comment_id, task_id, author_id, content, created_at
             FROM Comments_ WHERE task_id = ? ORDER BY created_at",
        )
        .bind(task_id)
        .fetch_all(pool.get_ref())
        .await?;

        tasks.push(TaskDetail { task, comments });
    }

    Ok(HttpResponse::Ok().json(GetTaskListResponse { tasks }))
}

pub async fn add_comment(
    pool: web::Data<MySqlPool>,
    realtime: web::Data<dyn RealtimeChannel>,
    request: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, AppError> {
    info!("add_comment on task {}", request.task_id);
    let comment = comments::add_comment(
        pool.get_ref(),
        realtime.get_ref(),
        TaskScope {
            organization_id: request.organization_id,
            project_id: request.project_id,
            task_id: request.task_id,
        },
        request.actor_user_id,
        &request.content,
    )
    .await?;
    Ok(HttpResponse::Ok().json(AddCommentResponse { comment }))
}
