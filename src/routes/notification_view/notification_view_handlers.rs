use actix_web::{web, HttpResponse, Responder};
use log::info;
use sqlx::MySqlPool;

use super::notification_view_models::{
    GetNotificationListRequest, GetNotificationListResponse, MarkReadRequest, MarkReadResponse,
};
use crate::error::AppError;
use crate::models::notification::{Notification, NotificationRow};

pub async fn notification_view_get() -> impl Responder {
    HttpResponse::Ok().body("Hello, this is the Notification View endpoint.")
}

pub async fn get_notification_list(
    pool: web::Data<MySqlPool>,
    request: web::Json<GetNotificationListRequest>,
) -> Result<HttpResponse, AppError> {
    let rows = sqlx::query_as::<_, NotificationRow>(
        "SELECT notification_id, recipient_id, kind, text, link, is_read, created_at
         FROM Notifications_ WHERE recipient_id = ? ORDER BY created_at DESC",
    )
    .bind(request.user_id)
    .fetch_all(pool.get_ref())
    .await?;

    let notifications = rows
        .into_iter()
        .map(Notification::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(GetNotificationListResponse { notifications }))
}

pub async fn mark_notification_read(
    pool: web::Data<MySqlPool>,
    request: web::Json<MarkReadRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = sqlx::query(
        "UPDATE Notifications_ SET is_read = TRUE
         WHERE notification_id = ? AND recipient_id = ?",
    )
    .bind(request.notification_id)
    .bind(request.user_id)
    .execute(pool.get_ref())
    .await?;

    if outcome.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "notification {} not found for user {}",
            request.notification_id, request.user_id
        )));
    }

    info!(
        "notification {} marked read by user {}",
        request.notification_id, request.user_id
    );
    Ok(HttpResponse::Ok().json(MarkReadResponse {
        success: true,
        message: "Notification marked as read".to_string(),
    }))
}
