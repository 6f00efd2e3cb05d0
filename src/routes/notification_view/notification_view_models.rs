use serde::{Deserialize, Serialize};

use crate::models::notification::Notification;

#[derive(Deserialize)]
pub struct GetNotificationListRequest {
    pub user_id: i64,
}

#[derive(Serialize)]
pub struct GetNotificationListResponse {
    pub notifications: Vec<Notification>,
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub user_id: i64,
    pub notification_id: i64,
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
    pub message: String,
}
