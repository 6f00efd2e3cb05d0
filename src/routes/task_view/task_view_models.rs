use serde::{Deserialize, Serialize};

use crate::models::comment::Comment;
use crate::models::task::Task;
use crate::services::task_update::{NewTask, TaskUpdate};

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub organization_id: i64,
    pub project_id: i64,
    pub actor_user_id: i64,
    pub task: NewTask,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub organization_id: i64,
    pub project_id: i64,
    pub task_id: i64,
    pub actor_user_id: i64,
    pub update: TaskUpdate,
}

#[derive(Deserialize)]
pub struct DeleteTaskRequest {
    pub organization_id: i64,
    pub project_id: i64,
    pub task_id: i64,
    pub actor_user_id: i64,
}

#[derive(Deserialize)]
pub struct ReorderTasksRequest {
    pub organization_id: i64,
    pub project_id: i64,
    pub actor_user_id: i64,
    /// Complete ordered list; index becomes the new display order.
    pub ordered_task_ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct GetTaskListRequest {
    pub organization_id: i64,
    pub project_id: i64,
}

#[derive(Deserialize)]
pub struct AddCommentRequest {
    pub organization_id: i64,
    pub project_id: i64,
    pub task_id: i64,
    pub actor_user_id: i64,
    pub content: String,
}

#[derive(Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

#[derive(Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Vec<Comment>,
}

#[derive(Serialize)]
pub struct GetTaskListResponse {
    pub tasks: Vec<TaskDetail>,
}

#[derive(Serialize)]
pub struct AddCommentResponse {
    pub comment: Comment,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}
