use serde::Serialize;

#[derive(sqlx::FromRow, Serialize)]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
}
