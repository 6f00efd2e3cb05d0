// src/routes/mod.rs

pub mod routes;

pub mod notification_view;
pub mod project_view;
pub mod task_view;
