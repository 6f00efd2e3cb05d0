pub mod task_view_handlers;
pub mod task_view_models;
