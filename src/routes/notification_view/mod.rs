pub mod notification_view_handlers;
pub mod notification_view_models;
