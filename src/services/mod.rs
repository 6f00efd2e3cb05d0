// src/services/mod.rs

pub mod comments;
pub mod notifications;
pub mod permissions;
pub mod reorder;
pub mod scope;
pub mod status;
pub mod task_update;
