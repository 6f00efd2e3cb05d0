// src/models/mod.rs

pub mod comment;
pub mod notification;
pub mod project;
pub mod role;
pub mod task;
pub mod user;
