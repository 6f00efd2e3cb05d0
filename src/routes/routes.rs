use actix_web::web;

use super::notification_view::notification_view_handlers;
use super::project_view::project_view_handlers;
use super::task_view::task_view_handlers;

pub fn project_view_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-project-view")
            .route("", web::get().to(project_view_handlers::project_view_get))
            .route("/", web::get().to(project_view_handlers::project_view_get))
            .route("/project-list", web::post().to(project_view_handlers::get_project_list)),
    );
}

pub fn task_view_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-task-view")
            .route("", web::get().to(task_view_handlers::task_view_get))
            .route("/", web::get().to(task_view_handlers::task_view_get))
            .route("/create", web::post().to(task_view_handlers::create_task))
            .route("/update", web::post().to(task_view_handlers::update_task))
            .route("/delete", web::post().to(task_view_handlers::delete_task))
            .route("/reorder", web::post().to(task_view_handlers::reorder_tasks))
            .route("/task-list", web::post().to(task_view_handlers::get_task_list))
            .route("/add-comment", web::post().to(task_view_handlers::add_comment)),
    );
}

pub fn notification_view_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-notification-view")
            .route("", web::get().to(notification_view_handlers::notification_view_get))
            .route("/", web::get().to(notification_view_handlers::notification_view_get))
            .route(
                "/notification-list",
                web::post().to(notification_view_handlers::get_notification_list),
            )
            .route(
                "/mark-read",
                web::post().to(notification_view_handlers::mark_notification_read),
            ),
    );
}
