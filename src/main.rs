use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use sqlx::mysql::MySqlPoolOptions;

use taskhive_backend::routes::routes;
use taskhive_backend::services::notifications::{NoopChannel, RealtimeChannel};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create pool");

    let server_address = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    println!("Server running at http://{}", server_address);

    // No live push transport attached; notifications are persisted only.
    let realtime: web::Data<dyn RealtimeChannel> = web::Data::from(Arc::new(NoopChannel) as Arc<dyn RealtimeChannel>);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(realtime.clone())
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Hello, world!") }))
            .configure(routes::project_view_configure)
            .configure(routes::task_view_configure)
            .configure(routes::notification_view_configure)
    })
    .bind(server_address)?
    .run()
    .await
}
