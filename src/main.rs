mod db;
mod errors;
mod middleware;
mod models;
mod routes;
mod services;
mod session;
mod utils;

use actix_web::{App, HttpServer, web};
use std::sync::Arc;

use services::email_service::{Mailer, SmtpMailer};
use services::inquiry_service::DOCUMENTS_DIR;
use services::reset_service::ResetStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    std::fs::create_dir_all(DOCUMENTS_DIR)?;

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    db::init_schema(&db)
        .await
        .expect("Failed to initialize database schema");
    println!("✅ Database connected!");

    // État partagé: challenges de reset (éphémères), mailer SMTP,
    // client HTTP de l'assistant
    let reset_store = web::Data::new(ResetStore::new());
    let mailer: web::Data<dyn Mailer> = web::Data::from(Arc::new(SmtpMailer) as Arc<dyn Mailer>);
    let http_client = web::Data::new(reqwest::Client::new());

    println!("🚀 Starting server on http://127.0.0.1:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(reset_store.clone())
            .app_data(mailer.clone())
            .app_data(http_client.clone())
            .configure(routes::configure_routes)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
