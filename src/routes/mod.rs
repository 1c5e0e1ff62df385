pub mod auth;
pub mod chat;
pub mod health;
pub mod inquiries;
pub mod session;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(inquiries::inquiry_routes)
            .configure(chat::chat_routes)
            .configure(session::session_routes),
    );
}
