use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::errors::HelpdeskError;
use crate::middleware::AuthUser;
use crate::services::assistant_service::{AssistantService, ChatMessage, FALLBACK_REPLY};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Transcript complet tenu par le client, dans l'ordre
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat - Relayer la conversation à l'assistant (PROTÉGÉE)
#[post("/chat")]
pub async fn chat(
    _auth_user: AuthUser,
    body: web::Json<ChatRequest>,
    client: web::Data<reqwest::Client>,
) -> HttpResponse {
    if body.message.trim().is_empty() {
        return HelpdeskError::Validation("Please enter a message.".to_string()).to_response();
    }

    // L'assistant injoignable n'est pas une erreur pour l'utilisateur:
    // la réponse devient le message d'excuse statique
    let reply = match AssistantService::complete(client.get_ref(), &body.history, &body.message).await
    {
        Ok(reply) => reply,
        Err(_) => FALLBACK_REPLY.to_string(),
    };

    HttpResponse::Ok().json(ChatResponse { reply })
}

pub fn chat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(chat);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    use crate::utils::jwt;

    fn bearer_token() -> String {
        unsafe { std::env::set_var("JWT_SECRET", "test-secret") };
        let token = jwt::generate_token(1, "jane@example.com").unwrap();
        format!("Bearer {}", token)
    }

    #[actix_web::test]
    async fn test_chat_degrades_to_apology_without_api_key() {
        unsafe { std::env::remove_var("OPENAI_API_KEY") };

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(reqwest::Client::new()))
                .service(web::scope("/api").configure(chat_routes)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/chat")
                .insert_header(("Authorization", bearer_token()))
                .set_json(serde_json::json!({
                    "message": "What does my policy cover?",
                    "history": []
                }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["reply"], FALLBACK_REPLY);
    }

    #[actix_web::test]
    async fn test_chat_rejects_empty_message() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(reqwest::Client::new()))
                .service(web::scope("/api").configure(chat_routes)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/chat")
                .insert_header(("Authorization", bearer_token()))
                .set_json(serde_json::json!({ "message": "   " }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Please enter a message.");
    }
}
