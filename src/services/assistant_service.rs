use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::HelpdeskError;

/// Constantes figées de l'appel de complétion
const ASSISTANT_MODEL: &str = "gpt-3.5-turbo";
const MAX_RESPONSE_TOKENS: u32 = 150;
const SAMPLING_TEMPERATURE: f32 = 0.7;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Réponse statique renvoyée quand l'assistant n'est pas joignable
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm unable to respond right now. Please try again later or contact support.";

const SYSTEM_PROMPT: &str = "You are a Patient Helpdesk Assistant specialized in insurance policies, claims, and denials. Provide helpful, accurate, and concise responses related to health insurance inquiries, policy details, claim processes, and denial reasons (e.g., 'Insufficient documentation', 'Policy expired'). Focus on policies like Basic Health Insurance and Comprehensive Health Insurance, and assist with resolving denied claims. If the user asks about unrelated topics, politely redirect them to insurance-related queries.";

/// Un tour de conversation, côté requête et côté transcript client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Adaptateur requête/réponse sans état: le transcript complet arrive du
/// client à chaque appel, rien n'est conservé côté serveur.
pub struct AssistantService;

impl AssistantService {
    /// Envoie le transcript + la nouvelle saisie à l'API de complétion et
    /// renvoie le texte de la première complétion.
    pub async fn complete(
        client: &reqwest::Client,
        history: &[ChatMessage],
        user_input: &str,
    ) -> Result<String, HelpdeskError> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| HelpdeskError::AssistantUnavailable)?;

        let request = CompletionRequest {
            model: ASSISTANT_MODEL,
            messages: Self::build_messages(history, user_input),
            max_tokens: MAX_RESPONSE_TOKENS,
            temperature: SAMPLING_TEMPERATURE,
        };

        let response = client
            .post(COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                eprintln!("Chatbot error: {}", e);
                HelpdeskError::AssistantUnavailable
            })?;

        if !response.status().is_success() {
            eprintln!("Chatbot error: completion API returned {}", response.status());
            return Err(HelpdeskError::AssistantUnavailable);
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            eprintln!("Chatbot error: {}", e);
            HelpdeskError::AssistantUnavailable
        })?;

        completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or(HelpdeskError::AssistantUnavailable)
    }

    /// Prompt système en tête, transcript dans l'ordre, nouvelle saisie en queue
    fn build_messages(history: &[ChatMessage], user_input: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user_input.to_string(),
        });
        messages
    }
}
