use actix_web::HttpResponse;
use sea_orm::DbErr;
use std::fmt;

/// Erreurs applicatives, toutes récupérées au point d'occurrence
/// et renvoyées au client comme message JSON.
#[derive(Debug)]
pub enum HelpdeskError {
    /// Champ manquant ou mal formé, aucun changement d'état
    Validation(String),
    /// Email déjà enregistré à l'inscription
    DuplicateEmail,
    /// Login refusé (email inconnu ou mot de passe invalide)
    InvalidCredentials,
    /// Code de reset faux, expiré ou épuisé
    InvalidOrExpiredCode,
    /// Échec d'envoi de l'email avec le code
    DeliveryFailure(String),
    /// Clé API absente ou appel à l'API de complétion en échec
    AssistantUnavailable,
    Database(DbErr),
}

impl fmt::Display for HelpdeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelpdeskError::Validation(message) => write!(f, "{}", message),
            HelpdeskError::DuplicateEmail => write!(f, "Email already registered."),
            HelpdeskError::InvalidCredentials => write!(f, "Invalid credentials."),
            HelpdeskError::InvalidOrExpiredCode => write!(f, "Invalid or expired code."),
            HelpdeskError::DeliveryFailure(reason) => {
                write!(f, "Failed to send email: {}", reason)
            }
            HelpdeskError::AssistantUnavailable => {
                write!(f, "Assistant is unavailable right now.")
            }
            HelpdeskError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for HelpdeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HelpdeskError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbErr> for HelpdeskError {
    fn from(e: DbErr) -> Self {
        HelpdeskError::Database(e)
    }
}

impl HelpdeskError {
    /// Convertit l'erreur en réponse HTTP avec un corps {"error": "..."}
    pub fn to_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "error": self.to_string() });
        match self {
            HelpdeskError::Validation(_) | HelpdeskError::InvalidOrExpiredCode => {
                HttpResponse::BadRequest().json(body)
            }
            HelpdeskError::InvalidCredentials => HttpResponse::Unauthorized().json(body),
            HelpdeskError::DuplicateEmail => HttpResponse::Conflict().json(body),
            HelpdeskError::DeliveryFailure(_) => HttpResponse::BadGateway().json(body),
            HelpdeskError::AssistantUnavailable => HttpResponse::ServiceUnavailable().json(body),
            HelpdeskError::Database(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}
