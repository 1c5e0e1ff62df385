// DTOs des formulaires d'inquiry et leurs réponses
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct PolicyInquiryRequest {
    #[validate(length(min = 1, message = "All fields are required."))]
    pub name: String,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150."))]
    pub age: i32,
    #[validate(length(min = 1, message = "All fields are required."))]
    pub gender: String,
    #[validate(custom(function = "validate_mobile_number", message = "Mobile number must be 10 digits."))]
    pub mobile_number: String,
    pub dob: NaiveDate,
    #[validate(length(min = 1, message = "All fields are required."))]
    pub place: String,
    #[validate(length(min = 1, message = "All fields are required."))]
    pub insurance_policy: String,
}

/// Réponse à la soumission d'une policy inquiry.
/// recommended_policy est consultatif, dérivé de l'âge, jamais stocké.
#[derive(Debug, Serialize)]
pub struct PolicyInquiryResponse {
    pub id: i32,
    pub recommended_policy: String,
}

#[derive(Debug, Serialize)]
pub struct DeniedInquiryResponse {
    pub id: i32,
    pub denial_reason: String,
    pub document_path: Option<String>,
}

/// Un numéro mobile valide fait exactement 10 chiffres ASCII
pub fn validate_mobile_number(mobile: &str) -> Result<(), ValidationError> {
    if mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("mobile_number"))
    }
}
