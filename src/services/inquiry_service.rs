use chrono::Utc;
use sea_orm::*;
use std::path::Path;

use crate::models::dto::PolicyInquiryRequest;
use crate::models::{denied_inquiries, policy_inquiries};

pub const BASIC_POLICY: &str = "Basic Health Insurance";
pub const COMPREHENSIVE_POLICY: &str = "Comprehensive Health Insurance";

pub const REASON_INSUFFICIENT_DOCUMENTATION: &str = "Insufficient documentation";
pub const REASON_POLICY_EXPIRED: &str = "Policy expired";

/// Répertoire local des pièces jointes des réclamations refusées
pub const DOCUMENTS_DIR: &str = "denied_documents";

pub struct InquiryService;

impl InquiryService {
    /// Police recommandée, fonction pure de l'âge (bascule à 30 ans).
    /// Sortie consultative uniquement, jamais stockée.
    pub fn recommended_policy(age: i32) -> &'static str {
        if age < 30 { BASIC_POLICY } else { COMPREHENSIVE_POLICY }
    }

    /// Motif de refus dérivé déterministiquement de la longueur du patient_id
    pub fn denial_reason(patient_id: &str) -> &'static str {
        if patient_id.len() < 5 {
            REASON_INSUFFICIENT_DOCUMENTATION
        } else {
            REASON_POLICY_EXPIRED
        }
    }

    pub async fn save_policy_inquiry(
        db: &DatabaseConnection,
        request: PolicyInquiryRequest,
    ) -> Result<policy_inquiries::Model, DbErr> {
        let new_inquiry = policy_inquiries::ActiveModel {
            name: Set(request.name),
            age: Set(request.age),
            gender: Set(request.gender),
            mobile_number: Set(request.mobile_number),
            dob: Set(request.dob),
            place: Set(request.place),
            insurance_policy: Set(request.insurance_policy),
            timestamp: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        new_inquiry.insert(db).await
    }

    pub async fn save_denied_inquiry(
        db: &DatabaseConnection,
        patient_name: String,
        patient_id: String,
        policy_id: String,
        policy_name: String,
        denial_reason: String,
        document_path: Option<String>,
    ) -> Result<denied_inquiries::Model, DbErr> {
        let new_inquiry = denied_inquiries::ActiveModel {
            patient_name: Set(patient_name),
            patient_id: Set(patient_id),
            policy_id: Set(policy_id),
            policy_name: Set(policy_name),
            denial_reason: Set(denial_reason),
            document_path: Set(document_path),
            timestamp: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        new_inquiry.insert(db).await
    }

    /// Copie la pièce jointe sous DOCUMENTS_DIR au chemin
    /// {patient_id}_{policy_id}_{nom_original} et renvoie ce chemin.
    /// Chaque composant est réduit à un seul segment de chemin sûr.
    pub fn store_document(
        patient_id: &str,
        policy_id: &str,
        original_name: &str,
        source: &Path,
    ) -> std::io::Result<String> {
        let document_path = format!(
            "{}/{}_{}_{}",
            DOCUMENTS_DIR,
            sanitize_component(patient_id),
            sanitize_component(policy_id),
            sanitize_component(original_name),
        );

        std::fs::copy(source, &document_path)?;
        Ok(document_path)
    }
}

/// Garde uniquement le dernier segment et les caractères sans signification
/// pour le système de fichiers
fn sanitize_component(value: &str) -> String {
    let last_segment = value.rsplit(['/', '\\']).next().unwrap_or(value);
    let cleaned: String = last_segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_policy_boundary_at_30() {
        assert_eq!(InquiryService::recommended_policy(29), BASIC_POLICY);
        assert_eq!(InquiryService::recommended_policy(30), COMPREHENSIVE_POLICY);
        assert_eq!(InquiryService::recommended_policy(0), BASIC_POLICY);
        assert_eq!(InquiryService::recommended_policy(85), COMPREHENSIVE_POLICY);
    }

    #[test]
    fn test_denial_reason_from_patient_id_length() {
        assert_eq!(
            InquiryService::denial_reason("123"),
            REASON_INSUFFICIENT_DOCUMENTATION
        );
        // Longueur 5: pas strictement inférieur à 5
        assert_eq!(InquiryService::denial_reason("12345"), REASON_POLICY_EXPIRED);
        assert_eq!(InquiryService::denial_reason("P-100042"), REASON_POLICY_EXPIRED);
    }

    #[test]
    fn test_sanitize_component_flattens_paths() {
        assert_eq!(sanitize_component("scan.pdf"), "scan.pdf");
        assert_eq!(sanitize_component("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_component("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_component(".."), "file");
        assert_eq!(sanitize_component(""), "file");
    }
}
