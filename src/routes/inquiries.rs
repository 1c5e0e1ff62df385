use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, get, post, web};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use validator::Validate;

use crate::errors::HelpdeskError;
use crate::middleware::AuthUser;
use crate::models::dto::{DeniedInquiryResponse, PolicyInquiryRequest, PolicyInquiryResponse};
use crate::models::{denied_inquiries, policy_inquiries};
use crate::services::inquiry_service::InquiryService;

/// Formulaire de réclamation refusée, document optionnel
#[derive(MultipartForm)]
pub struct DeniedInquiryForm {
    pub patient_name: Text<String>,
    pub patient_id: Text<String>,
    pub policy_id: Text<String>,
    pub policy_name: Text<String>,
    pub document: Option<TempFile>,
}

/// POST /inquiries/policy - Soumettre une policy inquiry (PROTÉGÉE)
#[post("/policy")]
pub async fn submit_policy_inquiry(
    _auth_user: AuthUser,
    body: web::Json<PolicyInquiryRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Valider le formulaire (champs requis + mobile à 10 chiffres)
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 2. La recommandation est dérivée de l'âge, renvoyée mais pas stockée
    let recommended_policy = InquiryService::recommended_policy(body.age).to_string();

    // 3. Persister
    match InquiryService::save_policy_inquiry(db.get_ref(), body.into_inner()).await {
        Ok(inquiry) => HttpResponse::Created().json(PolicyInquiryResponse {
            id: inquiry.id,
            recommended_policy,
        }),
        Err(e) => HelpdeskError::Database(e).to_response(),
    }
}

/// GET /inquiries/policy - Lister les policy inquiries (PROTÉGÉE)
#[get("/policy")]
pub async fn get_policy_inquiries(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let inquiries = policy_inquiries::Entity::find()
        .order_by_desc(policy_inquiries::Column::Timestamp)
        .order_by_desc(policy_inquiries::Column::Id)
        .all(db.get_ref())
        .await;

    match inquiries {
        Ok(inquiries) => HttpResponse::Ok().json(inquiries),
        Err(e) => HelpdeskError::Database(e).to_response(),
    }
}

/// POST /inquiries/denied - Signaler une réclamation refusée (PROTÉGÉE)
#[post("/denied")]
pub async fn submit_denied_inquiry(
    _auth_user: AuthUser,
    form: MultipartForm<DeniedInquiryForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let DeniedInquiryForm {
        patient_name,
        patient_id,
        policy_id,
        policy_name,
        document,
    } = form.into_inner();

    let patient_name = patient_name.0;
    let patient_id = patient_id.0;
    let policy_id = policy_id.0;
    let policy_name = policy_name.0;

    // 1. Tous les champs texte sont requis
    if patient_name.is_empty() || patient_id.is_empty() || policy_id.is_empty() || policy_name.is_empty() {
        return HelpdeskError::Validation("All fields are required.".to_string()).to_response();
    }

    // 2. Motif dérivé de la longueur du patient_id (règle métier figée)
    let denial_reason = InquiryService::denial_reason(&patient_id).to_string();

    // 3. Écrire la pièce jointe éventuelle sous denied_documents/
    let document_path = match &document {
        Some(attachment) => {
            let original_name = attachment
                .file_name
                .clone()
                .unwrap_or_else(|| "document".to_string());

            match InquiryService::store_document(
                &patient_id,
                &policy_id,
                &original_name,
                attachment.file.path(),
            ) {
                Ok(path) => Some(path),
                Err(e) => {
                    return HttpResponse::InternalServerError().json(serde_json::json!({
                        "error": format!("Failed to store document: {}", e)
                    }));
                }
            }
        }
        None => None,
    };

    // 4. Persister
    let saved = InquiryService::save_denied_inquiry(
        db.get_ref(),
        patient_name,
        patient_id,
        policy_id,
        policy_name,
        denial_reason.clone(),
        document_path.clone(),
    )
    .await;

    match saved {
        Ok(inquiry) => HttpResponse::Created().json(DeniedInquiryResponse {
            id: inquiry.id,
            denial_reason,
            document_path,
        }),
        Err(e) => HelpdeskError::Database(e).to_response(),
    }
}

/// GET /inquiries/denied - Lister les réclamations refusées (PROTÉGÉE)
#[get("/denied")]
pub async fn get_denied_inquiries(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let inquiries = denied_inquiries::Entity::find()
        .order_by_desc(denied_inquiries::Column::Timestamp)
        .order_by_desc(denied_inquiries::Column::Id)
        .all(db.get_ref())
        .await;

    match inquiries {
        Ok(inquiries) => HttpResponse::Ok().json(inquiries),
        Err(e) => HelpdeskError::Database(e).to_response(),
    }
}

pub fn inquiry_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/inquiries")
            .service(submit_policy_inquiry)
            .service(get_policy_inquiries)
            .service(submit_denied_inquiry)
            .service(get_denied_inquiries),
    );
}
