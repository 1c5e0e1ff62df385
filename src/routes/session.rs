use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::session::{NavAction, Page, Session};

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub session: Session,
    pub action: NavAction,
}

#[derive(Serialize)]
pub struct NavigateResponse {
    pub page: Page,
    pub session: Session,
}

/// POST /session/navigate - Transition pure de l'état de page (PUBLIC).
/// L'objet session voyage avec le client; le serveur applique la table de
/// transitions et le gating par le flag de login. L'accès aux données reste
/// protégé par le JWT, indépendamment de cet état d'affichage.
#[post("/navigate")]
pub async fn navigate(body: web::Json<NavigateRequest>) -> HttpResponse {
    let NavigateRequest { mut session, action } = body.into_inner();

    let page = session.navigate(action);

    HttpResponse::Ok().json(NavigateResponse { page, session })
}

pub fn session_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/session").service(navigate));
}
