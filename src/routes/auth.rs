use actix_web::{HttpResponse, get, post, web};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::HelpdeskError;
use crate::middleware::AuthUser;
use crate::models::users::{self, Column as UserColumn, Entity as Users};
use crate::services::email_service::Mailer;
use crate::services::reset_service::{self, ResetStore};
use crate::session::Session;
use crate::utils::{jwt, password};

// DTO pour l'inscription
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    pub dob: NaiveDate,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150."))]
    pub age: i32,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// DTO pour la demande de code de reset
#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

// DTO pour le changement de mot de passe via le code emaillé.
// Pas d'ancien mot de passe: le code a déjà prouvé l'identité.
#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

// Réponse après login
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub session: Session,
}

// Réponse pour /auth/me
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i32,
    pub email: String,
}

/// POST /auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Valider le formulaire
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 2. Vérifier si l'email est déjà enregistré
    let existing_user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await;

    match existing_user {
        Ok(Some(_)) => {
            return HelpdeskError::DuplicateEmail.to_response();
        }
        Err(e) => {
            return HelpdeskError::Database(e).to_response();
        }
        _ => {}
    }

    // 3. Hash le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    // 4. Créer l'utilisateur
    let new_user = users::ActiveModel {
        name: Set(body.name.clone()),
        email: Set(body.email.clone()),
        dob: Set(body.dob),
        age: Set(body.age),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    match new_user.insert(db.get_ref()).await {
        Ok(user) => HttpResponse::Created().json(serde_json::json!({
            "message": "Account signed up successfully!",
            "user_id": user.id
        })),
        Err(e) => HelpdeskError::Database(e).to_response(),
    }
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Trouver l'utilisateur
    let user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await;

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => return HelpdeskError::InvalidCredentials.to_response(),
        Err(e) => return HelpdeskError::Database(e).to_response(),
    };

    // 2. Vérifier le mot de passe
    let is_valid = match password::verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return HelpdeskError::InvalidCredentials.to_response();
    }

    // 3. Générer le JWT
    let token = match jwt::generate_token(user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    // 4. Ouvrir la session côté client (arrive sur le dashboard)
    let mut session = Session::new();
    session.log_in(&user.email);

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        name: user.name,
        email: user.email,
        session,
    })
}

/// GET /auth/me - Vérifier le token (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user_id: auth_user.user_id,
        email: auth_user.email,
    })
}

/// POST /auth/forgot-password - Envoyer un code de reset (PUBLIC)
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    reset_store: web::Data<ResetStore>,
    mailer: web::Data<dyn Mailer>,
) -> HttpResponse {
    // 1. L'email doit correspondre à un compte
    let user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await;

    match user {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Email not found."
            }));
        }
        Err(e) => return HelpdeskError::Database(e).to_response(),
    }

    // 2. Générer le code et l'envoyer par email.
    //    En cas d'échec d'envoi, aucun challenge n'est enregistré.
    let code = reset_service::generate_reset_code();

    if let Err(e) = mailer.send_reset_code(&body.email, &code).await {
        return e.to_response();
    }

    // 3. Enregistrer le challenge (remplace un éventuel challenge en cours)
    reset_store.issue(&body.email, code, Utc::now());

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Reset code sent. Valid for 10 minutes."
    }))
}

/// POST /auth/reset-password - Changer le mot de passe avec le code (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    reset_store: web::Data<ResetStore>,
) -> HttpResponse {
    // 1. Les deux saisies du nouveau mot de passe doivent correspondre
    if body.new_password != body.confirm_password {
        return HelpdeskError::Validation("Passwords do not match.".to_string()).to_response();
    }

    if body.new_password.is_empty() {
        return HelpdeskError::Validation("Password is required.".to_string()).to_response();
    }

    // 2. Valider et consommer le challenge (code + email + expiration stricte)
    if !reset_store.verify_and_consume(&body.email, &body.code, Utc::now()) {
        return HelpdeskError::InvalidOrExpiredCode.to_response();
    }

    // 3. Récupérer l'utilisateur
    let user = match Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Email not found."
            }));
        }
        Err(e) => return HelpdeskError::Database(e).to_response(),
    };

    // 4. Re-hasher et écraser le mot de passe
    let new_password_hash = match password::hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    let mut active_model: users::ActiveModel = user.into();
    active_model.password_hash = Set(new_password_hash);

    match active_model.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Password reset successfully."
        })),
        Err(e) => HelpdeskError::Database(e).to_response(),
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me)
            .service(forgot_password)
            .service(reset_password),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use sea_orm::{ConnectOptions, Database};
    use std::sync::{Arc, Mutex};

    /// Mailer de test: enregistre les envois au lieu de parler SMTP
    struct StubMailer {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl StubMailer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(StubMailer {
                fail,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn last_code(&self) -> Option<String> {
            self.sent.lock().unwrap().last().map(|(_, code)| code.clone())
        }
    }

    #[async_trait]
    impl Mailer for StubMailer {
        async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), HelpdeskError> {
            if self.fail {
                return Err(HelpdeskError::DeliveryFailure("SMTP unreachable".to_string()));
            }
            self.sent.lock().unwrap().push((to.to_string(), code.to_string()));
            Ok(())
        }
    }

    async fn setup_db() -> DatabaseConnection {
        // Une seule connexion pour que la base en mémoire soit partagée
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        crate::db::init_schema(&db).await.unwrap();
        db
    }

    macro_rules! test_app {
        ($db:expr, $mailer:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .app_data(web::Data::new(ResetStore::new()))
                    .app_data(web::Data::from($mailer.clone() as Arc<dyn Mailer>))
                    .service(web::scope("/api").configure(auth_routes)),
            )
            .await
        };
    }

    fn register_body(email: &str) -> serde_json::Value {
        serde_json::json!({
            "name": "Jane Doe",
            "email": email,
            "dob": "1990-05-17",
            "age": 35,
            "password": "s3cret!"
        })
    }

    fn set_test_secret() {
        unsafe { std::env::set_var("JWT_SECRET", "test-secret") };
    }

    #[actix_web::test]
    async fn test_register_then_login() {
        set_test_secret();
        let db = setup_db().await;
        let mailer = StubMailer::new(false);
        let app = test_app!(db, mailer);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body("jane@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "password": "s3cret!"
                }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["session"]["logged_in"], true);
        assert_eq!(body["session"]["page"], "dashboard");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        // Le hash ne doit jamais sortir
        assert!(body.get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password_fails() {
        set_test_secret();
        let db = setup_db().await;
        let mailer = StubMailer::new(false);
        let app = test_app!(db, mailer);

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body("jane@example.com"))
                .to_request(),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "password": "wrong"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_duplicate_email_is_a_conflict() {
        set_test_secret();
        let db = setup_db().await;
        let mailer = StubMailer::new(false);
        let app = test_app!(db, mailer);

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body("jane@example.com"))
                .to_request(),
        )
        .await;

        // Deuxième inscription avec le même email, autre mot de passe
        let mut second = register_body("jane@example.com");
        second["password"] = serde_json::json!("other-password");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(second)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

        // Le compte existant est intact: l'ancien mot de passe marche toujours
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "password": "s3cret!"
                }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_register_rejects_invalid_email() {
        let db = setup_db().await;
        let mailer = StubMailer::new(false);
        let app = test_app!(db, mailer);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body("not-an-email"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_forgot_password_unknown_email() {
        let db = setup_db().await;
        let mailer = StubMailer::new(false);
        let app = test_app!(db, mailer);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/forgot-password")
                .set_json(serde_json::json!({ "email": "nobody@example.com" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_full_reset_flow() {
        set_test_secret();
        let db = setup_db().await;
        let mailer = StubMailer::new(false);
        let app = test_app!(db, mailer);

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body("jane@example.com"))
                .to_request(),
        )
        .await;

        // 1. Demander un code
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/forgot-password")
                .set_json(serde_json::json!({ "email": "jane@example.com" }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let code = mailer.last_code().expect("reset code was emailed");
        assert_eq!(code.len(), 6);

        // 2. Un mauvais code est refusé, le challenge reste en place
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/reset-password")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "code": "000000",
                    "new_password": "new-pass",
                    "confirm_password": "new-pass"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        // 3. Le bon code change le mot de passe
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/reset-password")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "code": code,
                    "new_password": "new-pass",
                    "confirm_password": "new-pass"
                }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        // 4. Ancien mot de passe refusé, nouveau accepté
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "password": "s3cret!"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "password": "new-pass"
                }))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        // 5. Le code est consommé: il ne passe pas deux fois
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/reset-password")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "code": code,
                    "new_password": "again",
                    "confirm_password": "again"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delivery_failure_is_reported() {
        set_test_secret();
        let db = setup_db().await;
        let mailer = StubMailer::new(true);
        let app = test_app!(db, mailer);

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body("jane@example.com"))
                .to_request(),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/forgot-password")
                .set_json(serde_json::json!({ "email": "jane@example.com" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_reset_password_requires_matching_confirmation() {
        let db = setup_db().await;
        let mailer = StubMailer::new(false);
        let app = test_app!(db, mailer);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/reset-password")
                .set_json(serde_json::json!({
                    "email": "jane@example.com",
                    "code": "123456",
                    "new_password": "one",
                    "confirm_password": "two"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Passwords do not match.");
    }
}
