use serde::{Deserialize, Serialize};

use crate::services::assistant_service::ChatMessage;

/// Ensemble fermé des pages de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Login,
    ForgotPassword,
    ResetPassword,
    Signup,
    Dashboard,
    PolicyInquiry,
    DeniedInquiry,
}

/// Actions de navigation déclenchées par les boutons du frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    OpenLogin,
    OpenSignup,
    OpenForgotPassword,
    OpenDashboard,
    OpenPolicyInquiry,
    OpenDeniedInquiry,
    Back,
    SignupCompleted,
    ResetCodeSent,
    PasswordResetCompleted,
    Logout,
}

/// Contexte d'une session utilisateur: flag de login, page courante et
/// transcript du chat. L'objet voyage avec le client; l'autorisation réelle
/// des routes protégées reste portée par le JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    pub user_email: Option<String>,
    pub page: Page,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            logged_in: false,
            user_email: None,
            page: Page::Home,
            chat_history: Vec::new(),
        }
    }

    /// Ouvre la session après un login réussi et arrive sur le dashboard
    pub fn log_in(&mut self, email: &str) {
        self.logged_in = true;
        self.user_email = Some(email.to_string());
        self.page = Page::Dashboard;
    }

    /// Ferme la session: retour à l'accueil, transcript du chat effacé
    pub fn log_out(&mut self) {
        self.logged_in = false;
        self.user_email = None;
        self.page = Page::Home;
        self.chat_history.clear();
    }

    /// Applique une action de navigation et renvoie la page résultante.
    /// Les pages derrière le login ne sont atteignables que connecté;
    /// un couple (page, action) sans transition laisse la page inchangée.
    pub fn navigate(&mut self, action: NavAction) -> Page {
        // Actions de la sidebar, disponibles depuis n'importe quelle page
        // une fois connecté
        if self.logged_in {
            match action {
                NavAction::OpenDashboard => {
                    self.page = Page::Dashboard;
                    return self.page;
                }
                NavAction::OpenPolicyInquiry => {
                    self.page = Page::PolicyInquiry;
                    return self.page;
                }
                NavAction::OpenDeniedInquiry => {
                    self.page = Page::DeniedInquiry;
                    return self.page;
                }
                NavAction::Logout => {
                    self.log_out();
                    return self.page;
                }
                _ => {}
            }
        }

        self.page = match (self.page, action) {
            (Page::Home, NavAction::OpenLogin) => Page::Login,
            (Page::Home, NavAction::OpenSignup) => Page::Signup,

            (Page::Login, NavAction::Back) => Page::Home,
            (Page::Login, NavAction::OpenSignup) => Page::Signup,
            (Page::Login, NavAction::OpenForgotPassword) => Page::ForgotPassword,

            (Page::ForgotPassword, NavAction::Back) => Page::Login,
            (Page::ForgotPassword, NavAction::ResetCodeSent) => Page::ResetPassword,

            (Page::ResetPassword, NavAction::Back) => Page::ForgotPassword,
            (Page::ResetPassword, NavAction::PasswordResetCompleted) => Page::Login,

            (Page::Signup, NavAction::Back) => Page::Home,
            (Page::Signup, NavAction::SignupCompleted) => Page::Login,

            (Page::PolicyInquiry, NavAction::Back) if self.logged_in => Page::Dashboard,
            (Page::DeniedInquiry, NavAction::Back) if self.logged_in => Page::Dashboard,

            // Pas de transition pour ce couple: on reste sur place
            (page, _) => page,
        };

        self.page
    }
}
