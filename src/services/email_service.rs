use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;

use crate::errors::HelpdeskError;

// trait = Interface, pour pouvoir substituer le transport dans les tests
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), HelpdeskError>;
}

/// Envoi réel via SMTP (STARTTLS, port submission).
/// SENDER_EMAIL et SENDER_PASSWORD doivent être fournis par l'environnement,
/// sans valeur par défaut. SMTP_HOST est un hôte, pas un secret.
pub struct SmtpMailer;

impl SmtpMailer {
    fn parse_mailbox(address: &str) -> Result<Mailbox, HelpdeskError> {
        address
            .parse()
            .map_err(|e| HelpdeskError::DeliveryFailure(format!("Invalid address {}: {}", address, e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), HelpdeskError> {
        // 1. Lire la configuration SMTP
        let sender = env::var("SENDER_EMAIL")
            .map_err(|_| HelpdeskError::DeliveryFailure("SENDER_EMAIL is not configured".to_string()))?;
        let password = env::var("SENDER_PASSWORD")
            .map_err(|_| HelpdeskError::DeliveryFailure("SENDER_PASSWORD is not configured".to_string()))?;
        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        // 2. Construire le message
        let message = Message::builder()
            .from(Self::parse_mailbox(&sender)?)
            .to(Self::parse_mailbox(to)?)
            .subject("Password Reset Code - Patient Helpdesk")
            .body(format!(
                "Your 6-digit reset code is: {}\n\nValid for 10 minutes.",
                code
            ))
            .map_err(|e| HelpdeskError::DeliveryFailure(format!("Failed to build email: {}", e)))?;

        // 3. Envoyer via STARTTLS
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .map_err(|e| HelpdeskError::DeliveryFailure(format!("SMTP relay error: {}", e)))?
            .credentials(Credentials::new(sender, password))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| HelpdeskError::DeliveryFailure(e.to_string()))?;

        Ok(())
    }
}
