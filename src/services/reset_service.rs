use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;

/// Un code soumis à la minute 10 exactement est déjà refusé (strictement avant)
pub const RESET_CODE_TTL_MINUTES: i64 = 10;
/// Nombre d'essais de code autorisés avant d'invalider le challenge
pub const MAX_CODE_ATTEMPTS: u32 = 5;

/// Génère un code à 6 chiffres, chaque chiffre tiré uniformément de 0 à 9
pub fn generate_reset_code() -> String {
    let mut rng = rand::thread_rng();
    (0..6).map(|_| char::from(b'0' + rng.gen_range(0u8..10))).collect()
}

struct ResetChallenge {
    code: String,
    expires_at: DateTime<Utc>,
    attempts: u32,
}

/// Challenges de reset en cours, un au plus par email.
/// État éphémère du process: jamais persisté, perdu au redémarrage.
pub struct ResetStore {
    challenges: Mutex<HashMap<String, ResetChallenge>>,
}

impl ResetStore {
    pub fn new() -> Self {
        ResetStore {
            challenges: Mutex::new(HashMap::new()),
        }
    }

    /// Enregistre un nouveau challenge pour cet email.
    /// Un challenge déjà en cours pour le même email est remplacé.
    pub fn issue(&self, email: &str, code: String, now: DateTime<Utc>) {
        let mut challenges = self.challenges.lock().unwrap();
        challenges.insert(
            email.to_string(),
            ResetChallenge {
                code,
                expires_at: now + Duration::minutes(RESET_CODE_TTL_MINUTES),
                attempts: 0,
            },
        );
    }

    /// Valide un code soumis. Réussit seulement si un challenge existe pour
    /// cet email, que le code correspond et que `now` est strictement avant
    /// l'expiration; le challenge est alors consommé. Un code faux laisse le
    /// challenge en place mais compte un essai; au bout de MAX_CODE_ATTEMPTS
    /// le challenge est invalidé.
    pub fn verify_and_consume(&self, email: &str, code: &str, now: DateTime<Utc>) -> bool {
        let mut challenges = self.challenges.lock().unwrap();

        let challenge = match challenges.get_mut(email) {
            Some(challenge) => challenge,
            None => return false,
        };

        if now >= challenge.expires_at {
            challenges.remove(email);
            return false;
        }

        if challenge.code != code {
            challenge.attempts += 1;
            if challenge.attempts >= MAX_CODE_ATTEMPTS {
                challenges.remove(email);
            }
            return false;
        }

        challenges.remove(email);
        true
    }
}
