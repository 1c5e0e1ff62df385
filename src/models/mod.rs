// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle de table correspond à une table SQLite avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Comptes patients (email unique, mot de passe hashé)
//   - policy_inquiries : Demandes de renseignement police (immuables)
//   - denied_inquiries : Réclamations refusées + pièce jointe (immuables)
//   - dto : Data Transfer Objects des formulaires et réponses API
//
// Points d'attention:
//   - Tous les modèles de table utilisent SeaORM (pas de SQL brut)
//   - Le schéma est créé au démarrage (db::init_schema), pas de migrations
//   - Le reset challenge n'a PAS de table: état éphémère en mémoire
//     (services::reset_service)
//
// ============================================================================

pub mod denied_inquiries;
pub mod dto;
pub mod health;
pub mod policy_inquiries;
pub mod users;
