// ============================================================================
// MODÈLE : DENIED INQUIRIES
// ============================================================================
//
// Description:
//   Réclamations refusées signalées par les patients, avec pièce jointe
//   optionnelle.
//
// Colonnes de la table denied_inquiries:
//   - id (INTEGER, PRIMARY KEY, AUTOINCREMENT)
//   - patient_name, patient_id, policy_id, policy_name (TEXT, NOT NULL)
//   - denial_reason (TEXT, NOT NULL) - dérivé de la longueur du patient_id
//   - document_path (TEXT, NULL) - renseigné seulement si un fichier est joint
//   - timestamp (TEXT, NOT NULL) - horodatage serveur à l'insertion
//
// Workflow:
//   1. Le patient soumet le formulaire (multipart, document optionnel)
//   2. L'API dérive denial_reason (voir InquiryService::denial_reason)
//   3. Le document éventuel est écrit sous denied_documents/
//      au chemin {patient_id}_{policy_id}_{nom_original}
//   4. La ligne est insérée avec le chemin du document
//
// Points d'attention:
//   - Les lignes sont immuables: insérées, jamais modifiées ni supprimées
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "denied_inquiries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub patient_name: String,

    pub patient_id: String,

    pub policy_id: String,

    pub policy_name: String,

    pub denial_reason: String,

    pub document_path: Option<String>,

    pub timestamp: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
