// ============================================================================
// MODÈLE : POLICY INQUIRIES
// ============================================================================
//
// Description:
//   Demandes de renseignement sur une police d'assurance, une ligne par
//   soumission du formulaire.
//
// Colonnes de la table policy_inquiries:
//   - id (INTEGER, PRIMARY KEY, AUTOINCREMENT)
//   - name, gender, place, insurance_policy (TEXT, NOT NULL)
//   - age (INTEGER, NOT NULL)
//   - mobile_number (TEXT, NOT NULL) - exactement 10 chiffres, validé côté API
//   - dob (TEXT, NOT NULL) - date de naissance
//   - timestamp (TEXT, NOT NULL) - horodatage serveur à l'insertion
//
// Points d'attention:
//   - Les lignes sont immuables: insérées, jamais modifiées ni supprimées
//   - La police recommandée renvoyée à la soumission n'est PAS stockée
//     (sortie consultative dérivée de l'âge)
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "policy_inquiries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub age: i32,

    pub gender: String,

    pub mobile_number: String,

    pub dob: Date,

    pub place: String,

    pub insurance_policy: String,

    pub timestamp: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
