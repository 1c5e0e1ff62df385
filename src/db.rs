// connexion BD

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::env;

pub async fn establish_connection() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://patient_helpdesk.db?mode=rwc".to_string());

    Database::connect(&database_url).await
}

/// Crée les trois tables si elles n'existent pas (pas de migrations)
pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            dob TEXT NOT NULL,
            age INTEGER NOT NULL,
            password_hash TEXT NOT NULL
        )",
    )
    .await?;

    db.execute_unprepared(
        "CREATE TABLE IF NOT EXISTS policy_inquiries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL,
            mobile_number TEXT NOT NULL,
            dob TEXT NOT NULL,
            place TEXT NOT NULL,
            insurance_policy TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )",
    )
    .await?;

    db.execute_unprepared(
        "CREATE TABLE IF NOT EXISTS denied_inquiries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_name TEXT NOT NULL,
            patient_id TEXT NOT NULL,
            policy_id TEXT NOT NULL,
            policy_name TEXT NOT NULL,
            denial_reason TEXT NOT NULL,
            document_path TEXT,
            timestamp TEXT NOT NULL
        )",
    )
    .await?;

    Ok(())
}
