use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                        // unique user ID
    pub name: String,                    // display name
    pub email: String,                   // sign-in key, unique
    #[serde(skip_serializing)]
    pub password_hash: String,           // Argon2 hash, not exposed in JSON
    pub last_activity_date: OffsetDateTime,
    pub created_at: OffsetDateTime,      // creation timestamp
}
