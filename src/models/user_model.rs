use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_phished: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub is_phished: bool,
}

/// Resultado de un usuario en una campaña
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PhishingTest {
    pub id: i64,
    pub campaign_id: i64,
    pub user_id: i64,
    pub is_phished: bool,
    pub phished_at: DateTime<Utc>,
}

/// POST /api/phishing/attempts
#[derive(Debug, Clone, Deserialize)]
pub struct LogAttemptRequest {
    pub user_id: i64,
    pub campaign_id: i64,
    pub is_phished: bool,
}
