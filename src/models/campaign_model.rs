//! models/campaign_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipient {
    pub id: i64,
    pub campaign_id: i64,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    /// Nombre de la plantilla (se busca en DB sin distinguir mayúsculas)
    pub template_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[sqlx(skip)]
    pub recipients: Vec<Recipient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipientRequest {
    pub email: String,
    pub name: String,
}

/// Body de POST/PUT /api/campaigns
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignRequest {
    pub name: String,
    pub template_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub recipients: Vec<RecipientRequest>,
}
