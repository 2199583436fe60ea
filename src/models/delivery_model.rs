//! models/delivery_model.rs
//! Estado de seguimiento de un correo enviado.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Invariante: `opened_at.is_some() == opened` y `clicked_at.is_some() == clicked`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DeliveryRecord {
    /// Identificador de tracking (UUID v4 en texto)
    pub id: String,
    pub campaign_id: i64,
    pub recipient_id: i64,
    pub sent_at: DateTime<Utc>,
    pub opened: bool,
    pub clicked: bool,
    pub opened_at: Option<DateTime<Utc>>,
    pub clicked_at: Option<DateTime<Utc>>,
}
