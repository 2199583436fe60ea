//! services/tracking_service.rs
//! Registro idempotente de aperturas y clicks sobre un `DeliveryRecord`.

use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::errors::{AppError, DbResultExt, Result};
use crate::models::delivery_model::DeliveryRecord;

/// Token opaco y único por correo enviado
pub fn new_tracking_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Clone, Debug)]
pub struct TrackingService {
    db_pool: Pool<Sqlite>,
}

impl TrackingService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        TrackingService { db_pool }
    }

    /// Marca el correo como abierto. Llamadas repetidas no pisan el primer timestamp.
    pub async fn record_opened(&self, tracking_id: &str) -> Result<()> {
        let tracking_id = validate_tracking_id(tracking_id)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE delivery_records
            SET opened = 1,
                opened_at = COALESCE(opened_at, ?1)
            WHERE id = ?2
            "#,
        )
        .bind(now)
        .bind(tracking_id)
        .execute(&self.db_pool)
        .await
        .db_context("Failed to mark delivery record as opened")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("delivery record", tracking_id));
        }

        log::info!("Apertura registrada para emailId={}", tracking_id);
        Ok(())
    }

    /// Marca el enlace como clickeado. Mismas reglas que `record_opened`.
    pub async fn record_clicked(&self, tracking_id: &str) -> Result<()> {
        let tracking_id = validate_tracking_id(tracking_id)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE delivery_records
            SET clicked = 1,
                clicked_at = COALESCE(clicked_at, ?1)
            WHERE id = ?2
            "#,
        )
        .bind(now)
        .bind(tracking_id)
        .execute(&self.db_pool)
        .await
        .db_context("Failed to mark delivery record as clicked")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("delivery record", tracking_id));
        }

        log::info!("Click registrado para emailId={}", tracking_id);
        Ok(())
    }

    pub async fn get_record(&self, tracking_id: &str) -> Result<DeliveryRecord> {
        let tracking_id = validate_tracking_id(tracking_id)?;

        sqlx::query_as::<_, DeliveryRecord>(
            r#"
            SELECT id, campaign_id, recipient_id, sent_at,
                   opened, clicked, opened_at, clicked_at
            FROM delivery_records
            WHERE id = ?1
            "#,
        )
        .bind(tracking_id)
        .fetch_optional(&self.db_pool)
        .await
        .db_context("Failed to load delivery record")?
        .ok_or_else(|| AppError::not_found("delivery record", tracking_id))
    }
}

fn validate_tracking_id(tracking_id: &str) -> Result<&str> {
    let trimmed = tracking_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Email ID cannot be null or empty."));
    }
    Ok(trimmed)
}
