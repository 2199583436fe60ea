use chrono::Utc;
use lettre::Address;
use sqlx::{Pool, Sqlite, Transaction};

use crate::errors::{AppError, DbResultExt, Result};
use crate::models::campaign_model::{Campaign, CampaignRequest, Recipient, RecipientRequest};

#[derive(Clone, Debug)]
pub struct CampaignService {
    db_pool: Pool<Sqlite>,
}

impl CampaignService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        CampaignService { db_pool }
    }

    /// Inserta la campaña y sus destinatarios en una sola transacción
    pub async fn create_campaign(&self, req: CampaignRequest) -> Result<Campaign> {
        validate_campaign(&req)?;

        let mut tx = self
            .db_pool
            .begin()
            .await
            .db_context("Failed to open transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO campaigns (name, template_name, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&req.name)
        .bind(&req.template_name)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .db_context("Failed to insert campaign")?;
        let campaign_id = result.last_insert_rowid();

        let recipients = insert_recipients(&mut tx, campaign_id, &req.recipients).await?;
        tx.commit().await.db_context("Failed to commit campaign")?;

        log::info!(
            "Campaña {} '{}' creada con {} destinatarios",
            campaign_id,
            req.name,
            recipients.len()
        );

        Ok(Campaign {
            id: campaign_id,
            name: req.name,
            template_name: req.template_name,
            start_date: req.start_date,
            end_date: req.end_date,
            recipients,
        })
    }

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        let mut campaigns = sqlx::query_as::<_, Campaign>(
            "SELECT id, name, template_name, start_date, end_date FROM campaigns ORDER BY id",
        )
        .fetch_all(&self.db_pool)
        .await
        .db_context("Failed to list campaigns")?;

        for campaign in campaigns.iter_mut() {
            campaign.recipients = self.list_recipients(campaign.id).await?;
        }
        Ok(campaigns)
    }

    pub async fn get_campaign(&self, id: i64) -> Result<Campaign> {
        let mut campaign = sqlx::query_as::<_, Campaign>(
            "SELECT id, name, template_name, start_date, end_date FROM campaigns WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .db_context("Failed to load campaign")?
        .ok_or_else(|| AppError::not_found("campaign", id))?;

        campaign.recipients = self.list_recipients(id).await?;
        Ok(campaign)
    }

    /// Actualiza datos y destinatarios. Los destinatarios se reconcilian por
    /// email, así los `DeliveryRecord` ya enviados se conservan; quitar a un
    /// destinatario que ya recibió correos es un error de validación.
    pub async fn update_campaign(&self, id: i64, req: CampaignRequest) -> Result<Campaign> {
        validate_campaign(&req)?;

        let mut tx = self
            .db_pool
            .begin()
            .await
            .db_context("Failed to open transaction")?;

        let result = sqlx::query(
            r#"
            UPDATE campaigns
            SET name = ?2, template_name = ?3, start_date = ?4, end_date = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.template_name)
        .bind(req.start_date)
        .bind(req.end_date)
        .execute(&mut *tx)
        .await
        .db_context("Failed to update campaign")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("campaign", id));
        }

        let recipients = sync_recipients(&mut tx, id, &req.recipients).await?;
        tx.commit().await.db_context("Failed to commit campaign")?;

        log::info!("Campaña {} actualizada", id);
        Ok(Campaign {
            id,
            name: req.name,
            template_name: req.template_name,
            start_date: req.start_date,
            end_date: req.end_date,
            recipients,
        })
    }

    /// Borra la campaña; destinatarios, envíos e intentos caen en cascada
    pub async fn delete_campaign(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .db_context("Failed to delete campaign")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("campaign", id));
        }

        log::info!("Campaña {} eliminada", id);
        Ok(())
    }

    async fn list_recipients(&self, campaign_id: i64) -> Result<Vec<Recipient>> {
        sqlx::query_as::<_, Recipient>(
            r#"
            SELECT id, campaign_id, email, name
            FROM recipients
            WHERE campaign_id = ?1
            ORDER BY position
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.db_pool)
        .await
        .db_context("Failed to list recipients")
    }
}

async fn insert_recipients(
    tx: &mut Transaction<'_, Sqlite>,
    campaign_id: i64,
    recipients: &[RecipientRequest],
) -> Result<Vec<Recipient>> {
    let mut inserted = Vec::with_capacity(recipients.len());

    for (position, r) in recipients.iter().enumerate() {
        let result = sqlx::query(
            r#"
            INSERT INTO recipients (campaign_id, position, email, name)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(campaign_id)
        .bind(position as i64)
        .bind(r.email.trim())
        .bind(&r.name)
        .execute(&mut **tx)
        .await
        .db_context("Failed to insert recipient")?;

        inserted.push(Recipient {
            id: result.last_insert_rowid(),
            campaign_id,
            email: r.email.trim().to_string(),
            name: r.name.clone(),
        });
    }

    Ok(inserted)
}

/// Conserva las filas cuyo email sigue en la lista (actualizando nombre y
/// posición), inserta las nuevas y borra las que sobran sin envíos.
async fn sync_recipients(
    tx: &mut Transaction<'_, Sqlite>,
    campaign_id: i64,
    recipients: &[RecipientRequest],
) -> Result<Vec<Recipient>> {
    let mut existing: Vec<Option<Recipient>> = sqlx::query_as::<_, Recipient>(
        "SELECT id, campaign_id, email, name FROM recipients WHERE campaign_id = ?1",
    )
    .bind(campaign_id)
    .fetch_all(&mut **tx)
    .await
    .db_context("Failed to load current recipients")?
    .into_iter()
    .map(Some)
    .collect();

    let mut synced = Vec::with_capacity(recipients.len());

    for (position, r) in recipients.iter().enumerate() {
        let email = r.email.trim();
        let matched = existing
            .iter_mut()
            .find(|slot| {
                slot.as_ref()
                    .map_or(false, |e| e.email.eq_ignore_ascii_case(email))
            })
            .and_then(Option::take);

        let (recipient_id, stored_email) = match matched {
            Some(current) => {
                sqlx::query("UPDATE recipients SET position = ?2, name = ?3 WHERE id = ?1")
                    .bind(current.id)
                    .bind(position as i64)
                    .bind(&r.name)
                    .execute(&mut **tx)
                    .await
                    .db_context("Failed to update recipient")?;
                (current.id, current.email)
            }
            None => {
                let inserted = sqlx::query(
                    r#"
                    INSERT INTO recipients (campaign_id, position, email, name)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                )
                .bind(campaign_id)
                .bind(position as i64)
                .bind(email)
                .bind(&r.name)
                .execute(&mut **tx)
                .await
                .db_context("Failed to insert recipient")?;
                (inserted.last_insert_rowid(), email.to_string())
            }
        };

        synced.push(Recipient {
            id: recipient_id,
            campaign_id,
            email: stored_email,
            name: r.name.clone(),
        });
    }

    for removed in existing.into_iter().flatten() {
        let deliveries: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM delivery_records WHERE recipient_id = ?1")
                .bind(removed.id)
                .fetch_one(&mut **tx)
                .await
                .db_context("Failed to count recipient deliveries")?;
        if deliveries > 0 {
            return Err(AppError::validation(format!(
                "Recipient {} already received {} email(s) and cannot be removed.",
                removed.email, deliveries
            )));
        }

        sqlx::query("DELETE FROM recipients WHERE id = ?1")
            .bind(removed.id)
            .execute(&mut **tx)
            .await
            .db_context("Failed to delete recipient")?;
    }

    Ok(synced)
}

fn validate_campaign(req: &CampaignRequest) -> Result<()> {
    let name_len = req.name.trim().chars().count();
    if name_len == 0 || name_len > 100 {
        return Err(AppError::validation(
            "The Name field is required and cannot exceed 100 characters.",
        ));
    }
    let template_len = req.template_name.trim().chars().count();
    if template_len == 0 || template_len > 100 {
        return Err(AppError::validation(
            "The Template Name field is required and cannot exceed 100 characters.",
        ));
    }
    if req.start_date > req.end_date {
        return Err(AppError::validation(
            "The Start Date must not be after the End Date.",
        ));
    }
    for r in &req.recipients {
        r.email
            .trim()
            .parse::<Address>()
            .map_err(|_| AppError::validation(format!("Invalid recipient address: {}", r.email)))?;
        let len = r.name.trim().chars().count();
        if len == 0 || len > 100 {
            return Err(AppError::validation(format!(
                "Recipient name for {} is required and cannot exceed 100 characters.",
                r.email
            )));
        }
    }
    Ok(())
}
