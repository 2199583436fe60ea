//! services/template_service.rs
//! CRUD de plantillas de correo. `is_suspicious` se recalcula en cada escritura.

use sqlx::{Pool, Sqlite};

use crate::errors::{AppError, DbResultExt, Result};
use crate::models::template_model::{contains_suspicious_words, EmailTemplate, TemplateRequest};

#[derive(Clone, Debug)]
pub struct TemplateService {
    db_pool: Pool<Sqlite>,
}

impl TemplateService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        TemplateService { db_pool }
    }

    pub async fn create_template(&self, req: TemplateRequest) -> Result<EmailTemplate> {
        validate_template(&req)?;
        let is_suspicious = contains_suspicious_words(&req.body);

        let result = sqlx::query(
            r#"
            INSERT INTO email_templates (name, subject, body, is_suspicious)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&req.name)
        .bind(&req.subject)
        .bind(&req.body)
        .bind(is_suspicious)
        .execute(&self.db_pool)
        .await
        .db_context("Failed to insert email template")?;

        log::info!(
            "Plantilla '{}' creada (sospechosa={})",
            req.name,
            is_suspicious
        );

        Ok(EmailTemplate {
            id: result.last_insert_rowid(),
            name: req.name,
            subject: req.subject,
            body: req.body,
            is_suspicious,
        })
    }

    pub async fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        sqlx::query_as::<_, EmailTemplate>(
            "SELECT id, name, subject, body, is_suspicious FROM email_templates ORDER BY id",
        )
        .fetch_all(&self.db_pool)
        .await
        .db_context("Failed to list email templates")
    }

    pub async fn get_template(&self, id: i64) -> Result<EmailTemplate> {
        sqlx::query_as::<_, EmailTemplate>(
            "SELECT id, name, subject, body, is_suspicious FROM email_templates WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .db_context("Failed to load email template")?
        .ok_or_else(|| AppError::not_found("email template", id))
    }

    /// Búsqueda sin distinguir mayúsculas; si hay duplicados gana la más antigua.
    pub async fn get_template_by_name(&self, name: &str) -> Result<EmailTemplate> {
        sqlx::query_as::<_, EmailTemplate>(
            r#"
            SELECT id, name, subject, body, is_suspicious
            FROM email_templates
            WHERE name = ?1 COLLATE NOCASE
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db_pool)
        .await
        .db_context("Failed to load email template by name")?
        .ok_or_else(|| AppError::not_found("email template", name))
    }

    pub async fn update_template(&self, id: i64, req: TemplateRequest) -> Result<EmailTemplate> {
        validate_template(&req)?;
        let is_suspicious = contains_suspicious_words(&req.body);

        let result = sqlx::query(
            r#"
            UPDATE email_templates
            SET name = ?2, subject = ?3, body = ?4, is_suspicious = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.subject)
        .bind(&req.body)
        .bind(is_suspicious)
        .execute(&self.db_pool)
        .await
        .db_context("Failed to update email template")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("email template", id));
        }

        log::info!("Plantilla {} actualizada", id);
        Ok(EmailTemplate {
            id,
            name: req.name,
            subject: req.subject,
            body: req.body,
            is_suspicious,
        })
    }

    pub async fn delete_template(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = ?1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .db_context("Failed to delete email template")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("email template", id));
        }

        log::info!("Plantilla {} eliminada", id);
        Ok(())
    }
}

fn validate_template(req: &TemplateRequest) -> Result<()> {
    let name_len = req.name.trim().chars().count();
    if name_len == 0 || name_len > 100 {
        return Err(AppError::validation(
            "The Name field is required and cannot exceed 100 characters.",
        ));
    }
    let subject_len = req.subject.trim().chars().count();
    if subject_len == 0 || subject_len > 200 {
        return Err(AppError::validation(
            "The Subject field is required and cannot exceed 200 characters.",
        ));
    }
    if req.body.trim().is_empty() {
        return Err(AppError::validation("The Body field is required."));
    }
    Ok(())
}
