//! services/user_service.rs
//! Usuarios del simulador y registro de intentos de phishing por campaña.

use chrono::Utc;
use lettre::Address;
use sqlx::{Pool, Sqlite};

use crate::errors::{AppError, DbResultExt, Result};
use crate::models::user_model::{LogAttemptRequest, PhishingTest, User, UserRequest};

#[derive(Clone, Debug)]
pub struct UserService {
    db_pool: Pool<Sqlite>,
}

impl UserService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        UserService { db_pool }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT id, email, name, is_phished FROM users ORDER BY id")
            .fetch_all(&self.db_pool)
            .await
            .db_context("Failed to list users")
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT id, email, name, is_phished FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await
            .db_context("Failed to load user")?
            .ok_or_else(|| AppError::not_found("user", id))
    }

    pub async fn create_user(&self, req: UserRequest) -> Result<User> {
        validate_user(&req)?;

        let result =
            sqlx::query("INSERT INTO users (email, name, is_phished) VALUES (?1, ?2, ?3)")
                .bind(req.email.trim())
                .bind(&req.name)
                .bind(req.is_phished)
                .execute(&self.db_pool)
                .await
                .db_context("Failed to insert user")?;

        let id = result.last_insert_rowid();
        log::info!("Usuario {} creado ({})", id, req.email);
        Ok(User {
            id,
            email: req.email.trim().to_string(),
            name: req.name,
            is_phished: req.is_phished,
        })
    }

    pub async fn update_user(&self, id: i64, req: UserRequest) -> Result<User> {
        validate_user(&req)?;

        let result = sqlx::query(
            "UPDATE users SET email = ?2, name = ?3, is_phished = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(req.email.trim())
        .bind(&req.name)
        .bind(req.is_phished)
        .execute(&self.db_pool)
        .await
        .db_context("Failed to update user")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user", id));
        }

        log::info!("Usuario {} actualizado", id);
        Ok(User {
            id,
            email: req.email.trim().to_string(),
            name: req.name,
            is_phished: req.is_phished,
        })
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .db_context("Failed to delete user")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user", id));
        }

        log::info!("Usuario {} eliminado", id);
        Ok(())
    }

    /// Guarda el intento y, si el usuario cayó, marca `is_phished` en el usuario
    pub async fn log_attempt(&self, req: LogAttemptRequest) -> Result<PhishingTest> {
        let mut tx = self
            .db_pool
            .begin()
            .await
            .db_context("Failed to open transaction")?;

        let user_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?1")
            .bind(req.user_id)
            .fetch_one(&mut *tx)
            .await
            .db_context("Failed to look up user")?;
        if user_exists == 0 {
            return Err(AppError::not_found("user", req.user_id));
        }

        let campaign_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM campaigns WHERE id = ?1")
                .bind(req.campaign_id)
                .fetch_one(&mut *tx)
                .await
                .db_context("Failed to look up campaign")?;
        if campaign_exists == 0 {
            return Err(AppError::not_found("campaign", req.campaign_id));
        }

        let phished_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO phishing_tests (campaign_id, user_id, is_phished, phished_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(req.campaign_id)
        .bind(req.user_id)
        .bind(req.is_phished)
        .bind(phished_at)
        .execute(&mut *tx)
        .await
        .db_context("Failed to insert phishing attempt")?;

        if req.is_phished {
            sqlx::query("UPDATE users SET is_phished = 1 WHERE id = ?1")
                .bind(req.user_id)
                .execute(&mut *tx)
                .await
                .db_context("Failed to flag user as phished")?;
        }

        tx.commit().await.db_context("Failed to commit phishing attempt")?;

        log::info!(
            "Intento de phishing registrado para usuario {} en campaña {}",
            req.user_id,
            req.campaign_id
        );
        Ok(PhishingTest {
            id: result.last_insert_rowid(),
            campaign_id: req.campaign_id,
            user_id: req.user_id,
            is_phished: req.is_phished,
            phished_at,
        })
    }

    pub async fn list_attempts(&self, campaign_id: i64) -> Result<Vec<PhishingTest>> {
        sqlx::query_as::<_, PhishingTest>(
            r#"
            SELECT id, campaign_id, user_id, is_phished, phished_at
            FROM phishing_tests
            WHERE campaign_id = ?1
            ORDER BY id
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.db_pool)
        .await
        .db_context("Failed to list phishing attempts")
    }
}

fn validate_user(req: &UserRequest) -> Result<()> {
    req.email
        .trim()
        .parse::<Address>()
        .map_err(|_| AppError::validation("Formato de correo electrónico inválido."))?;
    let len = req.name.trim().chars().count();
    if len == 0 || len > 100 {
        return Err(AppError::validation(
            "El nombre es obligatorio y no puede exceder los 100 caracteres.",
        ));
    }
    Ok(())
}
