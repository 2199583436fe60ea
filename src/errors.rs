//! errors.rs
//! Taxonomía de errores del simulador y su traducción a respuestas HTTP.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Entrada mal formada (id vacío, target ausente, fechas invertidas...)
    #[error("validation error: {0}")]
    Validation(String),

    /// (entidad, clave)
    #[error("{0} not found with key {1}")]
    NotFound(String, String),

    /// Fallo de conexión, autenticación o envío SMTP
    #[error("transport error: {0}")]
    Transport(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    /// Fallo al calcular un reporte de campaña; nunca se devuelve un reporte parcial
    #[error("aggregation error: {0}")]
    Aggregation(String),

    #[error("export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &str, key: impl ToString) -> Self {
        AppError::NotFound(entity.to_string(), key.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

/// Equivalente a `anyhow::Context` para errores de sqlx
pub trait DbResultExt<T> {
    fn db_context(self, ctx: &str) -> Result<T>;
    fn aggregation_context(self, ctx: &str) -> Result<T>;
}

impl<T> DbResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn db_context(self, ctx: &str) -> Result<T> {
        self.map_err(|e| AppError::Persistence(format!("{ctx}: {e}")))
    }

    fn aggregation_context(self, ctx: &str) -> Result<T> {
        self.map_err(|e| AppError::Aggregation(format!("{ctx}: {e}")))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Persistence(_) | AppError::Aggregation(_) | AppError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_variant_to_its_status() {
        assert_eq!(
            AppError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("delivery record", "abc").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Transport("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Aggregation("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_entity_and_key() {
        let e = AppError::not_found("campaign", 7);
        assert_eq!(e.to_string(), "campaign not found with key 7");
    }
}
