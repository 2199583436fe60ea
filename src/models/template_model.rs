//! models/template_model.rs

use serde::{Deserialize, Serialize};

/// Palabras que marcan una plantilla como sospechosa
pub const SUSPICIOUS_WORDS: [&str; 8] = [
    "urgent",
    "sensitive",
    "password",
    "login",
    "verify",
    "bank",
    "account",
    "security",
];

/// Coincidencia por subcadena, sin distinguir mayúsculas
pub fn contains_suspicious_words(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SUSPICIOUS_WORDS.iter().any(|w| lowered.contains(w))
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmailTemplate {
    pub id: i64,
    pub name: String,
    pub subject: String,
    /// Puede contener tokens `{{placeholder}}`
    pub body: String,
    pub is_suspicious: bool,
}

/// Body de POST/PUT /api/templates. `is_suspicious` siempre se calcula en el servidor.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
}
