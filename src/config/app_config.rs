//! config/app_config.rs
//! Configuración del proceso leída desde variables de entorno (.env incluido).

use std::{env, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Result};

use crate::config::pdf_config::ReportPdfConfig;

/// Modo de cifrado de la conexión SMTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpEncryption {
    None,
    StartTls,
    Tls,
}

impl FromStr for SmtpEncryption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "plain" => Ok(SmtpEncryption::None),
            "starttls" => Ok(SmtpEncryption::StartTls),
            "tls" | "ssl" => Ok(SmtpEncryption::Tls),
            other => Err(anyhow!("SMTP_ENCRYPTION desconocido: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub encryption: SmtpEncryption,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    /// Base pública de los endpoints de tracking que se incrustan en los correos
    pub tracking_base_url: String,
    pub smtp: SmtpConfig,
    pub report_pdf: ReportPdfConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let smtp_username = required("SMTP_USERNAME")?;
        let smtp = SmtpConfig {
            host: required("SMTP_HOST")?,
            port: parsed_or("SMTP_PORT", 587)?,
            password: required("SMTP_PASSWORD")?,
            from: env::var("SMTP_FROM").unwrap_or_else(|_| smtp_username.clone()),
            username: smtp_username,
            encryption: env::var("SMTP_ENCRYPTION")
                .unwrap_or_else(|_| "starttls".to_string())
                .parse()?,
            timeout: Duration::from_secs(parsed_or("SMTP_TIMEOUT_SECS", 30)?),
        };

        let tracking_base_url = env::var("TRACKING_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5022".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(AppConfig {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/phish_sim.db".to_string()),
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed_or("PORT", 5022)?,
            tracking_base_url,
            smtp,
            report_pdf: ReportPdfConfig::default(),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("Falta la variable de entorno {key}"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Valor inválido para {key}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encryption_modes() {
        assert_eq!(
            "STARTTLS".parse::<SmtpEncryption>().unwrap(),
            SmtpEncryption::StartTls
        );
        assert_eq!("ssl".parse::<SmtpEncryption>().unwrap(), SmtpEncryption::Tls);
        assert_eq!("none".parse::<SmtpEncryption>().unwrap(), SmtpEncryption::None);
        assert!("carrier-pigeon".parse::<SmtpEncryption>().is_err());
    }
}
