//! tests/mod.rs
//! Utilidades compartidas: pool SQLite en memoria con las migraciones reales y
//! un transporte que graba los correos en vez de enviarlos.

mod campaign_tests;
mod template_tests;

use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::errors::{AppError, Result};
use crate::models::{
    campaign_model::{CampaignRequest, RecipientRequest},
    email_model::RenderedEmail,
    template_model::{EmailTemplate, TemplateRequest},
};
use crate::services::{
    campaign_service::CampaignService,
    email_service::{EmailService, MailTransport},
    report_service::ReportService,
    template_service::TemplateService,
    tracking_service::TrackingService,
    user_service::UserService,
};

pub const BASE_URL: &str = "http://tracker.test";

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, RenderedEmail)>>,
    failing: HashSet<String>,
}

impl RecordingTransport {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<(String, RenderedEmail)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &RenderedEmail, recipient: &str) -> Result<()> {
        if self.failing.contains(recipient) {
            return Err(AppError::Transport(format!(
                "connection refused for {recipient}"
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.clone()));
        Ok(())
    }
}

pub struct TestContext {
    pub pool: Pool<Sqlite>,
    pub transport: Arc<RecordingTransport>,
    pub templates: TemplateService,
    pub campaigns: CampaignService,
    pub tracking: TrackingService,
    pub reports: ReportService,
    pub users: UserService,
    pub email: EmailService,
}

pub async fn test_pool() -> Pool<Sqlite> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid url")
        .foreign_keys(true);

    // Una sola conexión: cada conexión a :memory: es una base distinta
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    crate::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub async fn test_context() -> TestContext {
    test_context_with(RecordingTransport::default()).await
}

pub async fn test_context_with(transport: RecordingTransport) -> TestContext {
    let pool = test_pool().await;
    let transport = Arc::new(transport);

    let templates = TemplateService::new(pool.clone());
    let campaigns = CampaignService::new(pool.clone());
    let email = EmailService::new(
        pool.clone(),
        transport.clone(),
        BASE_URL.to_string(),
        campaigns.clone(),
        templates.clone(),
    );

    TestContext {
        tracking: TrackingService::new(pool.clone()),
        reports: ReportService::new(pool.clone()),
        users: UserService::new(pool.clone()),
        templates,
        campaigns,
        email,
        transport,
        pool,
    }
}

pub fn campaign_request(name: &str, template_name: &str, recipients: &[(&str, &str)]) -> CampaignRequest {
    let start = Utc::now();
    CampaignRequest {
        name: name.to_string(),
        template_name: template_name.to_string(),
        start_date: start,
        end_date: start + Duration::days(30),
        recipients: recipients
            .iter()
            .map(|(email, name)| RecipientRequest {
                email: email.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}

pub async fn seed_template(ctx: &TestContext, name: &str, body: &str) -> EmailTemplate {
    ctx.templates
        .create_template(TemplateRequest {
            name: name.to_string(),
            subject: "Novedades para {{name}}".to_string(),
            body: body.to_string(),
        })
        .await
        .expect("Failed to seed template")
}

pub fn placeholders(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub async fn count_delivery_records(pool: &Pool<Sqlite>) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM delivery_records")
        .fetch_one(pool)
        .await
        .expect("count failed")
}
