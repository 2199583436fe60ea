//! services/email_service.rs
//! Envío de correos con tracking: renderiza, entrega al transporte y, sólo si
//! el transporte aceptó el mensaje, crea el `DeliveryRecord`.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use sqlx::{Pool, Sqlite};

use crate::{
    config::app_config::{SmtpConfig, SmtpEncryption},
    errors::{AppError, DbResultExt, Result},
    models::{
        campaign_model::Recipient,
        delivery_model::DeliveryRecord,
        email_model::{
            DispatchSummary, DispatchedEmail, FailedDispatch, RenderedEmail, SendEmailRequest,
        },
        template_model::EmailTemplate,
    },
    services::{
        campaign_service::CampaignService, template_renderer, template_service::TemplateService,
        tracking_service::new_tracking_id,
    },
};

/// Transporte de salida. Un error significa que no se debe asumir entrega.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &RenderedEmail, recipient: &str) -> Result<()>;
}

pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpMailTransport {
    pub fn new(cfg: &SmtpConfig) -> Result<Self> {
        let builder = match cfg.encryption {
            SmtpEncryption::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
            }
            SmtpEncryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
                    .map_err(|e| AppError::Transport(format!("Invalid SMTP relay: {e}")))?
            }
            SmtpEncryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
                .map_err(|e| AppError::Transport(format!("Invalid SMTP relay: {e}")))?,
        };

        let mailer = builder
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .timeout(Some(cfg.timeout))
            .build();

        let from: Mailbox = cfg
            .from
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid from address: {e}")))?;

        Ok(Self {
            mailer,
            from,
            timeout: cfg.timeout,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &RenderedEmail, recipient: &str) -> Result<()> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid recipient address: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .multipart(MultiPart::alternative().singlepart(SinglePart::html(message.body.clone())))
            .map_err(|e| AppError::Transport(format!("Failed to build message: {e}")))?;

        tokio::time::timeout(self.timeout, self.mailer.send(email))
            .await
            .map_err(|_| AppError::Transport(format!("SMTP send to {recipient} timed out")))?
            .map_err(|e| AppError::Transport(format!("SMTP error: {e}")))?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct EmailService {
    db_pool: Pool<Sqlite>,
    transport: Arc<dyn MailTransport>,
    tracking_base_url: String,
    campaign_service: CampaignService,
    template_service: TemplateService,
}

impl EmailService {
    pub fn new(
        db_pool: Pool<Sqlite>,
        transport: Arc<dyn MailTransport>,
        tracking_base_url: String,
        campaign_service: CampaignService,
        template_service: TemplateService,
    ) -> Self {
        Self {
            db_pool,
            transport,
            tracking_base_url,
            campaign_service,
            template_service,
        }
    }

    /// Envía un correo con tracking a un destinatario y crea exactamente un
    /// `DeliveryRecord` (ambas banderas en false).
    pub async fn send_tracked(
        &self,
        recipient: &Recipient,
        template: &EmailTemplate,
        placeholders: &HashMap<String, String>,
    ) -> Result<DeliveryRecord> {
        // Validar antes de cualquier efecto
        recipient
            .email
            .parse::<Address>()
            .map_err(|_| AppError::validation(format!("Invalid recipient address: {}", recipient.email)))?;

        let tracking_id = new_tracking_id();
        let rendered =
            template_renderer::render(template, placeholders, &tracking_id, &self.tracking_base_url);

        if let Err(e) = self.transport.send(&rendered, &recipient.email).await {
            log::error!(
                "Fallo de transporte campaign={} recipient={} emailId={}: {}",
                recipient.campaign_id,
                recipient.email,
                tracking_id,
                e
            );
            return Err(e);
        }

        // El correo ya salió: si falla el registro hay que dejar rastro del emailId
        let record = self
            .insert_delivery_record(&tracking_id, recipient.campaign_id, recipient.id)
            .await
            .map_err(|e| {
                log::error!(
                    "Correo enviado sin DeliveryRecord campaign={} recipient={} emailId={}: {}",
                    recipient.campaign_id,
                    recipient.email,
                    tracking_id,
                    e
                );
                e
            })?;

        log::info!(
            "Email con plantilla '{}' enviado a {} (emailId={})",
            template.name,
            recipient.email,
            tracking_id
        );
        Ok(record)
    }

    /// Envío individual a un destinatario ya registrado en la campaña
    pub async fn send_email(&self, req: SendEmailRequest) -> Result<DeliveryRecord> {
        let campaign = self.campaign_service.get_campaign(req.campaign_id).await?;
        let recipient = campaign
            .recipients
            .iter()
            .find(|r| r.email.eq_ignore_ascii_case(req.recipient_email.trim()))
            .ok_or_else(|| AppError::not_found("recipient", &req.recipient_email))?;
        let template = self
            .template_service
            .get_template_by_name(&campaign.template_name)
            .await?;

        let placeholders = personalize(&req.placeholders, recipient);
        self.send_tracked(recipient, &template, &placeholders).await
    }

    /// Envía la plantilla de la campaña a todos sus destinatarios, en orden.
    /// Un fallo con un destinatario no detiene a los demás.
    pub async fn send_campaign(
        &self,
        campaign_id: i64,
        placeholders: &HashMap<String, String>,
    ) -> Result<DispatchSummary> {
        let campaign = self.campaign_service.get_campaign(campaign_id).await?;
        if campaign.recipients.is_empty() {
            return Err(AppError::validation(format!(
                "Campaign {campaign_id} has no recipients"
            )));
        }
        let template = self
            .template_service
            .get_template_by_name(&campaign.template_name)
            .await?;

        let mut summary = DispatchSummary {
            campaign_id,
            sent: Vec::new(),
            failed: Vec::new(),
        };

        for recipient in &campaign.recipients {
            let personalized = personalize(placeholders, recipient);
            match self.send_tracked(recipient, &template, &personalized).await {
                Ok(record) => summary.sent.push(DispatchedEmail {
                    recipient: recipient.email.clone(),
                    tracking_id: record.id,
                }),
                Err(e) => summary.failed.push(FailedDispatch {
                    recipient: recipient.email.clone(),
                    error: e.to_string(),
                }),
            }
        }

        log::info!(
            "Campaña {} despachada: {} enviados, {} fallidos",
            campaign_id,
            summary.sent.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn insert_delivery_record(
        &self,
        tracking_id: &str,
        campaign_id: i64,
        recipient_id: i64,
    ) -> Result<DeliveryRecord> {
        let sent_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO delivery_records (
                id, campaign_id, recipient_id, sent_at, opened, clicked
            )
            VALUES (?1, ?2, ?3, ?4, 0, 0)
            "#,
        )
        .bind(tracking_id)
        .bind(campaign_id)
        .bind(recipient_id)
        .bind(sent_at)
        .execute(&self.db_pool)
        .await
        .db_context("Failed to insert delivery record")?;

        Ok(DeliveryRecord {
            id: tracking_id.to_string(),
            campaign_id,
            recipient_id,
            sent_at,
            opened: false,
            clicked: false,
            opened_at: None,
            clicked_at: None,
        })
    }
}

/// `name` y `email` toman los datos del destinatario salvo que el llamador los fije
fn personalize(placeholders: &HashMap<String, String>, recipient: &Recipient) -> HashMap<String, String> {
    let mut out = placeholders.clone();
    out.entry("name".to_string())
        .or_insert_with(|| recipient.name.clone());
    out.entry("email".to_string())
        .or_insert_with(|| recipient.email.clone());
    out
}
