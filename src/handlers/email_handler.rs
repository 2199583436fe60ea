use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    errors::Result,
    models::email_model::{SendCampaignRequest, SendEmailRequest},
    services::email_service::EmailService,
};

/// POST /api/email/send
pub async fn send_email_endpoint(
    email_service: web::Data<EmailService>,
    body: web::Json<SendEmailRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    let campaign_id = req.campaign_id;

    let record = email_service.send_email(req).await.map_err(|e| {
        log::error!("Email send error (campaign {}): {}", campaign_id, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "tracking_id": record.id,
        "message": "Email sent"
    })))
}

/// POST /api/campaigns/{id}/send
pub async fn send_campaign_endpoint(
    email_service: web::Data<EmailService>,
    path: web::Path<i64>,
    body: Option<web::Json<SendCampaignRequest>>,
) -> Result<HttpResponse> {
    let campaign_id = path.into_inner();
    let req = body.map(|b| b.into_inner()).unwrap_or_default();

    let summary = email_service
        .send_campaign(campaign_id, &req.placeholders)
        .await
        .map_err(|e| {
            log::error!("Campaign {} dispatch error: {}", campaign_id, e);
            e
        })?;

    Ok(HttpResponse::Ok().json(summary))
}
