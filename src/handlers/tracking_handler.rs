//! handlers/tracking_handler.rs
//! Endpoints que se incrustan en los correos: pixel de apertura y redirect de click.

use actix_web::{http::header, web, HttpResponse};

use crate::errors::{AppError, Result};
use crate::models::email_model::TrackingQuery;
use crate::services::{template_renderer, tracking_service::TrackingService};

/// GET /api/phishing/open?emailId=...
pub async fn track_open_endpoint(
    tracking_service: web::Data<TrackingService>,
    query: web::Query<TrackingQuery>,
) -> Result<HttpResponse> {
    let email_id = required(query.email_id.as_deref(), "Email ID")?;

    tracking_service
        .record_opened(email_id)
        .await
        .map_err(|e| {
            log::error!("Error tracking email open for emailId={}: {}", email_id, e);
            e
        })?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/phishing/click?emailId=...&target=...
pub async fn track_click_endpoint(
    tracking_service: web::Data<TrackingService>,
    query: web::Query<TrackingQuery>,
) -> Result<HttpResponse> {
    let email_id = required(query.email_id.as_deref(), "Email ID")?;
    let target = redirect_target(required(query.target.as_deref(), "Target URL")?)?;

    tracking_service
        .record_clicked(email_id)
        .await
        .map_err(|e| {
            log::error!("Error tracking email click for emailId={}: {}", email_id, e);
            e
        })?;

    log::info!("Redirigiendo emailId={} a {:?}", email_id, target);
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .finish())
}

/// El destino debe ser una URL http(s) absoluta que sirva como header `Location`
fn redirect_target(target: &str) -> Result<header::HeaderValue> {
    if !template_renderer::is_link_like(target) {
        log::warn!("Rejected click target {:?}: not an http(s) URL", target);
        return Err(AppError::validation(
            "Target URL must be an absolute http(s) URL.",
        ));
    }
    header::HeaderValue::from_str(target).map_err(|_| {
        log::warn!("Rejected click target {:?}: not a valid header value", target);
        AppError::validation("Target URL contains invalid characters.")
    })
}

fn required<'a>(value: Option<&'a str>, label: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            log::warn!("{} is null or empty.", label);
            Err(AppError::validation(format!(
                "{label} cannot be null or empty."
            )))
        }
    }
}

/// GET /api/phishing/status/{email_id}
pub async fn delivery_status_endpoint(
    tracking_service: web::Data<TrackingService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let record = tracking_service.get_record(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}
