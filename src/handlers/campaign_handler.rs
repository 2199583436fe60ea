use actix_web::{web, HttpResponse};

use crate::errors::Result;
use crate::models::campaign_model::CampaignRequest;
use crate::services::campaign_service::CampaignService;

/// POST /api/campaigns
pub async fn create_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    body: web::Json<CampaignRequest>,
) -> Result<HttpResponse> {
    let campaign = campaign_service.create_campaign(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(campaign))
}

/// GET /api/campaigns
pub async fn list_campaigns_endpoint(
    campaign_service: web::Data<CampaignService>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(campaign_service.list_campaigns().await?))
}

/// GET /api/campaigns/{id}
pub async fn get_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let campaign = campaign_service.get_campaign(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(campaign))
}

/// PUT /api/campaigns/{id}
pub async fn update_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<i64>,
    body: web::Json<CampaignRequest>,
) -> Result<HttpResponse> {
    let campaign = campaign_service
        .update_campaign(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(campaign))
}

/// DELETE /api/campaigns/{id}
pub async fn delete_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    campaign_service.delete_campaign(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
