use actix_web::{web, HttpResponse};

use crate::errors::Result;
use crate::models::template_model::TemplateRequest;
use crate::services::template_service::TemplateService;

/// GET /api/templates
pub async fn list_templates_endpoint(
    template_service: web::Data<TemplateService>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(template_service.list_templates().await?))
}

/// GET /api/templates/{id}
pub async fn get_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let template = template_service.get_template(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(template))
}

/// POST /api/templates
pub async fn create_template_endpoint(
    template_service: web::Data<TemplateService>,
    body: web::Json<TemplateRequest>,
) -> Result<HttpResponse> {
    let template = template_service.create_template(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(template))
}

/// PUT /api/templates/{id}
pub async fn update_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<i64>,
    body: web::Json<TemplateRequest>,
) -> Result<HttpResponse> {
    let template = template_service
        .update_template(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(template))
}

/// DELETE /api/templates/{id}
pub async fn delete_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    template_service.delete_template(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
