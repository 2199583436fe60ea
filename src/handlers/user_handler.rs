use actix_web::{web, HttpResponse};

use crate::errors::Result;
use crate::models::user_model::{LogAttemptRequest, UserRequest};
use crate::services::user_service::UserService;

/// GET /api/users
pub async fn list_users_endpoint(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_service.list_users().await?))
}

/// GET /api/users/{id}
pub async fn get_user_endpoint(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_service.get_user(path.into_inner()).await?))
}

/// POST /api/users
pub async fn create_user_endpoint(
    user_service: web::Data<UserService>,
    body: web::Json<UserRequest>,
) -> Result<HttpResponse> {
    let user = user_service.create_user(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// PUT /api/users/{id}
pub async fn update_user_endpoint(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
    body: web::Json<UserRequest>,
) -> Result<HttpResponse> {
    let user = user_service
        .update_user(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/users/{id}
pub async fn delete_user_endpoint(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    user_service.delete_user(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/phishing/attempts
pub async fn log_attempt_endpoint(
    user_service: web::Data<UserService>,
    body: web::Json<LogAttemptRequest>,
) -> Result<HttpResponse> {
    let attempt = user_service.log_attempt(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(attempt))
}

/// GET /api/phishing/attempts/{campaign_id}
pub async fn list_attempts_endpoint(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_service.list_attempts(path.into_inner()).await?))
}
