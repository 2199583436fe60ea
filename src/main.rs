use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use crate::config::app_config::AppConfig;
use crate::logger::init_logger;
use crate::services::campaign_service::CampaignService;
use crate::services::email_service::{EmailService, MailTransport, SmtpMailTransport};
use crate::services::pdf_service::PdfService;
use crate::services::report_service::ReportService;
use crate::services::template_service::TemplateService;
use crate::services::tracking_service::TrackingService;
use crate::services::user_service::UserService;

mod app;
mod config;
mod db;
mod errors;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env().expect("Configuración inválida");

    let db_pool = db::setup_database(&config.database_url)
        .await
        .expect("No se pudo inicializar la base de datos");
    if let Err(e) = db::run_migrations(&db_pool).await {
        panic!("Fallo en migraciones: {:?}", e);
    }

    let transport: Arc<dyn MailTransport> =
        Arc::new(SmtpMailTransport::new(&config.smtp).expect("Configuración SMTP inválida"));

    let template_service = TemplateService::new(db_pool.clone());
    let campaign_service = CampaignService::new(db_pool.clone());
    let tracking_service = TrackingService::new(db_pool.clone());
    let report_service = ReportService::new(db_pool.clone());
    let user_service = UserService::new(db_pool.clone());
    let email_service = EmailService::new(
        db_pool.clone(),
        transport,
        config.tracking_base_url.clone(),
        campaign_service.clone(),
        template_service.clone(),
    );
    let pdf_service =
        PdfService::new(config.report_pdf.clone()).expect("No se pudo inicializar PdfService");

    let bind = (config.bind_address.clone(), config.port);
    log::info!("Levantando servidor en {}:{}", bind.0, bind.1);
    log::info!("Tracking público en {}", config.tracking_base_url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(template_service.clone()))
            .app_data(web::Data::new(campaign_service.clone()))
            .app_data(web::Data::new(tracking_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(email_service.clone()))
            .app_data(web::Data::new(pdf_service.clone()))
            .configure(app::init_app)
    })
    .bind(bind)?
    .run()
    .await
}
