//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod campaign_service;
pub mod email_service;
pub mod export_service;
pub mod pdf_service;
pub mod report_service;
pub mod template_renderer;
pub mod template_service;
pub mod tracking_service;
pub mod user_service;
