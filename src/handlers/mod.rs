//! handlers/mod.rs
//! Handlers HTTP: extraen parámetros y delegan en los servicios.
pub mod campaign_handler;
pub mod email_handler;
pub mod report_handler;
pub mod template_handler;
pub mod tracking_handler;
pub mod user_handler;
