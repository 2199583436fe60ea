//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod campaign_model;
pub mod delivery_model;
pub mod email_model;
pub mod report_model;
pub mod template_model;
pub mod user_model;
