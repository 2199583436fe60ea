//! config/pdf_config.rs
//! Valores por defecto con los que se imprimen los reportes de campaña en PDF.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfOrientation {
    Portrait,
    Landscape,
}

impl PdfOrientation {
    pub fn as_wkhtmltopdf_arg(&self) -> &'static str {
        match self {
            PdfOrientation::Portrait => "Portrait",
            PdfOrientation::Landscape => "Landscape",
        }
    }
}

/// Márgenes en milímetros
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PdfMargins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPdfConfig {
    pub orientation: PdfOrientation,
    pub page_size: String, // "A4", "Letter", ...
    pub margins: PdfMargins,
}

impl Default for ReportPdfConfig {
    fn default() -> Self {
        ReportPdfConfig {
            orientation: PdfOrientation::Portrait,
            page_size: "A4".to_string(),
            margins: PdfMargins {
                top: 10.0,
                bottom: 10.0,
                left: 10.0,
                right: 10.0,
            },
        }
    }
}
