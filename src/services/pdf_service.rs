//! services/pdf_service.rs
//! Impresión de reportes de campaña a PDF con wkhtmltopdf.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context};
use tokio::{
    process::Command,
    sync::{Semaphore, SemaphorePermit},
    time::timeout,
};
use uuid::Uuid;

use crate::config::pdf_config::ReportPdfConfig;
use crate::errors::{AppError, Result};
use crate::models::report_model::CampaignReport;
use crate::services::export_service::report_to_html;

/// Cantidad máxima de wkhtmltopdf simultáneos
const MAX_CONCURRENT_PROCESSES: usize = 4;
/// Tiempo máximo para generar un PDF
const PDF_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);
const TEMP_DIR_PREFIX: &str = "phish_sim_reports";

#[derive(Clone)]
pub struct PdfService {
    semaphore: Arc<Semaphore>,
    temp_dir: Arc<PathBuf>,
    /// `None` si wkhtmltopdf no está en el PATH; el servicio arranca igual
    wkhtmltopdf_path: Option<Arc<PathBuf>>,
    config: ReportPdfConfig,
}

impl PdfService {
    pub fn new(config: ReportPdfConfig) -> anyhow::Result<Self> {
        let temp_dir =
            std::env::temp_dir().join(format!("{}_{}", TEMP_DIR_PREFIX, Uuid::new_v4()));
        fs::create_dir_all(&temp_dir)
            .with_context(|| format!("No se pudo crear {:?}", temp_dir))?;

        let wkhtmltopdf_path = match which::which("wkhtmltopdf") {
            Ok(path) => Some(Arc::new(path)),
            Err(_) => {
                log::warn!("No se encontró wkhtmltopdf en el sistema; la exportación PDF fallará");
                None
            }
        };

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_PROCESSES)),
            temp_dir: Arc::new(temp_dir),
            wkhtmltopdf_path,
            config,
        })
    }

    pub async fn render_report(&self, report: &CampaignReport) -> Result<Vec<u8>> {
        self.generate_pdf(&report_to_html(report), report.campaign_id)
            .await
            .map_err(|e| AppError::Export(format!("{e:#}")))
    }

    async fn generate_pdf(&self, html: &str, campaign_id: i64) -> anyhow::Result<Vec<u8>> {
        let start = Instant::now();
        let binary = self
            .wkhtmltopdf_path
            .clone()
            .ok_or_else(|| anyhow!("wkhtmltopdf no está disponible"))?;

        let _guard = self.acquire_permit().await?;

        let temp_files = self.create_temp_files(campaign_id);
        let _cleanup = TempCleanup::new(temp_files.clone());

        fs::write(&temp_files.html_path, html).with_context(|| {
            format!(
                "Error escribiendo HTML temporal en {:?}",
                temp_files.html_path
            )
        })?;

        let pdf_data = self.run_wkhtmltopdf(&binary, &temp_files).await?;

        log::info!(
            "PDF de campaña {} generado en {:.2}s ({} bytes)",
            campaign_id,
            start.elapsed().as_secs_f32(),
            pdf_data.len()
        );
        Ok(pdf_data)
    }

    async fn acquire_permit(&self) -> anyhow::Result<SemaphorePermit<'_>> {
        timeout(Duration::from_secs(5), self.semaphore.acquire())
            .await
            .context("Timeout esperando permiso en PdfService")?
            .map_err(|_| anyhow!("No se pudo adquirir el semaphore"))
    }

    fn create_temp_files(&self, campaign_id: i64) -> TempFiles {
        let id = Uuid::new_v4().to_string();
        TempFiles {
            html_path: self
                .temp_dir
                .join(format!("report_{}_{}.html", campaign_id, id)),
            pdf_path: self
                .temp_dir
                .join(format!("report_{}_{}.pdf", campaign_id, id)),
        }
    }

    async fn run_wkhtmltopdf(&self, binary: &Path, paths: &TempFiles) -> anyhow::Result<Vec<u8>> {
        let mut cmd = Command::new(binary);
        let cfg = &self.config;

        cmd.arg("--orientation")
            .arg(cfg.orientation.as_wkhtmltopdf_arg());
        cmd.arg("--page-size").arg(&cfg.page_size);
        cmd.arg("--margin-top").arg(format!("{}mm", cfg.margins.top));
        cmd.arg("--margin-bottom")
            .arg(format!("{}mm", cfg.margins.bottom));
        cmd.arg("--margin-left").arg(format!("{}mm", cfg.margins.left));
        cmd.arg("--margin-right")
            .arg(format!("{}mm", cfg.margins.right));
        cmd.arg("--quiet");

        cmd.arg(&paths.html_path);
        cmd.arg(&paths.pdf_path);

        cmd.stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let output = timeout(PDF_GENERATION_TIMEOUT, cmd.output())
            .await
            .context("Timeout ejecutando wkhtmltopdf")?
            .context("No se pudo lanzar wkhtmltopdf")?;

        if !output.status.success() {
            let stderr_msg = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("wkhtmltopdf falló: {}", stderr_msg));
        }

        fs::read(&paths.pdf_path)
            .with_context(|| format!("Error leyendo PDF final en {:?}", paths.pdf_path))
    }
}

#[derive(Clone)]
struct TempFiles {
    html_path: PathBuf,
    pdf_path: PathBuf,
}

struct TempCleanup {
    files: TempFiles,
}

impl TempCleanup {
    fn new(files: TempFiles) -> Self {
        Self { files }
    }
}

/// Borra los archivos temporales al salir de scope
impl Drop for TempCleanup {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.files.html_path);
        let _ = fs::remove_file(&self.files.pdf_path);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn service_without_binary() -> PdfService {
        PdfService {
            semaphore: Arc::new(Semaphore::new(1)),
            temp_dir: Arc::new(std::env::temp_dir()),
            wkhtmltopdf_path: None,
            config: ReportPdfConfig::default(),
        }
    }

    #[actix_rt::test]
    async fn missing_wkhtmltopdf_is_an_export_error() {
        let report = CampaignReport {
            campaign_id: 3,
            total_sent: 0,
            total_opened: 0,
            total_clicked: 0,
            attempts_by_user: BTreeMap::new(),
            daily_stats: Vec::new(),
        };

        let err = service_without_binary()
            .render_report(&report)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Export(ref m) if m.contains("wkhtmltopdf")), "got {err:?}");
    }

    #[test]
    fn temp_files_are_removed_on_drop() {
        let service = service_without_binary();
        let files = service.create_temp_files(9);
        fs::write(&files.html_path, "<p>x</p>").unwrap();
        fs::write(&files.pdf_path, b"%PDF").unwrap();

        drop(TempCleanup::new(files.clone()));

        assert!(!files.html_path.exists());
        assert!(!files.pdf_path.exists());
    }
}
