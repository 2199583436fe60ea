//! handlers/report_handler.rs
//! Reporte de campaña en JSON, PDF y hoja de cálculo.

use actix_web::{web, HttpResponse};

use crate::errors::Result;
use crate::services::{
    export_service::report_to_csv, pdf_service::PdfService, report_service::ReportService,
};

/// GET /api/reporting/campaign/{id}/report
pub async fn campaign_report_endpoint(
    report_service: web::Data<ReportService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let campaign_id = path.into_inner();
    let report = report_service
        .generate_report(campaign_id)
        .await
        .map_err(|e| {
            log::error!("Error generating report for campaign {}: {}", campaign_id, e);
            e
        })?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/reporting/campaign/{id}/report/pdf
pub async fn campaign_report_pdf_endpoint(
    report_service: web::Data<ReportService>,
    pdf_service: web::Data<PdfService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let campaign_id = path.into_inner();
    let report = report_service.generate_report(campaign_id).await?;
    let pdf_bytes = pdf_service.render_report(&report).await.map_err(|e| {
        log::error!("Error generando PDF de campaña {}: {}", campaign_id, e);
        e
    })?;

    Ok(HttpResponse::Ok()
        .append_header(("Content-Type", "application/pdf"))
        .append_header(("Content-Disposition", "attachment; filename=\"report.pdf\""))
        .body(pdf_bytes))
}

/// GET /api/reporting/campaign/{id}/report/excel
pub async fn campaign_report_excel_endpoint(
    report_service: web::Data<ReportService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let campaign_id = path.into_inner();
    let report = report_service.generate_report(campaign_id).await?;
    let csv_bytes = report_to_csv(&report)?;

    Ok(HttpResponse::Ok()
        .append_header(("Content-Type", "text/csv; charset=utf-8"))
        .append_header(("Content-Disposition", "attachment; filename=\"report.csv\""))
        .body(csv_bytes))
}
