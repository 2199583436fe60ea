//! services/export_service.rs
//! Representaciones del `CampaignReport` para descarga: HTML (entrada de
//! wkhtmltopdf) y hoja de cálculo CSV.

use csv::Writer;

use crate::errors::{AppError, Result};
use crate::models::report_model::CampaignReport;

pub const CSV_HEADERS: [&str; 4] = ["Date", "Emails Sent", "Emails Opened", "Links Clicked"];

/// Documento HTML autocontenido con los totales y la tabla diaria
pub fn report_to_html(report: &CampaignReport) -> String {
    let mut rows = String::new();
    for stat in &report.daily_stats {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            stat.date.format("%Y-%m-%d"),
            stat.emails_sent,
            stat.emails_opened,
            stat.links_clicked
        ));
    }
    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"4\">No activity recorded</td></tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Phishing Campaign Report</title>
<style>
body {{ font-family: Helvetica, Arial, sans-serif; font-size: 12pt; }}
h1 {{ text-align: center; font-size: 16pt; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #999; padding: 4px 8px; text-align: left; }}
</style>
</head>
<body>
<h1>Phishing Campaign Report</h1>
<p>Campaign: {campaign_id}</p>
<p>Total Emails Sent: {sent}</p>
<p>Total Emails Opened: {opened}</p>
<p>Total Links Clicked: {clicked}</p>
<table>
<tr><th>{h0}</th><th>{h1}</th><th>{h2}</th><th>{h3}</th></tr>
{rows}</table>
</body>
</html>
"#,
        campaign_id = report.campaign_id,
        sent = report.total_sent,
        opened = report.total_opened,
        clicked = report.total_clicked,
        h0 = CSV_HEADERS[0],
        h1 = CSV_HEADERS[1],
        h2 = CSV_HEADERS[2],
        h3 = CSV_HEADERS[3],
        rows = rows
    )
}

/// Una fila por día. Sin estadísticas diarias se devuelve sólo la cabecera.
pub fn report_to_csv(report: &CampaignReport) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| AppError::Export(format!("Failed to write CSV headers: {e}")))?;

    for stat in &report.daily_stats {
        writer
            .write_record([
                stat.date.format("%Y-%m-%d").to_string(),
                stat.emails_sent.to_string(),
                stat.emails_opened.to_string(),
                stat.links_clicked.to_string(),
            ])
            .map_err(|e| AppError::Export(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Export(format!("Failed to flush CSV writer: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report_model::DailyEmailStats;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn sample_report() -> CampaignReport {
        CampaignReport {
            campaign_id: 9,
            total_sent: 5,
            total_opened: 3,
            total_clicked: 1,
            attempts_by_user: BTreeMap::new(),
            daily_stats: vec![
                DailyEmailStats {
                    date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    emails_sent: 5,
                    emails_opened: 2,
                    links_clicked: 0,
                },
                DailyEmailStats {
                    date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                    emails_sent: 0,
                    emails_opened: 1,
                    links_clicked: 1,
                },
            ],
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_day() {
        let bytes = report_to_csv(&sample_report()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Date,Emails Sent,Emails Opened,Links Clicked",
                "2024-05-01,5,2,0",
                "2024-05-02,0,1,1",
            ]
        );
    }

    #[test]
    fn csv_for_empty_report_is_header_only() {
        let mut report = sample_report();
        report.daily_stats.clear();
        let text = String::from_utf8(report_to_csv(&report).unwrap()).unwrap();
        assert_eq!(text.trim_end(), "Date,Emails Sent,Emails Opened,Links Clicked");
    }

    #[test]
    fn html_contains_totals_and_days() {
        let html = report_to_html(&sample_report());
        assert!(html.contains("Total Emails Sent: 5"));
        assert!(html.contains("Total Emails Opened: 3"));
        assert!(html.contains("Total Links Clicked: 1"));
        assert!(html.contains("<td>2024-05-02</td><td>0</td><td>1</td><td>1</td>"));
    }
}
