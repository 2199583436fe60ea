//! services/report_service.rs
//! Agregación de los `DeliveryRecord` e intentos de una campaña en un
//! `CampaignReport`. Los días se agrupan por fecha calendario UTC.

use std::collections::BTreeMap;

use sqlx::{Pool, Row, Sqlite};

use crate::errors::{AppError, DbResultExt, Result};
use crate::models::{
    delivery_model::DeliveryRecord,
    report_model::{CampaignReport, DailyEmailStats},
};

#[derive(Clone, Debug)]
pub struct ReportService {
    db_pool: Pool<Sqlite>,
}

impl ReportService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        ReportService { db_pool }
    }

    /// Cualquier fallo de lectura aborta el reporte completo.
    pub async fn generate_report(&self, campaign_id: i64) -> Result<CampaignReport> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaigns WHERE id = ?1")
            .bind(campaign_id)
            .fetch_one(&self.db_pool)
            .await
            .aggregation_context("Failed to look up campaign")?;
        if exists == 0 {
            return Err(AppError::not_found("campaign", campaign_id));
        }

        let records = sqlx::query_as::<_, DeliveryRecord>(
            r#"
            SELECT id, campaign_id, recipient_id, sent_at,
                   opened, clicked, opened_at, clicked_at
            FROM delivery_records
            WHERE campaign_id = ?1
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.db_pool)
        .await
        .aggregation_context("Failed to load delivery records")?;

        let attempt_rows = sqlx::query(
            r#"
            SELECT user_id, COUNT(*) AS attempts
            FROM phishing_tests
            WHERE campaign_id = ?1
            GROUP BY user_id
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.db_pool)
        .await
        .aggregation_context("Failed to count phishing attempts")?;

        let mut attempts_by_user = BTreeMap::new();
        for row in attempt_rows {
            let user_id: i64 = row
                .try_get("user_id")
                .aggregation_context("Malformed attempt row")?;
            let attempts: i64 = row
                .try_get("attempts")
                .aggregation_context("Malformed attempt row")?;
            attempts_by_user.insert(user_id.to_string(), attempts);
        }

        let report = build_report(campaign_id, &records, attempts_by_user);
        log::info!(
            "Reporte de campaña {}: enviados={} abiertos={} clicks={}",
            campaign_id,
            report.total_sent,
            report.total_opened,
            report.total_clicked
        );
        Ok(report)
    }
}

pub fn build_report(
    campaign_id: i64,
    records: &[DeliveryRecord],
    attempts_by_user: BTreeMap<String, i64>,
) -> CampaignReport {
    CampaignReport {
        campaign_id,
        total_sent: records.len() as i64,
        total_opened: records.iter().filter(|r| r.opened).count() as i64,
        total_clicked: records.iter().filter(|r| r.clicked).count() as i64,
        attempts_by_user,
        daily_stats: daily_stats(records),
    }
}

/// Envíos por `sent_at`, aperturas por `opened_at` y clicks por `clicked_at`,
/// cada uno en su propio día UTC.
pub fn daily_stats(records: &[DeliveryRecord]) -> Vec<DailyEmailStats> {
    let mut days: BTreeMap<chrono::NaiveDate, DailyEmailStats> = BTreeMap::new();

    for r in records {
        let day = r.sent_at.date_naive();
        days.entry(day)
            .or_insert_with(|| DailyEmailStats::empty(day))
            .emails_sent += 1;

        if let (true, Some(at)) = (r.opened, r.opened_at) {
            let day = at.date_naive();
            days.entry(day)
                .or_insert_with(|| DailyEmailStats::empty(day))
                .emails_opened += 1;
        }
        if let (true, Some(at)) = (r.clicked, r.clicked_at) {
            let day = at.date_naive();
            days.entry(day)
                .or_insert_with(|| DailyEmailStats::empty(day))
                .links_clicked += 1;
        }
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn record(
        id: &str,
        sent: DateTime<Utc>,
        opened: Option<DateTime<Utc>>,
        clicked: Option<DateTime<Utc>>,
    ) -> DeliveryRecord {
        DeliveryRecord {
            id: id.into(),
            campaign_id: 1,
            recipient_id: 1,
            sent_at: sent,
            opened: opened.is_some(),
            clicked: clicked.is_some(),
            opened_at: opened,
            clicked_at: clicked,
        }
    }

    #[test]
    fn counts_totals_from_flags() {
        let records = vec![
            record("a", at(2024, 3, 1, 9), Some(at(2024, 3, 1, 10)), None),
            record("b", at(2024, 3, 1, 9), None, None),
            record("c", at(2024, 3, 1, 9), Some(at(2024, 3, 2, 8)), Some(at(2024, 3, 2, 8))),
        ];
        let report = build_report(1, &records, BTreeMap::new());
        assert_eq!(report.total_sent, 3);
        assert_eq!(report.total_opened, 2);
        assert_eq!(report.total_clicked, 1);
    }

    #[test]
    fn buckets_each_event_by_its_own_utc_day_in_order() {
        let records = vec![
            record("a", at(2024, 3, 2, 23), Some(at(2024, 3, 3, 0)), None),
            record("b", at(2024, 3, 1, 0), None, Some(at(2024, 3, 3, 12))),
        ];
        let stats = daily_stats(&records);

        let dates: Vec<String> = stats.iter().map(|s| s.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
        assert_eq!(stats[0].emails_sent, 1);
        assert_eq!(stats[1].emails_sent, 1);
        assert_eq!(stats[2].emails_sent, 0);
        assert_eq!(stats[2].emails_opened, 1);
        assert_eq!(stats[2].links_clicked, 1);
    }

    #[test]
    fn empty_campaign_has_no_days() {
        assert!(daily_stats(&[]).is_empty());
    }
}
