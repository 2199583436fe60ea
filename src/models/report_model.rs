//! models/report_model.rs
//! Reporte derivado de una campaña; se calcula bajo demanda y no se persiste.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Agregado de un día calendario UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyEmailStats {
    pub date: NaiveDate,
    pub emails_sent: i64,
    pub emails_opened: i64,
    pub links_clicked: i64,
}

impl DailyEmailStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            emails_sent: 0,
            emails_opened: 0,
            links_clicked: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    pub campaign_id: i64,
    pub total_sent: i64,
    pub total_opened: i64,
    pub total_clicked: i64,
    /// user_id (texto) -> número de intentos registrados
    pub attempts_by_user: BTreeMap<String, i64>,
    /// Ordenado por fecha ascendente
    pub daily_stats: Vec<DailyEmailStats>,
}
