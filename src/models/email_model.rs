use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Asunto y cuerpo HTML listos para entregar al transporte
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// POST /api/email/send
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub campaign_id: i64,
    pub recipient_email: String,
    #[serde(default)]
    pub placeholders: HashMap<String, String>,
}

/// POST /api/campaigns/{id}/send
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendCampaignRequest {
    #[serde(default)]
    pub placeholders: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchedEmail {
    pub recipient: String,
    pub tracking_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedDispatch {
    pub recipient: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub campaign_id: i64,
    pub sent: Vec<DispatchedEmail>,
    pub failed: Vec<FailedDispatch>,
}

/// Query string de /api/phishing/open y /api/phishing/click
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingQuery {
    #[serde(rename = "emailId")]
    pub email_id: Option<String>,
    pub target: Option<String>,
}
