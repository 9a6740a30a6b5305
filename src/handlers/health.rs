//! Static health report

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub is_demo_mode: bool,
    pub mode: String,
    pub timestamp: String,
    pub features: HealthFeatures,
    pub config: HealthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFeatures {
    /// "mock" or "production"
    pub payout_api: String,
    /// "writable" or "read-only"
    pub ledger: String,
    /// "enabled" or "disabled"
    pub treasury_bot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthConfig {
    pub network_chain_id: String,
    pub demo_processing_delay_ms: u64,
    pub demo_success_rate: u8,
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let demo_mode = state.config.payout_mode.is_demo();

    Json(HealthResponse {
        status: "ok".to_string(),
        is_demo_mode: demo_mode,
        mode: state.config.payout_mode.as_str().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        features: HealthFeatures {
            payout_api: if demo_mode { "mock" } else { "production" }.to_string(),
            ledger: if state.ledger.can_write() {
                "writable"
            } else {
                "read-only"
            }
            .to_string(),
            treasury_bot: if state.config.cron_secret.is_some() {
                "enabled"
            } else {
                "disabled"
            }
            .to_string(),
        },
        config: HealthConfig {
            network_chain_id: state.config.network_chain_id.clone(),
            demo_processing_delay_ms: state.config.demo_processing_delay_ms,
            demo_success_rate: state.config.demo_success_rate,
        },
    })
}
