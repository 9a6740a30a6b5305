use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a redemption request, as stored on the ledger.
///
/// PENDING is the only valid start state. Once COMPLETED or FAILED the
/// status is never overwritten by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RedeemStatus {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RedeemStatus::Pending),
            1 => Some(RedeemStatus::Processing),
            2 => Some(RedeemStatus::Completed),
            3 => Some(RedeemStatus::Failed),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            RedeemStatus::Pending => 0,
            RedeemStatus::Processing => 1,
            RedeemStatus::Completed => 2,
            RedeemStatus::Failed => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RedeemStatus::Pending => "PENDING",
            RedeemStatus::Processing => "PROCESSING",
            RedeemStatus::Completed => "COMPLETED",
            RedeemStatus::Failed => "FAILED",
        }
    }
}

/// Redemption path chosen by the user at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemMode {
    SelfService,
    TreasuryAssisted,
}

impl RedeemMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RedeemMode::SelfService),
            1 => Some(RedeemMode::TreasuryAssisted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RedeemMode::SelfService => "SELF_SERVICE",
            RedeemMode::TreasuryAssisted => "TREASURY_ASSISTED",
        }
    }
}

/// One redemption request read from the on-chain registry.
///
/// The registry read does not expose bank metadata, so those fields may be
/// absent; the orchestrator substitutes placeholders before hashing.
#[derive(Debug, Clone)]
pub struct RedemptionRequest {
    pub id: u64,
    pub user: String,
    /// Token amount in smallest denomination
    pub amount: U256,
    pub status: RedeemStatus,
    pub mode: RedeemMode,
    pub tx_hash_burn: Option<String>,
    pub tx_hash_redeem: Option<String>,
    /// Creation time, unix seconds
    pub timestamp: u64,
    pub bank_account: Option<String>,
    pub bank_code: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_name: Option<String>,
}

/// Outcome of processing a single request within one bot run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome {
    pub request_id: String,
    /// "COMPLETED" or "FAILED"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full report for one treasury bot run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub success: bool,
    /// Number of requests considered in this run
    pub processed: usize,
    pub results: Vec<RequestOutcome>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Self-service redemption payload: the user already burned and submits
/// the burn transaction as proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfServiceRedeemRequest {
    pub tx_hash: String,
    pub amount: String,
    pub bank_account: String,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_account_name: Option<String>,
    pub wallet_address: String,
    /// On-chain request id, when the burn went through the registry
    #[serde(default)]
    pub request_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfServiceRedeemResponse {
    pub success: bool,
    pub data: crate::models::payout::PayoutReceipt,
    pub message: String,
    pub is_demo_mode: bool,
}

/// Treasury-assisted redemption payload: tokens were transferred to the
/// treasury, the registry event queue drives the actual processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryAssistedRedeemRequest {
    pub amount: String,
    pub bank_account: String,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_account_name: Option<String>,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryAssistedRedeemResponse {
    pub success: bool,
    pub message: String,
    pub estimated_processing_time: String,
    pub is_demo_mode: bool,
    pub data: QueuedRedeemData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedRedeemData {
    pub wallet_address: String,
    pub amount: String,
    /// Masked, only the last four digits are echoed back
    pub bank_account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    pub status: String,
}

/// Human-readable view of a request, served by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusResponse {
    pub success: bool,
    pub data: RequestStatusData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusData {
    pub request_id: String,
    pub user: String,
    pub amount: String,
    pub status: String,
    pub mode: String,
    pub tx_hash_burn: Option<String>,
    pub tx_hash_redeem: Option<String>,
    pub timestamp: u64,
    pub created_at: String,
}
