use serde::{Deserialize, Serialize};

/// Payout instruction submitted to the banking gateway.
///
/// Field names follow the gateway's wire format; the serialized body is
/// what gets signed, so the order and casing here are load-bearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutInstruction {
    /// Burn transaction hash, proof that tokens were destroyed
    pub tx_hash: String,
    pub network_chain_id: String,
    /// Amount in smallest denomination, decimal string
    pub amount_transfer: String,
    pub bank_account: String,
    pub bank_code: String,
    pub bank_name: String,
    pub bank_account_name: String,
    pub wallet_address: String,
}

/// Gateway success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutResponse {
    pub status_code: u16,
    pub message: String,
    pub data: PayoutReceipt,
}

/// Gateway-side record of a submitted payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutReceipt {
    pub id: u64,
    pub chain_id: u64,
    pub user_id: u64,
    pub requester: String,
    pub tx_hash: String,
    pub from_address: String,
    pub amount: String,
    pub bank_name: String,
    pub bank_code: String,
    pub bank_account_number: String,
    pub bank_account_name: String,
    #[serde(default)]
    pub bank_account_number_hash: Option<String>,
    /// Customer reference number, correlates the payout with the on-chain record
    pub cust_ref_number: String,
    pub disburse_id: u64,
    pub burn_status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Gateway error envelope used when a call is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
