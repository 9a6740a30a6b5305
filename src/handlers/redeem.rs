//! Redemption intake endpoints
//!
//! Self-service: the user already burned and submits the burn transaction
//! as proof; the payout instruction goes straight to the gateway.
//! Treasury-assisted: tokens were transferred to the treasury; the
//! on-chain registry is the queue and the treasury bot does the rest.

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::models::payout::PayoutInstruction;
use crate::models::redeem::{
    ErrorResponse, QueuedRedeemData, RedeemStatus, SelfServiceRedeemRequest,
    SelfServiceRedeemResponse, TreasuryAssistedRedeemRequest, TreasuryAssistedRedeemResponse,
};
use crate::validation;
use crate::AppState;

/// Self-service amount cap outside demo mode (smallest denomination)
const SELF_SERVICE_AMOUNT_CAP: u128 = 250_000_000;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn internal_error(message: String) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}

fn validate_common(
    wallet_address: &str,
    bank_account: &str,
    bank_code: Option<&str>,
    amount: &str,
) -> Result<(), HandlerError> {
    if !validation::is_valid_address(wallet_address) {
        return Err(bad_request("Invalid wallet address"));
    }
    if !validation::is_valid_bank_account(bank_account) {
        return Err(bad_request("Invalid bank account number"));
    }
    if let Some(code) = bank_code {
        if !code.is_empty() && !validation::is_valid_bank_code(code) {
            return Err(bad_request("Invalid bank code"));
        }
    }
    if !validation::is_valid_amount(amount, None) {
        return Err(bad_request("Invalid amount"));
    }
    Ok(())
}

pub async fn self_service_redeem(
    State(state): State<AppState>,
    Json(payload): Json<SelfServiceRedeemRequest>,
) -> Result<Json<SelfServiceRedeemResponse>, HandlerError> {
    if payload.tx_hash.is_empty()
        || payload.amount.is_empty()
        || payload.bank_account.is_empty()
        || payload.wallet_address.is_empty()
    {
        return Err(bad_request("Missing required fields"));
    }

    validate_common(
        &payload.wallet_address,
        &payload.bank_account,
        payload.bank_code.as_deref(),
        &payload.amount,
    )?;

    let demo_mode = state.config.payout_mode.is_demo();

    if !demo_mode && !validation::is_valid_amount(&payload.amount, Some(SELF_SERVICE_AMOUNT_CAP)) {
        return Err(bad_request(
            "Amount exceeds self-service limit. Use treasury-assisted mode.",
        ));
    }

    let instruction = PayoutInstruction {
        tx_hash: payload.tx_hash.clone(),
        network_chain_id: state.config.network_chain_id.clone(),
        amount_transfer: payload.amount.clone(),
        bank_account: payload.bank_account.clone(),
        bank_code: payload.bank_code.clone().unwrap_or_default(),
        bank_name: payload.bank_name.clone().unwrap_or_default(),
        bank_account_name: payload.bank_account_name.clone().unwrap_or_default(),
        wallet_address: payload.wallet_address.clone(),
    };

    let payout = state.payout.submit_payout(&instruction).await.map_err(|e| {
        error!(error = %e, "Self-service payout submission failed");
        internal_error(e.to_string())
    })?;

    // Record PROCESSING on the registry when the burn went through it
    if let Some(request_id) = payload.request_id {
        if !demo_mode {
            state
                .ledger
                .update_status(
                    request_id,
                    RedeemStatus::Processing,
                    &payload.tx_hash,
                    &payout.data.cust_ref_number,
                )
                .await
                .map_err(|e| {
                    error!(request_id = request_id, error = %e, "Status update failed");
                    internal_error(e.to_string())
                })?;
        }
    }

    let message = if demo_mode {
        "DEMO MODE: Redeem request simulated successfully"
    } else {
        "Redeem request submitted successfully"
    };

    Ok(Json(SelfServiceRedeemResponse {
        success: true,
        data: payout.data,
        message: message.to_string(),
        is_demo_mode: demo_mode,
    }))
}

pub async fn treasury_assisted_redeem(
    State(state): State<AppState>,
    Json(payload): Json<TreasuryAssistedRedeemRequest>,
) -> Result<Json<TreasuryAssistedRedeemResponse>, HandlerError> {
    if payload.amount.is_empty()
        || payload.bank_account.is_empty()
        || payload.wallet_address.is_empty()
    {
        return Err(bad_request("Missing required fields"));
    }

    validate_common(
        &payload.wallet_address,
        &payload.bank_account,
        payload.bank_code.as_deref(),
        &payload.amount,
    )?;

    let demo_mode = state.config.payout_mode.is_demo();

    // The registry event queue is the source of truth; this endpoint only
    // acknowledges the request and echoes masked details.
    let masked_account = format!(
        "***{}",
        &payload.bank_account[payload.bank_account.len().saturating_sub(4)..]
    );

    let message = if demo_mode {
        "DEMO MODE: Redeem request queued (simulated). Treasury will process within 24 hours."
    } else {
        "Redeem request queued. Treasury will process within 24 hours."
    };

    Ok(Json(TreasuryAssistedRedeemResponse {
        success: true,
        message: message.to_string(),
        estimated_processing_time: "24 hours".to_string(),
        is_demo_mode: demo_mode,
        data: QueuedRedeemData {
            wallet_address: payload.wallet_address,
            amount: payload.amount,
            bank_account: masked_account,
            bank_name: payload.bank_name,
            status: RedeemStatus::Pending.as_str().to_string(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_common_rejects_bad_inputs() {
        let good_address = "0x1111111111111111111111111111111111111111";

        assert!(validate_common(good_address, "1234567890", Some("014"), "100000").is_ok());
        assert!(validate_common("0x123", "1234567890", None, "100000").is_err());
        assert!(validate_common(good_address, "12345", None, "100000").is_err());
        assert!(validate_common(good_address, "1234567890", Some("0014"), "100000").is_err());
        assert!(validate_common(good_address, "1234567890", None, "1.5").is_err());
        // Empty bank code is tolerated
        assert!(validate_common(good_address, "1234567890", Some(""), "100000").is_ok());
    }

    #[test]
    fn test_self_service_cap() {
        assert!(validation::is_valid_amount(
            "250000000",
            Some(SELF_SERVICE_AMOUNT_CAP)
        ));
        assert!(!validation::is_valid_amount(
            "250000001",
            Some(SELF_SERVICE_AMOUNT_CAP)
        ));
    }
}
