//! Signed HTTP client for the banking payout gateway
//!
//! Every call carries an API key, an HMAC signature and the timestamp the
//! signature binds to. The timestamp is generated at call time - the
//! gateway rejects stale ones. No retries happen here; retry policy
//! belongs to the orchestrator.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::models::payout::{PayoutErrorBody, PayoutInstruction, PayoutResponse};
use crate::services::signature;

const REDEEM_REQUEST_PATH: &str = "/transaction/redeem-request";
const TRANSACTION_HISTORY_PATH: &str = "/transaction/user/transaction-history";

const HEADER_API_KEY: &str = "x-api-key";
const HEADER_SIGNATURE: &str = "x-api-sig";
const HEADER_TIMESTAMP: &str = "x-api-ts";

/// Error returned when the gateway rejects a call
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub status_code: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "Gateway error ({}): {}", code, self.message),
            None => write!(f, "Gateway error: {}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

impl GatewayError {
    fn transport(err: reqwest::Error) -> Self {
        Self {
            status_code: None,
            message: err.to_string(),
        }
    }
}

/// Capability the orchestrator depends on. The real client and the demo
/// mock are the two variants, selected by configuration at construction.
#[async_trait]
pub trait PayoutGateway: Send + Sync {
    /// Submit one payout instruction; success yields the gateway's record
    /// including the customer reference number.
    async fn submit_payout(
        &self,
        instruction: &PayoutInstruction,
    ) -> Result<PayoutResponse, GatewayError>;

    /// Gateway-side transaction history for a wallet.
    async fn transaction_history(
        &self,
        wallet_address: &str,
    ) -> Result<serde_json::Value, GatewayError>;
}

/// Real gateway client
pub struct PayoutApiClient {
    client: Client,
    api_url: String,
    api_key: String,
    secret_key: String,
}

impl PayoutApiClient {
    pub fn new(api_url: String, api_key: String, secret_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client"),
            api_url,
            api_key,
            secret_key,
        }
    }

    async fn error_from_response(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let message = match response.json::<PayoutErrorBody>().await {
            Ok(body) => body
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
            Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
        };
        GatewayError {
            status_code: Some(status.as_u16()),
            message,
        }
    }
}

#[async_trait]
impl PayoutGateway for PayoutApiClient {
    async fn submit_payout(
        &self,
        instruction: &PayoutInstruction,
    ) -> Result<PayoutResponse, GatewayError> {
        let body = serde_json::to_string(instruction).map_err(|e| GatewayError {
            status_code: None,
            message: format!("Failed to serialize instruction: {}", e),
        })?;

        // Fresh timestamp per call - the signature binds to it
        let timestamp = Utc::now().timestamp_millis().to_string();
        let sig = signature::sign("POST", REDEEM_REQUEST_PATH, &body, &timestamp, &self.secret_key);

        debug!(
            path = REDEEM_REQUEST_PATH,
            amount = %instruction.amount_transfer,
            "Submitting payout instruction"
        );

        let response = self
            .client
            .post(format!("{}{}", self.api_url, REDEEM_REQUEST_PATH))
            .header("Content-Type", "application/json")
            .header(HEADER_API_KEY, &self.api_key)
            .header(HEADER_SIGNATURE, sig)
            .header(HEADER_TIMESTAMP, timestamp)
            .body(body)
            .send()
            .await
            .map_err(GatewayError::transport)?;

        if !response.status().is_success() {
            let err = Self::error_from_response(response).await;
            error!(error = %err, "Payout submission rejected");
            return Err(err);
        }

        let payout: PayoutResponse = response.json().await.map_err(GatewayError::transport)?;

        info!(
            cust_ref_number = %payout.data.cust_ref_number,
            "Payout instruction accepted"
        );

        Ok(payout)
    }

    async fn transaction_history(
        &self,
        wallet_address: &str,
    ) -> Result<serde_json::Value, GatewayError> {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let sig = signature::sign("GET", TRANSACTION_HISTORY_PATH, "", &timestamp, &self.secret_key);

        let response = self
            .client
            .get(format!(
                "{}{}?walletAddress={}",
                self.api_url, TRANSACTION_HISTORY_PATH, wallet_address
            ))
            .header(HEADER_API_KEY, &self.api_key)
            .header(HEADER_SIGNATURE, sig)
            .header(HEADER_TIMESTAMP, timestamp)
            .send()
            .await
            .map_err(GatewayError::transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response.json().await.map_err(GatewayError::transport)
    }
}
