//! Mock payout gateway for demo mode
//!
//! Satisfies `PayoutGateway` without touching the real banking API.
//! Delay and success rate are configurable so failure handling can be
//! exercised end to end.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use crate::models::payout::{PayoutInstruction, PayoutReceipt, PayoutResponse};
use crate::services::payout::{GatewayError, PayoutGateway};

pub struct MockPayoutGateway {
    /// Demo ids start at 1000 to stand apart from real gateway ids
    request_counter: AtomicU64,
    processing_delay_ms: u64,
    /// Percentage of calls that succeed, 0-100
    success_rate: u8,
}

impl MockPayoutGateway {
    pub fn new(processing_delay_ms: u64, success_rate: u8) -> Self {
        Self {
            request_counter: AtomicU64::new(1000),
            processing_delay_ms,
            success_rate: success_rate.min(100),
        }
    }

    fn generate_cust_ref_number() -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
        format!("DEMO{:08}{:04}", millis % 100_000_000, suffix)
    }
}

#[async_trait]
impl PayoutGateway for MockPayoutGateway {
    async fn submit_payout(
        &self,
        instruction: &PayoutInstruction,
    ) -> Result<PayoutResponse, GatewayError> {
        debug!(
            amount = %instruction.amount_transfer,
            bank_name = %instruction.bank_name,
            wallet = %instruction.wallet_address,
            "Simulating payout submission"
        );

        if self.processing_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.processing_delay_ms)).await;
        }

        if rand::thread_rng().gen_range(0..100) >= self.success_rate {
            return Err(GatewayError {
                status_code: Some(500),
                message: "Demo: simulated payout gateway error".to_string(),
            });
        }

        let id = self.request_counter.fetch_add(1, Ordering::SeqCst);
        let cust_ref_number = Self::generate_cust_ref_number();
        let now = Utc::now().to_rfc3339();

        info!(id = id, cust_ref_number = %cust_ref_number, "Generated mock payout response");

        Ok(PayoutResponse {
            status_code: 201,
            message: "success".to_string(),
            data: PayoutReceipt {
                id,
                chain_id: instruction.network_chain_id.parse().unwrap_or(0),
                user_id: 999,
                requester: instruction.bank_account_name.clone(),
                tx_hash: instruction.tx_hash.clone(),
                from_address: instruction.wallet_address.clone(),
                amount: instruction.amount_transfer.clone(),
                bank_name: instruction.bank_name.clone(),
                bank_code: instruction.bank_code.clone(),
                bank_account_number: instruction.bank_account.clone(),
                bank_account_name: instruction.bank_account_name.clone(),
                bank_account_number_hash: None,
                cust_ref_number,
                disburse_id: id * 100,
                burn_status: "REQUESTED".to_string(),
                created_at: now.clone(),
                updated_at: now,
            },
        })
    }

    async fn transaction_history(
        &self,
        wallet_address: &str,
    ) -> Result<serde_json::Value, GatewayError> {
        debug!(wallet = %wallet_address, "Simulating transaction history fetch");

        Ok(serde_json::json!({
            "statusCode": 200,
            "message": "success",
            "data": [
                {
                    "id": 1,
                    "txHash": "0xdemo123456789abcdef",
                    "amount": "100000",
                    "status": "COMPLETED",
                    "createdAt": (Utc::now() - chrono::Duration::days(1)).to_rfc3339(),
                },
                {
                    "id": 2,
                    "txHash": "0xdemo987654321fedcba",
                    "amount": "50000",
                    "status": "PROCESSING",
                    "createdAt": (Utc::now() - chrono::Duration::hours(1)).to_rfc3339(),
                }
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction() -> PayoutInstruction {
        PayoutInstruction {
            tx_hash: "0xabc".to_string(),
            network_chain_id: "4202".to_string(),
            amount_transfer: "100000".to_string(),
            bank_account: "1234567890".to_string(),
            bank_code: "014".to_string(),
            bank_name: "BANK CENTRAL ASIA".to_string(),
            bank_account_name: "Test User".to_string(),
            wallet_address: "0x1111111111111111111111111111111111111111".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_succeeds_at_full_success_rate() {
        let gateway = MockPayoutGateway::new(0, 100);

        let response = gateway.submit_payout(&instruction()).await.unwrap();
        assert_eq!(response.status_code, 201);
        assert_eq!(response.data.id, 1000);
        assert_eq!(response.data.tx_hash, "0xabc");
        assert!(response.data.cust_ref_number.starts_with("DEMO"));

        // Ids are monotonically increasing
        let second = gateway.submit_payout(&instruction()).await.unwrap();
        assert_eq!(second.data.id, 1001);
    }

    #[tokio::test]
    async fn test_submit_fails_at_zero_success_rate() {
        let gateway = MockPayoutGateway::new(0, 0);

        let err = gateway.submit_payout(&instruction()).await.unwrap_err();
        assert_eq!(err.status_code, Some(500));
        assert!(err.message.contains("simulated"));
    }

    #[tokio::test]
    async fn test_transaction_history_shape() {
        let gateway = MockPayoutGateway::new(0, 100);

        let history = gateway
            .transaction_history("0x1111111111111111111111111111111111111111")
            .await
            .unwrap();
        assert_eq!(history["statusCode"], 200);
        assert_eq!(history["data"].as_array().unwrap().len(), 2);
    }
}
