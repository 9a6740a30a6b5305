//! Shared fixtures for the HTTP integration tests.
//!
//! The router is exercised against an in-memory ledger and the demo
//! payout gateway, so no RPC endpoint or banking API is needed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::U256;
use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};

use redemption_backend::config::{Config, PayoutMode};
use redemption_backend::models::redeem::{RedeemMode, RedeemStatus, RedemptionRequest};
use redemption_backend::services::ledger::{
    BurnReceipt, Ledger, LedgerError, StatusReceipt,
};
use redemption_backend::services::payout::PayoutGateway;
use redemption_backend::services::payout_mock::MockPayoutGateway;
use redemption_backend::services::redemption::RedemptionProcessor;
use redemption_backend::{handlers, AppState};

/// In-memory registry standing in for the on-chain contract.
pub struct InMemoryLedger {
    pub requests: Mutex<HashMap<u64, RedemptionRequest>>,
    pub fail_burns: bool,
    /// Counts pending-set enumerations, so tests can assert the ledger
    /// was never touched on rejected paths
    pub list_calls: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            fail_burns: false,
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_request(self, request: RedemptionRequest) -> Self {
        self.requests.lock().unwrap().insert(request.id, request);
        self
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn list_pending_treasury_requests(
        &self,
    ) -> Result<Vec<RedemptionRequest>, LedgerError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut pending: Vec<RedemptionRequest> = self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|r| {
                r.mode == RedeemMode::TreasuryAssisted && r.status == RedeemStatus::Pending
            })
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.id);
        Ok(pending)
    }

    async fn get_request(&self, id: u64) -> Result<RedemptionRequest, LedgerError> {
        self.requests
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NotFound(id))
    }

    async fn burn(&self, _amount: U256, _account_hash: &str) -> Result<BurnReceipt, LedgerError> {
        if self.fail_burns {
            return Err(LedgerError::WriteError(
                "insufficient treasury balance".to_string(),
            ));
        }
        Ok(BurnReceipt {
            tx_hash: "0xburn".to_string(),
        })
    }

    async fn update_status(
        &self,
        id: u64,
        status: RedeemStatus,
        tx_hash_burn: &str,
        tx_hash_redeem: &str,
    ) -> Result<Option<StatusReceipt>, LedgerError> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;
        request.status = status;
        request.tx_hash_burn =
            (!tx_hash_burn.is_empty()).then(|| tx_hash_burn.to_string());
        request.tx_hash_redeem =
            (!tx_hash_redeem.is_empty()).then(|| tx_hash_redeem.to_string());
        Ok(Some(StatusReceipt {
            tx_hash: "0xstatus".to_string(),
        }))
    }

    fn can_write(&self) -> bool {
        true
    }
}

pub fn pending_treasury_request(id: u64, amount: u64) -> RedemptionRequest {
    RedemptionRequest {
        id,
        user: "0x1111111111111111111111111111111111111111".to_string(),
        amount: U256::from(amount),
        status: RedeemStatus::Pending,
        mode: RedeemMode::TreasuryAssisted,
        tx_hash_burn: None,
        tx_hash_redeem: None,
        timestamp: 1_700_000_000,
        bank_account: Some("1234567890".to_string()),
        bank_code: Some("014".to_string()),
        bank_name: Some("BANK CENTRAL ASIA".to_string()),
        bank_account_name: Some("Test User".to_string()),
    }
}

pub fn test_config(cron_secret: Option<&str>) -> Config {
    Config {
        rpc_url: "http://localhost:8545".to_string(),
        registry_address: "0x2222222222222222222222222222222222222222".to_string(),
        token_address: "0x3333333333333333333333333333333333333333".to_string(),
        treasury_private_key: None,
        network_chain_id: "4202".to_string(),
        payout_api_url: String::new(),
        payout_api_key: String::new(),
        payout_secret_key: String::new(),
        payout_mode: PayoutMode::Demo,
        cron_secret: cron_secret.map(|s| s.to_string()),
        treasury_bot_interval_secs: None,
        call_timeout_secs: 5,
        demo_processing_delay_ms: 0,
        demo_success_rate: 100,
        port: 0,
    }
}

pub fn build_state(ledger: Arc<InMemoryLedger>, config: Config) -> AppState {
    let config = Arc::new(config);
    let ledger: Arc<dyn Ledger> = ledger;
    let payout: Arc<dyn PayoutGateway> = Arc::new(MockPayoutGateway::new(
        config.demo_processing_delay_ms,
        config.demo_success_rate,
    ));
    let processor = Arc::new(RedemptionProcessor::new(
        ledger.clone(),
        payout.clone(),
        config.network_chain_id.clone(),
        Duration::from_secs(config.call_timeout_secs),
    ));

    AppState {
        config,
        ledger,
        payout,
        processor,
    }
}

/// Router with the same routes as the production binary.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::get_health))
        .route(
            "/api/redeem/self-service",
            post(handlers::redeem::self_service_redeem),
        )
        .route(
            "/api/redeem/treasury-assisted",
            post(handlers::redeem::treasury_assisted_redeem),
        )
        .route(
            "/api/redeem/status/{request_id}",
            get(handlers::status::get_request_status),
        )
        .route(
            "/api/cron/treasury-bot",
            get(handlers::treasury_bot::run_treasury_bot),
        )
        .with_state(state)
}
