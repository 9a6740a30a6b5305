//! Ledger client for the on-chain redemption registry
//!
//! Reads go through a plain HTTP provider. Writes (treasury burn, status
//! updates) are signed by the treasury wallet; when no key is configured
//! the client runs in read-only mode: status writes become successful
//! no-ops and burns fail, so a misconfigured deployment can never half-
//! process a request.

use alloy::{
    eips::BlockNumberOrTag,
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::Filter,
    signers::local::PrivateKeySigner,
    sol,
    sol_types::SolEvent,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use std::str::FromStr;
use tracing::{debug, error, info, warn};

use crate::models::redeem::{RedeemMode, RedeemStatus, RedemptionRequest};

sol! {
    #[sol(rpc)]
    interface IRedemptionRegistry {
        event RedeemRequested(uint256 indexed requestId, address indexed user, uint256 amount, uint8 mode);

        function getRedeemRequest(uint256 requestId) external view returns (
            address user,
            uint256 amount,
            uint8 status,
            uint8 mode,
            string txHashBurn,
            string txHashRedeem,
            uint256 timestamp
        );

        function updateRedeemStatus(uint256 requestId, uint8 status, string txHashBurn, string txHashRedeem) external;
    }
}

sol! {
    #[sol(rpc)]
    interface IRedeemableToken {
        function burnWithAccountNumber(uint256 amount, string accountNumber) external;
    }
}

/// Confirmation of a submitted treasury burn
#[derive(Debug, Clone)]
pub struct BurnReceipt {
    pub tx_hash: String,
}

/// Confirmation of a status write
#[derive(Debug, Clone)]
pub struct StatusReceipt {
    pub tx_hash: String,
}

/// Error types for ledger operations
#[derive(Debug)]
pub enum LedgerError {
    ProviderError(String),
    NotFound(u64),
    WriteError(String),
    InvalidConfig(String),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            LedgerError::NotFound(id) => write!(f, "Request {} not found", id),
            LedgerError::WriteError(msg) => write!(f, "Ledger write error: {}", msg),
            LedgerError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Read/write contract to the on-chain request registry.
///
/// `update_status` returning `Ok(None)` models read-only operating mode;
/// callers treat it as a successful no-op.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// All requests with `mode == TREASURY_ASSISTED && status == PENDING`,
    /// ascending id order, reflecting the latest committed ledger state.
    async fn list_pending_treasury_requests(&self)
        -> Result<Vec<RedemptionRequest>, LedgerError>;

    async fn get_request(&self, id: u64) -> Result<RedemptionRequest, LedgerError>;

    /// Burn tokens from treasury custody. Irreversible once finalized.
    async fn burn(&self, amount: U256, account_hash: &str) -> Result<BurnReceipt, LedgerError>;

    async fn update_status(
        &self,
        id: u64,
        status: RedeemStatus,
        tx_hash_burn: &str,
        tx_hash_redeem: &str,
    ) -> Result<Option<StatusReceipt>, LedgerError>;

    /// Whether this client holds write capability (a treasury key).
    fn can_write(&self) -> bool;
}

/// Alloy-backed ledger client
pub struct LedgerService {
    provider: RootProvider<Http<Client>>,
    rpc_url: String,
    registry_address: Address,
    token_address: Address,
    /// Absent in read-only operating mode
    wallet: Option<EthereumWallet>,
}

impl LedgerService {
    /// Create a new ledger client and verify the RPC connection.
    pub async fn new(
        rpc_url: &str,
        registry_address: &str,
        token_address: &str,
        treasury_private_key: Option<&str>,
    ) -> Result<Self, LedgerError> {
        info!(rpc_url = %rpc_url, "Initializing LedgerService");

        let provider = ProviderBuilder::new().on_http(rpc_url.parse().map_err(|e| {
            LedgerError::InvalidConfig(format!("Invalid RPC URL: {}", e))
        })?);

        let chain_id = provider.get_chain_id().await.map_err(|e| {
            error!(error = %e, "Failed to connect to ledger RPC");
            LedgerError::ProviderError(format!("Connection failed: {}", e))
        })?;

        let registry = Address::from_str(registry_address).map_err(|e| {
            LedgerError::InvalidConfig(format!("Invalid registry address: {}", e))
        })?;
        let token = Address::from_str(token_address).map_err(|e| {
            LedgerError::InvalidConfig(format!("Invalid token address: {}", e))
        })?;

        let wallet = match treasury_private_key {
            Some(key) => {
                let signer: PrivateKeySigner = key.parse().map_err(|e| {
                    LedgerError::InvalidConfig(format!("Invalid treasury key: {}", e))
                })?;
                Some(EthereumWallet::from(signer))
            }
            None => {
                warn!("No treasury key configured - ledger client is read-only");
                None
            }
        };

        info!(
            chain_id = chain_id,
            registry = %registry,
            token = %token,
            writable = wallet.is_some(),
            "LedgerService initialized successfully"
        );

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            registry_address: registry,
            token_address: token,
            wallet,
        })
    }

    /// Build a wallet-backed provider for a single write.
    fn write_provider(
        &self,
        wallet: &EthereumWallet,
    ) -> Result<impl Provider<Http<Client>>, LedgerError> {
        Ok(ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet.clone())
            .on_http(self.rpc_url.parse().map_err(|e| {
                LedgerError::InvalidConfig(format!("Invalid RPC URL: {}", e))
            })?))
    }
}

#[async_trait]
impl Ledger for LedgerService {
    async fn list_pending_treasury_requests(
        &self,
    ) -> Result<Vec<RedemptionRequest>, LedgerError> {
        let filter = Filter::new()
            .address(self.registry_address)
            .event_signature(IRedemptionRegistry::RedeemRequested::SIGNATURE_HASH)
            .from_block(BlockNumberOrTag::Earliest)
            .to_block(BlockNumberOrTag::Latest);

        let logs = self.provider.get_logs(&filter).await.map_err(|e| {
            LedgerError::ProviderError(format!("Failed to get logs: {}", e))
        })?;

        debug!(event_count = logs.len(), "Scanned RedeemRequested events");

        let mut pending = Vec::new();

        for log in &logs {
            let topics = log.inner.topics();
            if topics.len() < 3 {
                warn!("RedeemRequested log with insufficient topics, skipping");
                continue;
            }

            // topic[0] = event signature
            // topic[1] = requestId (indexed uint256)
            // topic[2] = user (indexed address)
            let raw_id = U256::from_be_slice(&topics[1][..]);
            let id = match u64::try_from(raw_id) {
                Ok(id) => id,
                Err(_) => {
                    warn!(request_id = %raw_id, "Request id exceeds u64 range, skipping");
                    continue;
                }
            };

            // The event is append-only; current state comes from the registry read.
            let request = match self.get_request(id).await {
                Ok(request) => request,
                Err(LedgerError::NotFound(_)) => {
                    warn!(request_id = id, "Event references unknown request, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if request.mode == RedeemMode::TreasuryAssisted
                && request.status == RedeemStatus::Pending
            {
                pending.push(request);
            }
        }

        pending.sort_by_key(|r| r.id);

        Ok(pending)
    }

    async fn get_request(&self, id: u64) -> Result<RedemptionRequest, LedgerError> {
        let registry = IRedemptionRegistry::new(self.registry_address, &self.provider);
        let result = registry
            .getRedeemRequest(U256::from(id))
            .call()
            .await
            .map_err(|e| {
                LedgerError::ProviderError(format!("getRedeemRequest failed: {}", e))
            })?;

        // The registry returns zeroed storage for unknown ids.
        if result.user == Address::ZERO {
            return Err(LedgerError::NotFound(id));
        }

        let status = RedeemStatus::from_u8(result.status).ok_or_else(|| {
            LedgerError::ProviderError(format!("Unknown status value: {}", result.status))
        })?;
        let mode = RedeemMode::from_u8(result.mode).ok_or_else(|| {
            LedgerError::ProviderError(format!("Unknown mode value: {}", result.mode))
        })?;

        Ok(RedemptionRequest {
            id,
            user: format!("{:?}", result.user),
            amount: result.amount,
            status,
            mode,
            tx_hash_burn: (!result.txHashBurn.is_empty()).then_some(result.txHashBurn),
            tx_hash_redeem: (!result.txHashRedeem.is_empty()).then_some(result.txHashRedeem),
            timestamp: u64::try_from(result.timestamp).unwrap_or(0),
            // The registry does not expose bank metadata on reads
            bank_account: None,
            bank_code: None,
            bank_name: None,
            bank_account_name: None,
        })
    }

    async fn burn(&self, amount: U256, account_hash: &str) -> Result<BurnReceipt, LedgerError> {
        let wallet = self.wallet.as_ref().ok_or_else(|| {
            LedgerError::WriteError(
                "treasury wallet not configured (read-only mode)".to_string(),
            )
        })?;

        let provider = self.write_provider(wallet)?;
        let token = IRedeemableToken::new(self.token_address, &provider);

        let pending_tx = token
            .burnWithAccountNumber(amount, account_hash.to_string())
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send burn transaction");
                LedgerError::WriteError(format!("Burn send failed: {}", e))
            })?;

        let tx_hash = format!("{:?}", pending_tx.tx_hash());
        debug!(tx_hash = %tx_hash, "Burn transaction sent, waiting for receipt");

        let receipt = pending_tx.get_receipt().await.map_err(|e| {
            error!(error = %e, "Failed to get burn receipt");
            LedgerError::WriteError(format!("Burn receipt failed: {}", e))
        })?;

        if !receipt.status() {
            return Err(LedgerError::WriteError("Burn transaction reverted".to_string()));
        }

        info!(tx_hash = %tx_hash, amount = %amount, "Treasury burn confirmed");

        Ok(BurnReceipt { tx_hash })
    }

    async fn update_status(
        &self,
        id: u64,
        status: RedeemStatus,
        tx_hash_burn: &str,
        tx_hash_redeem: &str,
    ) -> Result<Option<StatusReceipt>, LedgerError> {
        let Some(wallet) = self.wallet.as_ref() else {
            warn!(
                request_id = id,
                status = status.as_str(),
                "Read-only mode - skipping on-chain status update"
            );
            return Ok(None);
        };

        let provider = self.write_provider(wallet)?;
        let registry = IRedemptionRegistry::new(self.registry_address, &provider);

        let pending_tx = registry
            .updateRedeemStatus(
                U256::from(id),
                status.as_u8(),
                tx_hash_burn.to_string(),
                tx_hash_redeem.to_string(),
            )
            .send()
            .await
            .map_err(|e| {
                error!(request_id = id, error = %e, "Failed to send status update");
                LedgerError::WriteError(format!("Status update send failed: {}", e))
            })?;

        let tx_hash = format!("{:?}", pending_tx.tx_hash());

        let receipt = pending_tx.get_receipt().await.map_err(|e| {
            error!(request_id = id, error = %e, "Failed to get status update receipt");
            LedgerError::WriteError(format!("Status update receipt failed: {}", e))
        })?;

        if !receipt.status() {
            return Err(LedgerError::WriteError(
                "Status update transaction reverted".to_string(),
            ));
        }

        debug!(
            request_id = id,
            status = status.as_str(),
            tx_hash = %tx_hash,
            "Status update confirmed"
        );

        Ok(Some(StatusReceipt { tx_hash }))
    }

    fn can_write(&self) -> bool {
        self.wallet.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::WriteError("insufficient treasury balance".to_string());
        assert!(err.to_string().contains("insufficient treasury balance"));

        let err = LedgerError::NotFound(7);
        assert_eq!(err.to_string(), "Request 7 not found");
    }

    #[test]
    fn test_event_signature_is_stable() {
        // keccak256("RedeemRequested(uint256,address,uint256,uint8)")
        let sig = IRedemptionRegistry::RedeemRequested::SIGNATURE;
        assert_eq!(sig, "RedeemRequested(uint256,address,uint256,uint8)");
    }
}
