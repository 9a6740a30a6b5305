//! Service configuration
//!
//! All environment access happens once at startup; the resulting `Config`
//! is passed explicitly to every constructor. Client selection (real vs
//! mock payout gateway, read-only vs writable ledger) is driven by this
//! struct, never by inspecting process state at call time.

use std::env;

/// Default RPC endpoint for the ledger chain (Lisk Sepolia)
const DEFAULT_RPC_URL: &str = "https://rpc.sepolia-api.lisk.com";

/// Default network chain id sent to the payout gateway (Lisk Sepolia)
const DEFAULT_NETWORK_CHAIN_ID: &str = "4202";

/// Default bounded timeout applied to each external call, in seconds
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Which payout gateway implementation the service runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutMode {
    /// Mock gateway, simulated responses
    Demo,
    /// Real gateway, signed API calls
    Production,
}

impl PayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutMode::Demo => "demo",
            PayoutMode::Production => "production",
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, PayoutMode::Demo)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger chain RPC endpoint
    pub rpc_url: String,
    /// Redemption registry contract address
    pub registry_address: String,
    /// Redeemable token contract address
    pub token_address: String,
    /// Treasury signing key; absent means read-only operating mode
    pub treasury_private_key: Option<String>,
    /// Chain id string carried in payout instructions
    pub network_chain_id: String,

    /// Payout gateway base URL
    pub payout_api_url: String,
    /// Payout gateway API key header value
    pub payout_api_key: String,
    /// Shared secret for request signing
    pub payout_secret_key: String,
    pub payout_mode: PayoutMode,

    /// Shared secret authorizing the treasury bot trigger; absent disables it
    pub cron_secret: Option<String>,
    /// Interval for the in-process bot schedule; absent means HTTP-trigger only
    pub treasury_bot_interval_secs: Option<u64>,

    /// Per-call timeout for ledger and gateway operations
    pub call_timeout_secs: u64,

    /// Mock gateway knobs
    pub demo_processing_delay_ms: u64,
    pub demo_success_rate: u8,

    pub port: u16,
}

impl Config {
    /// Build configuration from the environment, applying defaults.
    pub fn from_env() -> Self {
        let payout_mode = match env::var("PAYOUT_MODE").as_deref() {
            Ok("production") => PayoutMode::Production,
            _ => PayoutMode::Demo,
        };

        Self {
            rpc_url: env::var("LEDGER_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            registry_address: env::var("REDEMPTION_REGISTRY_ADDRESS")
                .unwrap_or_else(|_| "0x0000000000000000000000000000000000000000".to_string()),
            token_address: env::var("TOKEN_ADDRESS")
                .unwrap_or_else(|_| "0x0000000000000000000000000000000000000000".to_string()),
            treasury_private_key: env::var("TREASURY_PRIVATE_KEY").ok(),
            network_chain_id: env::var("NETWORK_CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_NETWORK_CHAIN_ID.to_string()),
            payout_api_url: env::var("PAYOUT_API_URL").unwrap_or_default(),
            payout_api_key: env::var("PAYOUT_API_KEY").unwrap_or_default(),
            payout_secret_key: env::var("PAYOUT_SECRET_KEY").unwrap_or_default(),
            payout_mode,
            cron_secret: env::var("CRON_SECRET").ok(),
            treasury_bot_interval_secs: env::var("TREASURY_BOT_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            call_timeout_secs: env::var("CALL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CALL_TIMEOUT_SECS),
            demo_processing_delay_ms: env::var("DEMO_PROCESSING_DELAY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2000),
            demo_success_rate: env::var("DEMO_SUCCESS_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_mode_labels() {
        assert_eq!(PayoutMode::Demo.as_str(), "demo");
        assert_eq!(PayoutMode::Production.as_str(), "production");
        assert!(PayoutMode::Demo.is_demo());
        assert!(!PayoutMode::Production.is_demo());
    }

    #[test]
    fn test_default_call_timeout() {
        assert_eq!(DEFAULT_CALL_TIMEOUT_SECS, 30);
    }
}
