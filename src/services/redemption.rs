//! Redemption orchestrator
//!
//! Drives the treasury-assisted redemption saga: enumerate pending
//! requests, burn from treasury custody, submit the payout instruction,
//! write the terminal status back to the ledger. Each request is processed
//! independently - one request's failure never aborts the batch. The
//! burn/payout/status-write sequence is not atomic; partial failures are
//! compensated with a best-effort FAILED status write and always surface
//! in the batch report.

use chrono::Utc;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::models::payout::PayoutInstruction;
use crate::models::redeem::{BatchReport, RedeemStatus, RedemptionRequest, RequestOutcome};
use crate::services::ledger::{Ledger, LedgerError};
use crate::services::payout::PayoutGateway;

/// Placeholder bank name used when a request carries no bank metadata.
/// Missing metadata does not abort the burn.
const DEFAULT_BANK_NAME: &str = "UNKNOWN";
/// Placeholder account number for the same case
const DEFAULT_BANK_ACCOUNT: &str = "0000000000";

pub struct RedemptionProcessor {
    ledger: Arc<dyn Ledger>,
    payout: Arc<dyn PayoutGateway>,
    /// Chain id string carried in every payout instruction
    network_chain_id: String,
    /// Bounded timeout applied to each external call
    call_timeout: Duration,
    cancelled: AtomicBool,
}

impl RedemptionProcessor {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        payout: Arc<dyn PayoutGateway>,
        network_chain_id: String,
        call_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            payout,
            network_chain_id,
            call_timeout,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Stop starting new per-request work in the current run. The in-flight
    /// request finishes, so a burned request is never left without its
    /// payout attempt. The flag clears when the run returns; later runs
    /// are unaffected.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Run one batch: fetch the pending set and process each request.
    ///
    /// Only the enumeration call can fail the run as a whole; per-request
    /// failures become FAILED outcomes in the report.
    pub async fn run(&self) -> Result<BatchReport, LedgerError> {
        info!("Starting redemption queue processing");

        let pending = self
            .bounded(
                self.ledger.list_pending_treasury_requests(),
                LedgerError::ProviderError("Pending request enumeration timed out".to_string()),
            )
            .await?;

        info!(pending = pending.len(), "Found pending treasury-assisted requests");

        let mut results = Vec::with_capacity(pending.len());

        for request in &pending {
            if self.cancelled.load(Ordering::SeqCst) {
                warn!(
                    remaining = pending.len() - results.len(),
                    "Run cancelled - not starting further requests"
                );
                break;
            }

            results.push(self.process_request(request).await);
        }

        // Cancellation is scoped to one run; the next run starts fresh
        self.cancelled.store(false, Ordering::SeqCst);

        Ok(BatchReport {
            success: true,
            processed: pending.len(),
            results,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Process a single request through burn, payout and status write.
    async fn process_request(&self, request: &RedemptionRequest) -> RequestOutcome {
        info!(request_id = request.id, amount = %request.amount, "Processing request");

        // Re-read state immediately before burning. This shrinks (but
        // cannot eliminate) the window where a concurrent run processes
        // the same id; a request that left PENDING must not burn twice.
        let current = match self
            .bounded(
                self.ledger.get_request(request.id),
                LedgerError::ProviderError("Request state read timed out".to_string()),
            )
            .await
        {
            Ok(current) => current,
            Err(e) => {
                // State unknown: do not burn, and do not risk overwriting
                // a terminal status with a compensating write.
                error!(request_id = request.id, error = %e, "Pre-burn state read failed");
                return Self::failed_outcome(request.id, None, e.to_string());
            }
        };

        if current.status != RedeemStatus::Pending {
            info!(
                request_id = request.id,
                status = current.status.as_str(),
                "Request no longer pending, skipping"
            );
            return Self::failed_outcome(
                request.id,
                None,
                format!("request no longer pending (status {})", current.status.as_str()),
            );
        }

        // 1. Burn from treasury custody
        let account_hash = crate::services::signature::hash_bank_account(
            request.bank_name.as_deref().unwrap_or(DEFAULT_BANK_NAME),
            request.bank_account.as_deref().unwrap_or(DEFAULT_BANK_ACCOUNT),
        );

        let burn_receipt = match self
            .bounded(
                self.ledger.burn(request.amount, &account_hash),
                LedgerError::WriteError("Burn timed out".to_string()),
            )
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                error!(request_id = request.id, error = %e, "Burn failed");
                let message = e.to_string();
                self.mark_failed(request.id, "", &message).await;
                return Self::failed_outcome(request.id, None, message);
            }
        };

        info!(request_id = request.id, tx_hash = %burn_receipt.tx_hash, "Tokens burned");

        // 2. Submit payout instruction, burn tx hash as proof
        let instruction = PayoutInstruction {
            tx_hash: burn_receipt.tx_hash.clone(),
            network_chain_id: self.network_chain_id.clone(),
            amount_transfer: request.amount.to_string(),
            bank_account: request.bank_account.clone().unwrap_or_default(),
            bank_code: request.bank_code.clone().unwrap_or_default(),
            bank_name: request.bank_name.clone().unwrap_or_default(),
            bank_account_name: request.bank_account_name.clone().unwrap_or_default(),
            wallet_address: request.user.clone(),
        };

        let payout = match timeout(self.call_timeout, self.payout.submit_payout(&instruction)).await
        {
            Ok(Ok(payout)) => payout,
            Ok(Err(e)) => {
                // The burn already happened. Keep the burn tx hash in both
                // the compensating write and the outcome so the
                // inconsistency stays attributable.
                error!(request_id = request.id, error = %e, "Payout submission failed after burn");
                let message = e.to_string();
                self.mark_failed(request.id, &burn_receipt.tx_hash, &message).await;
                return Self::failed_outcome(
                    request.id,
                    Some(burn_receipt.tx_hash),
                    message,
                );
            }
            Err(_) => {
                error!(request_id = request.id, "Payout submission timed out after burn");
                let message = "Payout submission timed out".to_string();
                self.mark_failed(request.id, &burn_receipt.tx_hash, &message).await;
                return Self::failed_outcome(
                    request.id,
                    Some(burn_receipt.tx_hash),
                    message,
                );
            }
        };

        info!(
            request_id = request.id,
            cust_ref_number = %payout.data.cust_ref_number,
            "Payout accepted"
        );

        // 3. Record completion on the ledger
        match self
            .bounded(
                self.ledger.update_status(
                    request.id,
                    RedeemStatus::Completed,
                    &burn_receipt.tx_hash,
                    &payout.data.cust_ref_number,
                ),
                LedgerError::WriteError("Completion status write timed out".to_string()),
            )
            .await
        {
            Ok(_) => {
                info!(request_id = request.id, "Request completed");
                RequestOutcome {
                    request_id: request.id.to_string(),
                    status: RedeemStatus::Completed.as_str().to_string(),
                    tx_hash: Some(burn_receipt.tx_hash),
                    error: None,
                }
            }
            Err(e) => {
                // Funds moved and the payout was accepted; only the ledger
                // record is missing. Reported, never swallowed.
                error!(
                    request_id = request.id,
                    error = %e,
                    "Completion status write failed - payout accepted but not recorded"
                );
                Self::failed_outcome(request.id, Some(burn_receipt.tx_hash), e.to_string())
            }
        }
    }

    /// Best-effort compensating status write. A secondary failure is
    /// logged and reported nowhere else - it must not escalate.
    async fn mark_failed(&self, id: u64, tx_hash_burn: &str, error_message: &str) {
        let result = self
            .bounded(
                self.ledger
                    .update_status(id, RedeemStatus::Failed, tx_hash_burn, error_message),
                LedgerError::WriteError("Failure status write timed out".to_string()),
            )
            .await;

        if let Err(e) = result {
            error!(request_id = id, error = %e, "Failed to record FAILED status");
        }
    }

    async fn bounded<T, F>(&self, fut: F, on_timeout: LedgerError) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>>,
    {
        match timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout),
        }
    }

    fn failed_outcome(id: u64, tx_hash: Option<String>, error: String) -> RequestOutcome {
        RequestOutcome {
            request_id: id.to_string(),
            status: RedeemStatus::Failed.as_str().to_string(),
            tx_hash,
            error: Some(error),
        }
    }
}
