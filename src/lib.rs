// src/lib.rs

use std::sync::Arc;

use config::Config;
use services::ledger::Ledger;
use services::payout::PayoutGateway;
use services::redemption::RedemptionProcessor;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<dyn Ledger>,
    pub payout: Arc<dyn PayoutGateway>,
    pub processor: Arc<RedemptionProcessor>,
}

pub mod config;
pub mod validation;

pub mod services {
    pub mod ledger;
    pub mod payout;
    pub mod payout_mock;
    pub mod redemption;
    pub mod signature;
}

pub mod jobs {
    pub mod treasury_bot_sync;
}

pub mod models;
pub mod handlers;
