use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redemption_backend::config::{Config, PayoutMode};
use redemption_backend::services::ledger::{Ledger, LedgerService};
use redemption_backend::services::payout::{PayoutApiClient, PayoutGateway};
use redemption_backend::services::payout_mock::MockPayoutGateway;
use redemption_backend::services::redemption::RedemptionProcessor;
use redemption_backend::{handlers, jobs, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,redemption_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env());

    // Connect to the ledger
    tracing::info!("Connecting to ledger RPC...");
    let ledger: Arc<dyn Ledger> = Arc::new(
        LedgerService::new(
            &config.rpc_url,
            &config.registry_address,
            &config.token_address,
            config.treasury_private_key.as_deref(),
        )
        .await
        .expect("Failed to initialize ledger client"),
    );

    // Select the payout gateway implementation by configuration
    let payout: Arc<dyn PayoutGateway> = match config.payout_mode {
        PayoutMode::Demo => {
            tracing::info!("Payout gateway: DEMO mode - mock responses");
            Arc::new(MockPayoutGateway::new(
                config.demo_processing_delay_ms,
                config.demo_success_rate,
            ))
        }
        PayoutMode::Production => {
            tracing::info!("Payout gateway: PRODUCTION mode - real API calls");
            Arc::new(PayoutApiClient::new(
                config.payout_api_url.clone(),
                config.payout_api_key.clone(),
                config.payout_secret_key.clone(),
            ))
        }
    };

    let processor = Arc::new(RedemptionProcessor::new(
        ledger.clone(),
        payout.clone(),
        config.network_chain_id.clone(),
        Duration::from_secs(config.call_timeout_secs),
    ));

    // Optional in-process schedule; the HTTP trigger works either way
    if let Some(interval_secs) = config.treasury_bot_interval_secs {
        jobs::treasury_bot_sync::start_treasury_bot_job(processor.clone(), interval_secs);
    }

    let state = AppState {
        config: config.clone(),
        ledger,
        payout,
        processor,
    };

    // Build router
    let app = Router::new()
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
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
