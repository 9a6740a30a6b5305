//! Treasury bot trigger
//!
//! Authenticated, parameterless endpoint that runs one redemption batch.
//! The HTTP layer succeeds whenever the batch ran, even if individual
//! requests failed; hard failures are reserved for authorization and
//! batch-level errors.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use tracing::error;

use crate::models::redeem::{BatchReport, ErrorResponse};
use crate::AppState;

pub async fn run_treasury_bot(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BatchReport>, (StatusCode, Json<ErrorResponse>)> {
    // Verify the shared cron secret before touching the ledger or gateway
    let authorized = match (&state.config.cron_secret, headers.get(AUTHORIZATION)) {
        (Some(secret), Some(value)) => {
            value.to_str().ok() == Some(format!("Bearer {}", secret).as_str())
        }
        _ => false,
    };

    if !authorized {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized".to_string(),
            }),
        ));
    }

    let report = state.processor.run().await.map_err(|e| {
        error!(error = %e, "Treasury bot run failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(report))
}
