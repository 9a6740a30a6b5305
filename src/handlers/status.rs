//! Request status lookup for external collaborators

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::DateTime;
use tracing::error;

use crate::models::redeem::{ErrorResponse, RequestStatusData, RequestStatusResponse};
use crate::services::ledger::LedgerError;
use crate::AppState;

pub async fn get_request_status(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<RequestStatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let id: u64 = request_id.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid request id".to_string(),
            }),
        )
    })?;

    let request = state.ledger.get_request(id).await.map_err(|e| match e {
        LedgerError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        ),
        _ => {
            error!(request_id = id, error = %e, "Status lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        }
    })?;

    let created_at = i64::try_from(request.timestamp)
        .ok()
        .and_then(|t| DateTime::from_timestamp(t, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    Ok(Json(RequestStatusResponse {
        success: true,
        data: RequestStatusData {
            request_id,
            user: request.user,
            amount: request.amount.to_string(),
            status: request.status.as_str().to_string(),
            mode: request.mode.as_str().to_string(),
            tx_hash_burn: request.tx_hash_burn,
            tx_hash_redeem: request.tx_hash_redeem,
            timestamp: request.timestamp,
            created_at,
        },
    }))
}
