//! Scan submission API endpoint.
//!
//! The barcode scanner (or the manual-entry form) posts an enrollment
//! number here. The decision engine records an ENTRY or EXIT, or silently
//! ignores the scan when the cooldown window has not elapsed. An ignored
//! scan is a soft success, not an error; the scanning client shows a
//! neutral state and lets the student rescan later.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use gatelog_core::{ScanOutcome, ScanPayload};

use crate::api::error::ApiResult;
use crate::state::SharedState;

/// Creates the scan router.
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(submit_scan))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a scan submission.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "enrollment_number": "EN2023001"
}))]
pub struct ScanRequest {
    /// The scanned or hand-typed enrollment number.
    #[serde(default)]
    #[schema(example = "EN2023001")]
    pub enrollment_number: Option<String>,
}

/// Response for a scan submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "ignored": false,
    "message": "ENTRY Recorded",
    "data": {
        "student": {
            "name": "Priya Sharma",
            "enrollment_number": "EN2023001",
            "department": "Computer Science",
            "semester": 5
        },
        "action": "ENTRY",
        "id": "0194fdc2-fa2f-4cc0-81d3-ff12045b73c8",
        "timestamp": 1735689600000_i64
    }
}))]
pub struct ScanResponse {
    /// Always `true`; failures are reported through the error body instead.
    pub success: bool,

    /// Whether the scan was suppressed by the cooldown.
    pub ignored: bool,

    /// Human-readable outcome summary.
    #[schema(example = "ENTRY Recorded")]
    pub message: String,

    /// The recorded event, absent for ignored scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ScanPayload>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Submit one scanned enrollment number.
///
/// Records an ENTRY or EXIT for the student, enforcing the cooldown window
/// and the entry/exit toggle, and pushes the accepted event to all live
/// observers.
#[utoipa::path(
    post,
    path = "/scan",
    tag = "scan",
    operation_id = "submitScan",
    summary = "Submit a scan",
    description = "Records an ENTRY or EXIT event for the scanned enrollment \
        number. A scan arriving within the cooldown window of the student's \
        previous event is silently ignored and reported as a soft success.",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan recorded or ignored", body = ScanResponse),
        (status = 400, description = "Missing enrollment number"),
        (status = 404, description = "Unknown enrollment number"),
        (status = 500, description = "Event could not be persisted")
    )
)]
pub async fn submit_scan(
    State(state): State<SharedState>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanResponse>> {
    let raw = request.enrollment_number.unwrap_or_default();
    let outcome = state.engine().submit_scan(&raw).await?;

    let response = match outcome {
        ScanOutcome::Ignored => ScanResponse {
            success: true,
            ignored: true,
            message: "Ignored (Cooldown)".to_string(),
            data: None,
        },
        ScanOutcome::Accepted { action, event } => ScanResponse {
            success: true,
            ignored: false,
            message: format!("{} Recorded", action.as_str()),
            data: Some(ScanPayload::from(&event)),
        },
    };

    Ok(Json(response))
}
