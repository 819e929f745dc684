//! Log reporting API endpoints.
//!
//! The admin dashboard lists, clears, and exports the event log through
//! these endpoints. All of them are read-side collaborators of the scan
//! engine: the engine is the only writer, the bulk clear is the only
//! destructive operation.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use gatelog_core::{export_csv, LogEvent, LogFilter, ScanAction};

use crate::api::error::{ApiError, ApiResult};
use crate::state::SharedState;

/// Default page size for log listing.
const DEFAULT_PAGE_SIZE: usize = 50;

/// Creates the library logs router.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/logs", get(list_logs).delete(clear_logs))
        .route("/logs/export", get(export_logs))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for log listing and export.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LogsQuery {
    /// Inclusive lower bound on event timestamp (milliseconds since epoch).
    pub start: Option<i64>,

    /// Inclusive upper bound on event timestamp (milliseconds since epoch).
    pub end: Option<i64>,

    /// Restrict to one enrollment number (any case).
    #[param(example = "EN2023001")]
    pub enrollment_number: Option<String>,

    /// Restrict to one action: `ENTRY` or `EXIT`.
    #[param(example = "ENTRY")]
    pub action: Option<String>,

    /// 1-based page number (listing only).
    #[param(example = 1)]
    pub page: Option<usize>,

    /// Page size (listing only).
    #[param(example = 50)]
    pub limit: Option<usize>,
}

impl LogsQuery {
    fn filter(&self) -> Result<LogFilter, ApiError> {
        let action = match self.action.as_deref() {
            None => None,
            Some(raw) => match raw.to_uppercase().as_str() {
                "ENTRY" => Some(ScanAction::Entry),
                "EXIT" => Some(ScanAction::Exit),
                other => {
                    return Err(ApiError::BadRequest {
                        error_code: "INVALID_ACTION".to_string(),
                        message: format!("Invalid action '{other}', expected ENTRY or EXIT"),
                    })
                }
            },
        };
        Ok(LogFilter {
            start: self.start,
            end: self.end,
            enrollment_number: self.enrollment_number.clone(),
            action,
        }
        .normalized())
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    /// 1-based page number returned.
    #[schema(example = 1)]
    pub current_page: usize,

    /// Total pages available for this filter.
    #[schema(example = 4)]
    pub total_pages: usize,

    /// Total events matching the filter.
    #[schema(example = 172)]
    pub total_logs: usize,

    /// Page size used.
    #[schema(example = 50)]
    pub logs_per_page: usize,
}

/// Log listing payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogsData {
    /// Matching events, newest first.
    pub logs: Vec<LogEvent>,

    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Log listing response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogsResponse {
    /// Always `true`.
    pub success: bool,

    /// Listing payload.
    pub data: LogsData,
}

/// Bulk clear response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearLogsResponse {
    /// Always `true`.
    pub success: bool,

    /// Confirmation message.
    #[schema(example = "All logs cleared successfully")]
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// List log events with filters and pagination.
#[utoipa::path(
    get,
    path = "/library/logs",
    tag = "library",
    operation_id = "listLogs",
    summary = "List log events",
    description = "Returns log events newest first, filtered by time window, \
        enrollment number, and action, in pages of up to `limit` events.",
    params(LogsQuery),
    responses(
        (status = 200, description = "Logs retrieved", body = LogsResponse),
        (status = 400, description = "Invalid action filter")
    )
)]
pub async fn list_logs(
    State(state): State<SharedState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<LogsResponse>> {
    let filter = query.filter()?;
    let page = state.event_log().list(
        &filter,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    );

    Ok(Json(LogsResponse {
        success: true,
        data: LogsData {
            logs: page.logs,
            pagination: Pagination {
                current_page: page.current_page,
                total_pages: page.total_pages,
                total_logs: page.total_logs,
                logs_per_page: page.logs_per_page,
            },
        },
    }))
}

/// Clear the entire event log.
#[utoipa::path(
    delete,
    path = "/library/logs",
    tag = "library",
    operation_id = "clearLogs",
    summary = "Clear all log events",
    responses(
        (status = 200, description = "Logs cleared", body = ClearLogsResponse),
        (status = 500, description = "Store could not be cleared")
    )
)]
pub async fn clear_logs(State(state): State<SharedState>) -> ApiResult<Json<ClearLogsResponse>> {
    state.event_log().clear()?;
    tracing::info!("event log cleared");

    Ok(Json(ClearLogsResponse {
        success: true,
        message: "All logs cleared successfully".to_string(),
    }))
}

/// Export log events as CSV.
///
/// Applies the same filters as the listing endpoint (without pagination)
/// and renders entry/exit pairs as visit rows, one per completed or active
/// visit.
#[utoipa::path(
    get,
    path = "/library/logs/export",
    tag = "library",
    operation_id = "exportLogs",
    summary = "Export log events as CSV",
    params(LogsQuery),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv"),
        (status = 400, description = "Invalid action filter")
    )
)]
pub async fn export_logs(
    State(state): State<SharedState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.filter()?;
    let events = state.event_log().query(&filter);
    let csv = export_csv(&events)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"library_logs.csv\"",
            ),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{sample_student, test_state};
    use crate::state::AppState;
    use gatelog_core::now_millis;

    fn seeded_state() -> (tempfile::TempDir, AppState) {
        let (dir, state) = test_state(vec![sample_student()]);
        // One completed visit, backdated far enough apart to dodge the
        // cooldown when seeded through the store directly.
        let s = state.roster().find_by_enrollment_number("EN2023001").unwrap().clone();
        let now = now_millis();
        state
            .event_log()
            .append(LogEvent::new(&s, ScanAction::Entry, now - 120_000))
            .unwrap();
        state
            .event_log()
            .append(LogEvent::new(&s, ScanAction::Exit, now - 60_000))
            .unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn test_list_returns_newest_first() {
        let (_dir, state) = seeded_state();

        let Json(response) = list_logs(State(state), Query(LogsQuery::default()))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.data.logs.len(), 2);
        assert_eq!(response.data.logs[0].action, ScanAction::Exit);
        assert_eq!(response.data.pagination.total_logs, 2);
        assert_eq!(response.data.pagination.logs_per_page, DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_list_filters_by_action() {
        let (_dir, state) = seeded_state();

        let query = LogsQuery {
            action: Some("entry".to_string()),
            ..LogsQuery::default()
        };
        let Json(response) = list_logs(State(state), Query(query)).await.unwrap();
        assert_eq!(response.data.logs.len(), 1);
        assert_eq!(response.data.logs[0].action, ScanAction::Entry);
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_action() {
        let (_dir, state) = seeded_state();

        let query = LogsQuery {
            action: Some("SIDEWAYS".to_string()),
            ..LogsQuery::default()
        };
        let err = list_logs(State(state), Query(query)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_clear_empties_the_log() {
        let (_dir, state) = seeded_state();

        let Json(response) = clear_logs(State(state.clone())).await.unwrap();
        assert!(response.success);
        assert!(state.event_log().is_empty());
    }

    #[tokio::test]
    async fn test_export_produces_csv_attachment() {
        let (_dir, state) = seeded_state();

        let response = export_logs(State(state), Query(LogsQuery::default()))
            .await
            .unwrap()
            .into_response();

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv"
        );
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("library_logs.csv"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("Enrollment,Student Name"));
        assert!(text.contains("\"EN2023001\""));
        assert!(text.contains("\"0h 1m\""));
    }
}
