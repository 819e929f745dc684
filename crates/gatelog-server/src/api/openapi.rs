//! OpenAPI specification generation for the gatelog API.
//!
//! The spec is served at `/api/openapi.json` and consumed by the admin
//! dashboard and the mobile scanning client for client generation.

use axum::Json;
use utoipa::OpenApi;

use gatelog_core::{LogEvent, ScanAction, ScanNotice, ScanPayload, Student, StudentSummary};

use super::error::ErrorResponse;
use super::health::HealthResponse;
use super::logs::{ClearLogsResponse, LogsData, LogsResponse, Pagination};
use super::scan::{ScanRequest, ScanResponse};
use super::students::StudentResponse;

/// Serve the OpenAPI specification as JSON.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Main OpenAPI document structure for gatelog.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "gatelog API",
        version = "0.1.0",
        description = r#"
# gatelog API

Campus library entry/exit tracking.

## Overview

1. **Scan submission**: a barcode scanner or manual form posts an enrollment
   number; the server records an ENTRY or EXIT, toggling per student, with a
   cooldown window absorbing duplicate reads from a single physical scan.
2. **Live updates**: every accepted scan is pushed to connected WebSocket
   observers at `/api/ws` as topic-tagged JSON (`new-scan`, `scan-status`).
3. **Reporting**: the admin dashboard lists, clears, and exports the log.

Ignored (cooldown) scans are a soft success, never an error.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local gatelog server")
    ),
    tags(
        (
            name = "system",
            description = "Health checks"
        ),
        (
            name = "scan",
            description = "Scan submission - the entry/exit decision engine"
        ),
        (
            name = "students",
            description = "Student roster lookups"
        ),
        (
            name = "library",
            description = "Log listing, clearing, and CSV export"
        )
    ),
    paths(
        // Health endpoints
        super::health::health_check,
        // Scan endpoints
        super::scan::submit_scan,
        // Student endpoints
        super::students::get_student,
        // Library reporting endpoints
        super::logs::list_logs,
        super::logs::clear_logs,
        super::logs::export_logs,
    ),
    components(
        schemas(
            // Error types
            ErrorResponse,
            // Health types
            HealthResponse,
            // Scan types
            ScanRequest,
            ScanResponse,
            ScanAction,
            ScanPayload,
            ScanNotice,
            StudentSummary,
            // Student types
            Student,
            StudentResponse,
            // Reporting types
            LogEvent,
            LogsResponse,
            LogsData,
            Pagination,
            ClearLogsResponse,
        )
    )
)]
pub struct ApiDoc;
