//! Student lookup API endpoint.
//!
//! Used by the scanning client to preview who a barcode belongs to before
//! (or after) submitting a scan.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use gatelog_core::{normalize_enrollment_number, GatelogError, Student};

use crate::api::error::ApiResult;
use crate::state::SharedState;

/// Creates the students router.
pub fn router() -> Router<SharedState> {
    Router::new().route("/{enrollment}", get(get_student))
}

/// Student lookup response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    /// Always `true` on a successful lookup.
    pub success: bool,

    /// The matching student record.
    pub data: Student,
}

/// Look up a student by enrollment number.
///
/// The identifier is normalized (trimmed, uppercased) before lookup, so the
/// raw output of a barcode reader is accepted as-is.
#[utoipa::path(
    get,
    path = "/students/{enrollment}",
    tag = "students",
    operation_id = "getStudent",
    summary = "Look up a student",
    params(
        ("enrollment" = String, Path, description = "Enrollment number, any case")
    ),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Unknown enrollment number")
    )
)]
pub async fn get_student(
    State(state): State<SharedState>,
    Path(enrollment): Path<String>,
) -> ApiResult<Json<StudentResponse>> {
    let normalized = normalize_enrollment_number(&enrollment);
    let student = state
        .roster()
        .find_by_enrollment_number(&normalized)
        .cloned()
        .ok_or_else(|| GatelogError::StudentNotFound(normalized))?;

    Ok(Json(StudentResponse {
        success: true,
        data: student,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::state::testing::{sample_student, test_state};

    #[tokio::test]
    async fn test_lookup_normalizes_identifier() {
        let (_dir, state) = test_state(vec![sample_student()]);

        let Json(response) = get_student(State(state), Path(" en2023001 ".to_string()))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.data.enrollment_number, "EN2023001");
    }

    #[tokio::test]
    async fn test_lookup_unknown_student() {
        let (_dir, state) = test_state(vec![sample_student()]);

        let err = get_student(State(state), Path("ZZZ999".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
