// handlers/analytics/mod.rs - Reporting handlers
//
// Security Level: JWT + Analyst or Admin role
// Route Prefix: /analytics/*

use axum::extract::{Path, State};
use std::collections::HashMap;

use crate::database::models::CourseSummary;
use crate::handlers::utils::path_key;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /analytics/courses/:id/summary - Enrollment, grading and curriculum counters
pub async fn summary_get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<CourseSummary> {
    let course_id = path_key(&params, "id", "course_id")?;
    let summary = state.courses().summary(course_id).await?;
    Ok(ApiResponse::success(summary))
}
