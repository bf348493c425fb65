use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthUser;
use crate::handlers::utils::{json_body, path_key};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    /// Integer or integer string; checked by the grading service
    #[serde(default)]
    pub evaluation_score: Value,
}

/**
 * PUT /instructor/enrollments/:id/grade - Record an evaluation score
 *
 * Expected Input:
 * ```json
 * { "evaluation_score": 85 }
 * ```
 *
 * Only an instructor assigned to the enrollment's course may grade it.
 *
 * Errors: 400 score not an integer in 0-100, 403 not your course, 404 no such enrollment
 */
pub async fn grade_put(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(params): Path<HashMap<String, String>>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let enrollment_id = path_key(&params, "id", "enrollment_id")?;
    let body = json_body(payload)?;
    let enrollment = state
        .grading()
        .grade(&actor, enrollment_id, &body.evaluation_score)
        .await?;

    Ok(ApiResponse::success(json!({
        "message": "Grade updated successfully",
        "evaluation_score": enrollment.evaluation_score,
    })))
}
