use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /instructor/courses - Courses the caller is assigned to teach
pub async fn courses_get(State(state): State<AppState>, Extension(actor): Extension<AuthUser>) -> ApiResult<Value> {
    let courses = state.courses().courses_taught_by(&actor).await?;
    Ok(ApiResponse::success(json!({ "courses": courses })))
}
