// handlers/student/mod.rs - Student handlers
//
// Security Level: JWT + Student role
// Route Prefix: /student/*

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthUser;
use crate::database::models::{ContentRef, Enrollment, Progress};
use crate::handlers::utils::path_key;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /student/courses/:id/enroll - Enroll the caller; 409 if already enrolled
pub async fn enroll_post(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Enrollment> {
    let course_id = path_key(&params, "id", "course_id")?;
    let enrollment = state.enrollments().enroll(&actor, course_id).await?;
    Ok(ApiResponse::created(enrollment))
}

/// POST /student/courses/:id/modules/:num/content/:content_id/complete - Record completion
pub async fn complete_post(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Progress> {
    let item = ContentRef {
        course_id: path_key(&params, "id", "course_id")?,
        module_number: path_key(&params, "num", "module_number")?,
        content_id: path_key(&params, "content_id", "content_id")?,
    };
    let progress = state.enrollments().complete_content(&actor, item).await?;
    Ok(ApiResponse::created(progress))
}

/// GET /student/courses/:id/progress - Content the caller has completed
pub async fn progress_get(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Value> {
    let course_id = path_key(&params, "id", "course_id")?;
    let progress = state.enrollments().progress(&actor, course_id).await?;
    Ok(ApiResponse::success(json!({ "progress": progress })))
}
