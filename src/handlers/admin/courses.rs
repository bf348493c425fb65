use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::models::{Course, NewCourse};
use crate::handlers::utils::{json_body, path_key};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::validate::positive_key;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignInstructorRequest {
    pub instructor_id: i64,
}

/// POST /admin/courses - Create a course
pub async fn course_post(
    State(state): State<AppState>,
    payload: Result<Json<NewCourse>, JsonRejection>,
) -> ApiResult<Course> {
    let body = json_body(payload)?;
    let course = state.courses().create_course(body).await?;
    Ok(ApiResponse::created(course))
}

/// POST /admin/courses/:id/instructors - Assign an instructor to teach a course
pub async fn instructor_post(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    payload: Result<Json<AssignInstructorRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let course_id = path_key(&params, "id", "course_id")?;
    let body = json_body(payload)?;
    let instructor_id = positive_key("instructor_id", body.instructor_id)?;

    state.courses().assign_instructor(course_id, instructor_id).await?;

    Ok(ApiResponse::created(json!({
        "course_id": course_id,
        "instructor_id": instructor_id,
    })))
}

/// DELETE /admin/courses/:id/instructors/:instructor_id - Revoke a teaching assignment
pub async fn instructor_delete(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<()> {
    let course_id = path_key(&params, "id", "course_id")?;
    let instructor_id = path_key(&params, "instructor_id", "instructor_id")?;

    state.courses().unassign_instructor(course_id, instructor_id).await?;

    Ok(ApiResponse::no_content())
}
