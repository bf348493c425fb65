use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::models::{Module, ModulePatch, NewModule};
use crate::handlers::utils::{json_body, path_key};
use crate::middleware::{ApiResponse, ApiResult, OwnedCourse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SwapModulesRequest {
    pub num1: i64,
    pub num2: i64,
}

/// GET /instructor/courses/:id/modules - Modules ordered by module_number
pub async fn modules_get(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
) -> ApiResult<Value> {
    let modules = state.curriculum().list_modules(course_id).await?;
    Ok(ApiResponse::success(json!({ "modules": modules })))
}

/// POST /instructor/courses/:id/modules - Create a module
pub async fn modules_post(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    payload: Result<Json<NewModule>, JsonRejection>,
) -> ApiResult<Module> {
    let body = json_body(payload)?;
    let module = state.curriculum().create_module(course_id, body).await?;
    Ok(ApiResponse::created(module))
}

/// PUT /instructor/courses/:id/modules/:num - Partial update of name and duration
pub async fn module_put(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    Path(params): Path<HashMap<String, String>>,
    payload: Result<Json<ModulePatch>, JsonRejection>,
) -> ApiResult<Module> {
    let module_number = path_key(&params, "num", "module_number")?;
    let body = json_body(payload)?;
    let module = state.curriculum().update_module(course_id, module_number, body).await?;
    Ok(ApiResponse::success(module))
}

/// DELETE /instructor/courses/:id/modules/:num - Delete a module and its content
///
/// 409 when any of its content has recorded student progress.
pub async fn module_delete(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<()> {
    let module_number = path_key(&params, "num", "module_number")?;
    state.curriculum().delete_module(course_id, module_number).await?;
    Ok(ApiResponse::no_content())
}

/**
 * POST /instructor/courses/:id/modules/swap - Exchange two modules' positions
 *
 * Expected Input:
 * ```json
 * { "num1": 1, "num2": 2 }
 * ```
 *
 * Module numbers stay where they are; name and duration_weeks trade places in
 * one transaction. Returns the full list, ordered by module_number:
 * ```json
 * { "modules": [ { "course_id": 7, "module_number": 1, "name": "Advanced", "duration_weeks": 4 }, ... ] }
 * ```
 *
 * Errors: 400 invalid or equal numbers, 403 not your course, 404 either module missing
 */
pub async fn modules_swap(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    payload: Result<Json<SwapModulesRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let body = json_body(payload)?;
    let modules = state
        .curriculum()
        .swap_modules(course_id, body.num1, body.num2)
        .await?;
    Ok(ApiResponse::success(json!({ "modules": modules })))
}
