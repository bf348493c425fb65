use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::models::{ContentItem, ContentPatch, ContentRef, NewContent};
use crate::error::ApiError;
use crate::handlers::utils::{json_body, path_key};
use crate::middleware::{ApiResponse, ApiResult, OwnedCourse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SwapContentRequest {
    #[serde(rename = "contentId1")]
    pub content_id1: i64,
    #[serde(rename = "contentId2")]
    pub content_id2: i64,
}

fn content_ref(course_id: i32, params: &HashMap<String, String>) -> Result<ContentRef, ApiError> {
    Ok(ContentRef {
        course_id,
        module_number: path_key(params, "num", "module_number")?,
        content_id: path_key(params, "content_id", "content_id")?,
    })
}

/// GET /instructor/courses/:id/modules/:num/content - Content ordered by content_id
pub async fn content_get(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Value> {
    let module_number = path_key(&params, "num", "module_number")?;
    let content = state.curriculum().list_content(course_id, module_number).await?;
    Ok(ApiResponse::success(json!({ "content": content })))
}

/// POST /instructor/courses/:id/modules/:num/content - Add a content item
pub async fn content_post(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    Path(params): Path<HashMap<String, String>>,
    payload: Result<Json<NewContent>, JsonRejection>,
) -> ApiResult<ContentItem> {
    let module_number = path_key(&params, "num", "module_number")?;
    let body = json_body(payload)?;
    let item = state.curriculum().create_content(course_id, module_number, body).await?;
    Ok(ApiResponse::created(item))
}

/// PUT /instructor/courses/:id/modules/:num/content/:content_id - Partial update;
/// `"url": null` clears the url
pub async fn content_put(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    Path(params): Path<HashMap<String, String>>,
    payload: Result<Json<ContentPatch>, JsonRejection>,
) -> ApiResult<ContentItem> {
    let item = content_ref(course_id, &params)?;
    let body = json_body(payload)?;
    let updated = state.curriculum().update_content(item, body).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /instructor/courses/:id/modules/:num/content/:content_id
///
/// 409 when the item has recorded student progress.
pub async fn content_delete(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<()> {
    let item = content_ref(course_id, &params)?;
    state.curriculum().delete_content(item).await?;
    Ok(ApiResponse::no_content())
}

/**
 * POST /instructor/courses/:id/modules/:num/content/swap - Exchange two items' positions
 *
 * Expected Input:
 * ```json
 * { "contentId1": 3, "contentId2": 5 }
 * ```
 *
 * Content ids never change, so student progress keeps pointing at the same
 * identity; title, content_type and url trade places. Returns
 * `{ "content": [...] }` ordered by content_id.
 */
pub async fn content_swap(
    State(state): State<AppState>,
    Extension(OwnedCourse(course_id)): Extension<OwnedCourse>,
    Path(params): Path<HashMap<String, String>>,
    payload: Result<Json<SwapContentRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let module_number = path_key(&params, "num", "module_number")?;
    let body = json_body(payload)?;
    let content = state
        .curriculum()
        .swap_content(course_id, module_number, body.content_id1, body.content_id2)
        .await?;
    Ok(ApiResponse::success(json!({ "content": content })))
}
