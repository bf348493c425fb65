use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{ensure_teaches, validate::parse_key};
use crate::state::AppState;

/// Course id that passed the ownership gate for this request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnedCourse(pub i32);

/// Ownership gate for `/instructor/courses/:id/...` routes.
///
/// Runs after JWT authentication; handlers behind it read the checked course
/// id from the `OwnedCourse` extension instead of re-parsing the path.
pub async fn course_ownership_middleware(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let raw = params
        .get("id")
        .ok_or_else(|| ApiError::validation_error("Missing course id", None))?;
    let course_id = parse_key("course_id", raw)?;

    ensure_teaches(state.store.as_ref(), &actor, course_id).await?;

    request.extensions_mut().insert(OwnedCourse(course_id));

    Ok(next.run(request).await)
}
