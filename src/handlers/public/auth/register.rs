// handlers/public/auth/register.rs - POST /auth/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::database::models::User;
use crate::handlers::utils::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/**
 * POST /auth/register - Register a new student account
 *
 * Self-registration always yields the Student role; other roles are created
 * by an admin through POST /admin/users.
 *
 * Errors: 400 invalid input, 409 email already registered
 */
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<User> {
    let body = json_body(payload)?;
    let user = state
        .accounts()
        .register_student(&body.name, &body.email, &body.password)
        .await?;

    Ok(ApiResponse::created(user))
}
