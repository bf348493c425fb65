// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::utils::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/**
 * POST /auth/login - Authenticate user and receive JWT token
 *
 * Expected Input:
 * ```json
 * { "email": "string", "password": "string" }
 * ```
 *
 * Expected Output:
 * ```json
 * { "token": "eyJhbGciOiJIUzI1NiI...", "user": { ... }, "expires_in": 86400 }
 * ```
 *
 * Unknown email and wrong password both answer 401 with the same message.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let body = json_body(payload)?;
    let session = state.accounts().login(&body.email, &body.password).await?;

    Ok(ApiResponse::success(json!({
        "token": session.token.token,
        "user": session.user,
        "expires_in": session.token.expires_in,
    })))
}
