use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::AuthUser;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Account row behind the bearer token, loaded fresh for this request
#[derive(Clone, Debug)]
pub struct ValidatedUser(pub User);

/// Middleware that checks the user from JWT claims still exists and still
/// holds the role the token was issued for
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Get AuthUser from JWT middleware
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user = state.store.find_user(auth_user.user_id).await?.ok_or_else(|| {
        tracing::warn!("User validation failed: user {} no longer exists", auth_user.user_id);
        ApiError::unauthorized("User account no longer exists")
    })?;

    if user.role != auth_user.role {
        tracing::warn!(
            "User validation failed: token role '{}' doesn't match account role '{}' for user {}",
            auth_user.role, user.role, user.user_id
        );
        return Err(ApiError::forbidden("User role mismatch"));
    }

    tracing::debug!("User validation successful: {} ({}) as {}", user.name, user.user_id, user.role);

    request.extensions_mut().insert(ValidatedUser(user));

    Ok(next.run(request).await)
}
