use axum::Extension;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, ValidatedUser};

/// GET /api/auth/whoami - Current authenticated user, loaded fresh from the store
pub async fn whoami_get(Extension(ValidatedUser(user)): Extension<ValidatedUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}
