use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::types::Role;

fn actor(request: &Request) -> Result<&AuthUser, ApiError> {
    request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

fn require(request: &Request, allowed: impl Fn(Role) -> bool, area: &str) -> Result<(), ApiError> {
    let user = actor(request)?;
    if allowed(user.role) {
        Ok(())
    } else {
        tracing::warn!("User {} with role {} denied access to {} routes", user.user_id, user.role, area);
        Err(ApiError::forbidden(format!("{} access required", area)))
    }
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require(&request, |role| role == Role::Admin, "Admin")?;
    Ok(next.run(request).await)
}

pub async fn require_instructor(request: Request, next: Next) -> Result<Response, ApiError> {
    require(&request, |role| role == Role::Instructor, "Instructor")?;
    Ok(next.run(request).await)
}

pub async fn require_student(request: Request, next: Next) -> Result<Response, ApiError> {
    require(&request, |role| role == Role::Student, "Student")?;
    Ok(next.run(request).await)
}

pub async fn require_analytics(request: Request, next: Next) -> Result<Response, ApiError> {
    require(&request, |role| role.can_view_analytics(), "Analytics")?;
    Ok(next.run(request).await)
}
