use tracing::warn;

use crate::auth::AuthUser;
use crate::database::CourseStore;
use crate::types::Role;

use super::error::{DomainError, DomainResult};

const NOT_YOUR_COURSE: &str = "You are not assigned to teach this course";

/// Ownership gate: the actor must be an instructor with a current teaching
/// assignment for `course_id`.
///
/// Read-only and evaluated against the store on every call; assignments can
/// change between requests. A missing course and a course taught by someone
/// else produce the same Forbidden error.
pub async fn ensure_teaches(store: &dyn CourseStore, actor: &AuthUser, course_id: i32) -> DomainResult<()> {
    match actor.role {
        Role::Instructor => {}
        Role::Student | Role::Admin | Role::Analyst => {
            warn!("Ownership check refused for {} user {}", actor.role, actor.user_id);
            return Err(DomainError::forbidden(NOT_YOUR_COURSE));
        }
    }

    if !store.teaches(actor.user_id, course_id).await? {
        warn!("Instructor {} attempted to modify course {} without an assignment", actor.user_id, course_id);
        return Err(DomainError::forbidden(NOT_YOUR_COURSE));
    }

    Ok(())
}
