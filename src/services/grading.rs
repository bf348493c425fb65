use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::database::models::Enrollment;
use crate::database::CourseStore;

use super::error::{DomainError, DomainResult};
use super::ownership::ensure_teaches;

const SCORE_FIELD: &str = "evaluation_score";

pub struct GradingService {
    store: Arc<dyn CourseStore>,
}

impl GradingService {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    /// Record an evaluation score for an enrollment.
    ///
    /// The score is validated first, then the enrollment is resolved, then the
    /// actor must teach the enrollment's course. Nothing is written unless all
    /// three succeed.
    pub async fn grade(&self, actor: &AuthUser, enrollment_id: i32, raw_score: &Value) -> DomainResult<Enrollment> {
        let score = parse_score(raw_score)?;

        let enrollment = self
            .store
            .find_enrollment(enrollment_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Enrollment {} not found", enrollment_id)))?;

        ensure_teaches(self.store.as_ref(), actor, enrollment.course_id).await?;

        let graded = self.store.set_evaluation_score(enrollment_id, score).await?;
        info!(
            "Instructor {} graded enrollment {} in course {} with {}",
            actor.user_id, enrollment_id, graded.course_id, score
        );
        Ok(graded)
    }
}

/// Accept an integer in 0..=100, either as a JSON number or a numeric string
pub fn parse_score(raw: &Value) -> DomainResult<i32> {
    let score = match raw {
        // Integers beyond i64 are still integers, just out of range
        Value::Number(n) => n.as_i64().or_else(|| n.as_u64().map(|_| i64::MAX)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| DomainError::validation(SCORE_FIELD, "evaluation_score must be an integer"))?;

    if !(0..=100).contains(&score) {
        return Err(DomainError::validation(
            SCORE_FIELD,
            "evaluation_score must be between 0 and 100",
        ));
    }
    Ok(score as i32)
}
