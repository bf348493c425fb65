use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::database::models::{ContentRef, Enrollment, Progress};
use crate::database::CourseStore;

use super::error::{DomainError, DomainResult};

pub struct EnrollmentService {
    store: Arc<dyn CourseStore>,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    pub async fn enroll(&self, student: &AuthUser, course_id: i32) -> DomainResult<Enrollment> {
        let enrollment = self.store.enroll(student.user_id, course_id).await?;
        info!("Student {} enrolled in course {}", student.user_id, course_id);
        Ok(enrollment)
    }

    /// Mark a content item complete for the acting student's enrollment
    pub async fn complete_content(&self, student: &AuthUser, item: ContentRef) -> DomainResult<Progress> {
        let Some(enrollment) = self
            .store
            .find_enrollment_for(student.user_id, item.course_id)
            .await?
        else {
            warn!("Student {} is not enrolled in course {}", student.user_id, item.course_id);
            return Err(DomainError::forbidden("You are not enrolled in this course"));
        };

        Ok(self.store.record_progress(enrollment.enrollment_id, item).await?)
    }

    /// Completed content for the acting student's enrollment in `course_id`
    pub async fn progress(&self, student: &AuthUser, course_id: i32) -> DomainResult<Vec<Progress>> {
        let enrollment = self
            .store
            .find_enrollment_for(student.user_id, course_id)
            .await?
            .ok_or_else(|| DomainError::forbidden("You are not enrolled in this course"))?;

        Ok(self.store.list_progress(enrollment.enrollment_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ContentDraft, ModuleDraft};
    use crate::database::StoreError;
    use crate::testing::Fixture;
    use crate::types::ContentType;

    async fn seed_content(fx: &Fixture) -> ContentRef {
        fx.store
            .insert_module(fx.course_id, ModuleDraft { module_number: 1, name: "Intro".into(), duration_weeks: 1 })
            .await
            .unwrap();
        fx.store
            .insert_content(
                fx.course_id,
                1,
                ContentDraft { content_id: 1, title: "Welcome".into(), content_type: ContentType::Video, url: None },
            )
            .await
            .unwrap();
        ContentRef { course_id: fx.course_id, module_number: 1, content_id: 1 }
    }

    #[tokio::test]
    async fn enrolling_twice_conflicts() {
        let fx = Fixture::new().await;
        let svc = EnrollmentService::new(fx.store.clone());

        svc.enroll(&fx.student, fx.course_id).await.unwrap();
        let err = svc.enroll(&fx.student, fx.course_id).await.unwrap_err();
        assert!(matches!(err, DomainError::Store(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn completion_requires_enrollment() {
        let fx = Fixture::new().await;
        let item = seed_content(&fx).await;
        let svc = EnrollmentService::new(fx.store.clone());

        let err = svc.complete_content(&fx.student, item).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        svc.enroll(&fx.student, fx.course_id).await.unwrap();
        let progress = svc.complete_content(&fx.student, item).await.unwrap();
        assert_eq!(progress.content_id, 1);
    }
}
