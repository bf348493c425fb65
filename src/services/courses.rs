use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::database::models::{Course, CourseSummary, NewCourse};
use crate::database::CourseStore;
use crate::types::Role;

use super::error::{DomainError, DomainResult};
use super::validate::required_text;

/// Course catalog, teaching assignments and the analytics roll-up
pub struct CourseService {
    store: Arc<dyn CourseStore>,
}

impl CourseService {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    pub async fn create_course(&self, input: NewCourse) -> DomainResult<Course> {
        let course = self
            .store
            .insert_course(NewCourse {
                course_name: required_text("course_name", &input.course_name)?,
                description: input
                    .description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
            })
            .await?;
        info!("Created course {} ({})", course.course_id, course.course_name);
        Ok(course)
    }

    /// Assign a user to teach a course. The user must hold the instructor role.
    pub async fn assign_instructor(&self, course_id: i32, instructor_id: i32) -> DomainResult<()> {
        let user = self
            .store
            .find_user(instructor_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", instructor_id)))?;
        if user.role != Role::Instructor {
            return Err(DomainError::validation(
                "instructor_id",
                format!("User {} is not an instructor", instructor_id),
            ));
        }

        self.store.assign_instructor(course_id, instructor_id).await?;
        info!("Assigned instructor {} to course {}", instructor_id, course_id);
        Ok(())
    }

    pub async fn unassign_instructor(&self, course_id: i32, instructor_id: i32) -> DomainResult<()> {
        self.store.unassign_instructor(course_id, instructor_id).await?;
        info!("Removed instructor {} from course {}", instructor_id, course_id);
        Ok(())
    }

    pub async fn courses_taught_by(&self, instructor: &AuthUser) -> DomainResult<Vec<Course>> {
        Ok(self.store.courses_taught_by(instructor.user_id).await?)
    }

    pub async fn summary(&self, course_id: i32) -> DomainResult<CourseSummary> {
        if self.store.find_course(course_id).await?.is_none() {
            return Err(DomainError::not_found(format!("Course {} not found", course_id)));
        }
        Ok(self.store.course_summary(course_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::StoreError;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn only_instructors_can_be_assigned() {
        let fx = Fixture::new().await;
        let svc = CourseService::new(fx.store.clone());

        let err = svc.assign_instructor(fx.course_id, fx.student.user_id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: Some("instructor_id"), .. }));

        let missing = svc.assign_instructor(fx.course_id, 999).await.unwrap_err();
        assert!(matches!(missing, DomainError::Store(StoreError::NotFound(_))));

        svc.assign_instructor(fx.course_id, fx.other_instructor.user_id).await.unwrap();
        assert!(fx.store.teaches(fx.other_instructor.user_id, fx.course_id).await.unwrap());

        let again = svc
            .assign_instructor(fx.course_id, fx.other_instructor.user_id)
            .await
            .unwrap_err();
        assert!(matches!(again, DomainError::Store(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn taught_courses_follow_assignments() {
        let fx = Fixture::new().await;
        let svc = CourseService::new(fx.store.clone());

        let created = svc
            .create_course(NewCourse { course_name: " Compilers ".into(), description: Some("  ".into()) })
            .await
            .unwrap();
        assert_eq!(created.course_name, "Compilers");
        assert_eq!(created.description, None);

        assert_eq!(svc.courses_taught_by(&fx.instructor).await.unwrap().len(), 1);
        assert!(svc.courses_taught_by(&fx.other_instructor).await.unwrap().is_empty());

        svc.unassign_instructor(fx.course_id, fx.instructor.user_id).await.unwrap();
        assert!(svc.courses_taught_by(&fx.instructor).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_requires_existing_course() {
        let fx = Fixture::new().await;
        let svc = CourseService::new(fx.store.clone());
        fx.store.enroll(fx.student.user_id, fx.course_id).await.unwrap();

        let summary = svc.summary(fx.course_id).await.unwrap();
        assert_eq!(summary.enrollments, 1);
        assert_eq!(summary.average_score, None);

        let err = svc.summary(404).await.unwrap_err();
        assert!(matches!(err, DomainError::Store(StoreError::NotFound(_))));
    }
}
