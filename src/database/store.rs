use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    ContentChanges, ContentDraft, ContentItem, ContentRef, Course, CourseSummary, Enrollment,
    Module, ModuleChanges, ModuleDraft, NewCourse, NewUser, Progress, User,
};

/// Message surfaced when a delete is blocked by completion records
pub const PROGRESS_CONFLICT: &str =
    "this item has recorded student progress and cannot be removed";

/// Errors from a `CourseStore`
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate key or referential-integrity violation
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence seam for the course platform.
///
/// Every method is a single autonomous operation except the two swaps, which
/// exchange the payload of two rows inside one transaction and then return the
/// refreshed, ordered collection. Implementations: `PgCourseStore` (PostgreSQL)
/// and `MemoryCourseStore` (tests and local runs).
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    // Users
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    // Courses and teaching assignments
    async fn insert_course(&self, course: NewCourse) -> StoreResult<Course>;
    async fn find_course(&self, course_id: i32) -> StoreResult<Option<Course>>;
    async fn assign_instructor(&self, course_id: i32, instructor_id: i32) -> StoreResult<()>;
    async fn unassign_instructor(&self, course_id: i32, instructor_id: i32) -> StoreResult<()>;
    async fn teaches(&self, instructor_id: i32, course_id: i32) -> StoreResult<bool>;
    async fn courses_taught_by(&self, instructor_id: i32) -> StoreResult<Vec<Course>>;

    // Modules, ordered by module_number
    async fn list_modules(&self, course_id: i32) -> StoreResult<Vec<Module>>;
    async fn insert_module(&self, course_id: i32, module: ModuleDraft) -> StoreResult<Module>;
    async fn update_module(
        &self,
        course_id: i32,
        module_number: i32,
        changes: ModuleChanges,
    ) -> StoreResult<Module>;
    async fn delete_module(&self, course_id: i32, module_number: i32) -> StoreResult<()>;
    async fn swap_modules(&self, course_id: i32, first: i32, second: i32) -> StoreResult<Vec<Module>>;

    // Content, ordered by content_id
    async fn list_content(&self, course_id: i32, module_number: i32) -> StoreResult<Vec<ContentItem>>;
    async fn insert_content(
        &self,
        course_id: i32,
        module_number: i32,
        content: ContentDraft,
    ) -> StoreResult<ContentItem>;
    async fn update_content(
        &self,
        item: ContentRef,
        changes: ContentChanges,
    ) -> StoreResult<ContentItem>;
    async fn delete_content(&self, item: ContentRef) -> StoreResult<()>;
    async fn swap_content(
        &self,
        course_id: i32,
        module_number: i32,
        first: i32,
        second: i32,
    ) -> StoreResult<Vec<ContentItem>>;

    // Enrollment, grading and progress
    async fn enroll(&self, student_id: i32, course_id: i32) -> StoreResult<Enrollment>;
    async fn find_enrollment(&self, enrollment_id: i32) -> StoreResult<Option<Enrollment>>;
    async fn find_enrollment_for(&self, student_id: i32, course_id: i32) -> StoreResult<Option<Enrollment>>;
    async fn set_evaluation_score(&self, enrollment_id: i32, score: i32) -> StoreResult<Enrollment>;
    async fn record_progress(&self, enrollment_id: i32, item: ContentRef) -> StoreResult<Progress>;
    async fn list_progress(&self, enrollment_id: i32) -> StoreResult<Vec<Progress>>;

    // Analytics
    async fn course_summary(&self, course_id: i32) -> StoreResult<CourseSummary>;
}
