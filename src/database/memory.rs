use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

use super::models::{
    ContentChanges, ContentDraft, ContentItem, ContentRef, Course, CourseSummary, Enrollment,
    Module, ModuleChanges, ModuleDraft, NewCourse, NewUser, Progress, User,
};
use super::store::{CourseStore, StoreError, StoreResult, PROGRESS_CONFLICT};
use super::swap::swap_in_map;

type ModuleKey = (i32, i32);
type ContentKey = (i32, i32, i32);
type ProgressKey = (i32, ContentKey);

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    courses: BTreeMap<i32, Course>,
    /// (instructor_id, course_id)
    assignments: BTreeSet<(i32, i32)>,
    modules: BTreeMap<ModuleKey, Module>,
    content: BTreeMap<ContentKey, ContentItem>,
    enrollments: BTreeMap<i32, Enrollment>,
    progress: BTreeMap<ProgressKey, Progress>,
    next_user_id: i32,
    next_course_id: i32,
    next_enrollment_id: i32,
}

impl Tables {
    fn content_key(item: &ContentRef) -> ContentKey {
        (item.course_id, item.module_number, item.content_id)
    }

    fn has_progress_on(&self, predicate: impl Fn(&ContentKey) -> bool) -> bool {
        self.progress.keys().any(|(_, content)| predicate(content))
    }
}

/// In-process store with the same semantics as `PgCourseStore`.
///
/// A single mutex guards every table, so each operation (including both writes
/// of a swap) is applied atomically with respect to every other operation.
#[derive(Default)]
pub struct MemoryCourseStore {
    tables: Mutex<Tables>,
}

impl MemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut t = self.tables.lock().await;
        if t.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict(format!(
                "An account with email '{}' already exists",
                user.email
            )));
        }
        t.next_user_id += 1;
        let row = User {
            user_id: t.next_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        t.users.insert(row.user_id, row.clone());
        Ok(row)
    }

    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.lock().await;
        Ok(t.users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn insert_course(&self, course: NewCourse) -> StoreResult<Course> {
        let mut t = self.tables.lock().await;
        t.next_course_id += 1;
        let row = Course {
            course_id: t.next_course_id,
            course_name: course.course_name,
            description: course.description,
            created_at: Utc::now(),
        };
        t.courses.insert(row.course_id, row.clone());
        Ok(row)
    }

    async fn find_course(&self, course_id: i32) -> StoreResult<Option<Course>> {
        Ok(self.tables.lock().await.courses.get(&course_id).cloned())
    }

    async fn assign_instructor(&self, course_id: i32, instructor_id: i32) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if !t.courses.contains_key(&course_id) {
            return Err(StoreError::NotFound(format!("Course {} not found", course_id)));
        }
        if !t.users.contains_key(&instructor_id) {
            return Err(StoreError::NotFound(format!("User {} not found", instructor_id)));
        }
        if !t.assignments.insert((instructor_id, course_id)) {
            return Err(StoreError::Conflict(format!(
                "Instructor {} is already assigned to course {}",
                instructor_id, course_id
            )));
        }
        Ok(())
    }

    async fn unassign_instructor(&self, course_id: i32, instructor_id: i32) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if !t.assignments.remove(&(instructor_id, course_id)) {
            return Err(StoreError::NotFound(format!(
                "Instructor {} is not assigned to course {}",
                instructor_id, course_id
            )));
        }
        Ok(())
    }

    async fn teaches(&self, instructor_id: i32, course_id: i32) -> StoreResult<bool> {
        Ok(self.tables.lock().await.assignments.contains(&(instructor_id, course_id)))
    }

    async fn courses_taught_by(&self, instructor_id: i32) -> StoreResult<Vec<Course>> {
        let t = self.tables.lock().await;
        Ok(t.assignments
            .iter()
            .filter(|(instructor, _)| *instructor == instructor_id)
            .filter_map(|(_, course_id)| t.courses.get(course_id).cloned())
            .collect())
    }

    async fn list_modules(&self, course_id: i32) -> StoreResult<Vec<Module>> {
        let t = self.tables.lock().await;
        Ok(t.modules
            .range((course_id, i32::MIN)..=(course_id, i32::MAX))
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn insert_module(&self, course_id: i32, module: ModuleDraft) -> StoreResult<Module> {
        let mut t = self.tables.lock().await;
        if !t.courses.contains_key(&course_id) {
            return Err(StoreError::NotFound(format!("Course {} not found", course_id)));
        }
        let key = (course_id, module.module_number);
        if t.modules.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "Module {} already exists in course {}",
                module.module_number, course_id
            )));
        }
        let row = Module {
            course_id,
            module_number: module.module_number,
            name: module.name,
            duration_weeks: module.duration_weeks,
        };
        t.modules.insert(key, row.clone());
        Ok(row)
    }

    async fn update_module(
        &self,
        course_id: i32,
        module_number: i32,
        changes: ModuleChanges,
    ) -> StoreResult<Module> {
        let mut t = self.tables.lock().await;
        let row = t
            .modules
            .get_mut(&(course_id, module_number))
            .ok_or_else(|| StoreError::NotFound(format!("Module {} not found", module_number)))?;
        changes.apply(row);
        Ok(row.clone())
    }

    async fn delete_module(&self, course_id: i32, module_number: i32) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if !t.modules.contains_key(&(course_id, module_number)) {
            return Err(StoreError::NotFound(format!("Module {} not found", module_number)));
        }
        // Deleting the module cascades to its content; progress on that content blocks it.
        if t.has_progress_on(|(c, m, _)| *c == course_id && *m == module_number) {
            return Err(StoreError::Conflict(PROGRESS_CONFLICT.to_string()));
        }
        t.content.retain(|(c, m, _), _| !(*c == course_id && *m == module_number));
        t.modules.remove(&(course_id, module_number));
        Ok(())
    }

    async fn swap_modules(&self, course_id: i32, first: i32, second: i32) -> StoreResult<Vec<Module>> {
        {
            let mut t = self.tables.lock().await;
            for number in [first, second] {
                if !t.modules.contains_key(&(course_id, number)) {
                    return Err(StoreError::NotFound(format!("Module {} not found", number)));
                }
            }
            swap_in_map(&mut t.modules, &(course_id, first), &(course_id, second));
        }
        self.list_modules(course_id).await
    }

    async fn list_content(&self, course_id: i32, module_number: i32) -> StoreResult<Vec<ContentItem>> {
        let t = self.tables.lock().await;
        Ok(t.content
            .range((course_id, module_number, i32::MIN)..=(course_id, module_number, i32::MAX))
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn insert_content(
        &self,
        course_id: i32,
        module_number: i32,
        content: ContentDraft,
    ) -> StoreResult<ContentItem> {
        let mut t = self.tables.lock().await;
        if !t.modules.contains_key(&(course_id, module_number)) {
            return Err(StoreError::NotFound(format!("Module {} not found", module_number)));
        }
        let key = (course_id, module_number, content.content_id);
        if t.content.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "Content {} already exists in module {}",
                content.content_id, module_number
            )));
        }
        let row = ContentItem {
            course_id,
            module_number,
            content_id: content.content_id,
            title: content.title,
            content_type: content.content_type,
            url: content.url,
        };
        t.content.insert(key, row.clone());
        Ok(row)
    }

    async fn update_content(&self, item: ContentRef, changes: ContentChanges) -> StoreResult<ContentItem> {
        let mut t = self.tables.lock().await;
        let row = t
            .content
            .get_mut(&Tables::content_key(&item))
            .ok_or_else(|| StoreError::NotFound(format!("Content {} not found", item.content_id)))?;
        changes.apply(row);
        Ok(row.clone())
    }

    async fn delete_content(&self, item: ContentRef) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        let key = Tables::content_key(&item);
        if !t.content.contains_key(&key) {
            return Err(StoreError::NotFound(format!("Content {} not found", item.content_id)));
        }
        if t.has_progress_on(|content| *content == key) {
            return Err(StoreError::Conflict(PROGRESS_CONFLICT.to_string()));
        }
        t.content.remove(&key);
        Ok(())
    }

    async fn swap_content(
        &self,
        course_id: i32,
        module_number: i32,
        first: i32,
        second: i32,
    ) -> StoreResult<Vec<ContentItem>> {
        {
            let mut t = self.tables.lock().await;
            for content_id in [first, second] {
                if !t.content.contains_key(&(course_id, module_number, content_id)) {
                    return Err(StoreError::NotFound(format!("Content {} not found", content_id)));
                }
            }
            swap_in_map(
                &mut t.content,
                &(course_id, module_number, first),
                &(course_id, module_number, second),
            );
        }
        self.list_content(course_id, module_number).await
    }

    async fn enroll(&self, student_id: i32, course_id: i32) -> StoreResult<Enrollment> {
        let mut t = self.tables.lock().await;
        if !t.courses.contains_key(&course_id) {
            return Err(StoreError::NotFound(format!("Course {} not found", course_id)));
        }
        if t.enrollments
            .values()
            .any(|e| e.student_id == student_id && e.course_id == course_id)
        {
            return Err(StoreError::Conflict(format!("Already enrolled in course {}", course_id)));
        }
        t.next_enrollment_id += 1;
        let row = Enrollment {
            enrollment_id: t.next_enrollment_id,
            student_id,
            course_id,
            evaluation_score: None,
            enrolled_at: Utc::now(),
        };
        t.enrollments.insert(row.enrollment_id, row.clone());
        Ok(row)
    }

    async fn find_enrollment(&self, enrollment_id: i32) -> StoreResult<Option<Enrollment>> {
        Ok(self.tables.lock().await.enrollments.get(&enrollment_id).cloned())
    }

    async fn find_enrollment_for(&self, student_id: i32, course_id: i32) -> StoreResult<Option<Enrollment>> {
        let t = self.tables.lock().await;
        Ok(t.enrollments
            .values()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn set_evaluation_score(&self, enrollment_id: i32, score: i32) -> StoreResult<Enrollment> {
        let mut t = self.tables.lock().await;
        let row = t
            .enrollments
            .get_mut(&enrollment_id)
            .ok_or_else(|| StoreError::NotFound(format!("Enrollment {} not found", enrollment_id)))?;
        row.evaluation_score = Some(score);
        Ok(row.clone())
    }

    async fn record_progress(&self, enrollment_id: i32, item: ContentRef) -> StoreResult<Progress> {
        let mut t = self.tables.lock().await;
        let content = Tables::content_key(&item);
        if !t.content.contains_key(&content) {
            return Err(StoreError::NotFound(format!("Content {} not found", item.content_id)));
        }
        if !t.enrollments.contains_key(&enrollment_id) {
            return Err(StoreError::NotFound(format!("Enrollment {} not found", enrollment_id)));
        }
        let key = (enrollment_id, content);
        if t.progress.contains_key(&key) {
            return Err(StoreError::Conflict(format!("Content {} already completed", item.content_id)));
        }
        let row = Progress {
            enrollment_id,
            course_id: item.course_id,
            module_number: item.module_number,
            content_id: item.content_id,
            completed_at: Utc::now(),
        };
        t.progress.insert(key, row.clone());
        Ok(row)
    }

    async fn list_progress(&self, enrollment_id: i32) -> StoreResult<Vec<Progress>> {
        let t = self.tables.lock().await;
        Ok(t.progress
            .iter()
            .filter(|((enrollment, _), _)| *enrollment == enrollment_id)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn course_summary(&self, course_id: i32) -> StoreResult<CourseSummary> {
        let t = self.tables.lock().await;
        let scores: Vec<i32> = t
            .enrollments
            .values()
            .filter(|e| e.course_id == course_id)
            .filter_map(|e| e.evaluation_score)
            .collect();
        let average_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().map(|s| f64::from(*s)).sum::<f64>() / scores.len() as f64)
        };

        Ok(CourseSummary {
            course_id,
            enrollments: t.enrollments.values().filter(|e| e.course_id == course_id).count() as i64,
            graded: scores.len() as i64,
            average_score,
            modules: t.modules.keys().filter(|(c, _)| *c == course_id).count() as i64,
            content_items: t.content.keys().filter(|(c, _, _)| *c == course_id).count() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentType, Role};
    use std::sync::Arc;

    async fn course_with_modules(store: &MemoryCourseStore) -> i32 {
        let course = store
            .insert_course(NewCourse { course_name: "Rust".into(), description: None })
            .await
            .unwrap();
        for (n, name, weeks) in [(1, "Intro", 2), (2, "Advanced", 4), (5, "Capstone", 3)] {
            store
                .insert_module(
                    course.course_id,
                    ModuleDraft { module_number: n, name: name.into(), duration_weeks: weeks },
                )
                .await
                .unwrap();
        }
        course.course_id
    }

    async fn add_content(store: &MemoryCourseStore, course_id: i32, module: i32, id: i32, title: &str) {
        store
            .insert_content(
                course_id,
                module,
                ContentDraft {
                    content_id: id,
                    title: title.into(),
                    content_type: ContentType::Video,
                    url: Some(format!("https://cdn.test/{}", id)),
                },
            )
            .await
            .unwrap();
    }

    async fn enrolled_student(store: &MemoryCourseStore, course_id: i32) -> Enrollment {
        let student = store
            .insert_user(NewUser {
                name: "Sam".into(),
                email: format!("sam{}@school.test", course_id),
                password_hash: "x".into(),
                role: Role::Student,
            })
            .await
            .unwrap();
        store.enroll(student.user_id, course_id).await.unwrap()
    }

    #[tokio::test]
    async fn swap_modules_exchanges_payload() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;

        let modules = store.swap_modules(course_id, 1, 2).await.unwrap();

        assert_eq!(modules.iter().map(|m| m.module_number).collect::<Vec<_>>(), vec![1, 2, 5]);
        assert_eq!((modules[0].name.as_str(), modules[0].duration_weeks), ("Advanced", 4));
        assert_eq!((modules[1].name.as_str(), modules[1].duration_weeks), ("Intro", 2));
    }

    #[tokio::test]
    async fn swap_modules_non_adjacent_twice_restores_order() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;
        let original = store.list_modules(course_id).await.unwrap();

        store.swap_modules(course_id, 1, 5).await.unwrap();
        let restored = store.swap_modules(course_id, 5, 1).await.unwrap();

        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn swap_with_missing_module_changes_nothing() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;
        let original = store.list_modules(course_id).await.unwrap();

        let err = store.swap_modules(course_id, 2, 9).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(ref m) if m.contains('9')));
        assert_eq!(store.list_modules(course_id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn swapping_content_keeps_progress_pointing_at_same_identity() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;
        add_content(&store, course_id, 1, 5, "Ownership").await;
        add_content(&store, course_id, 1, 7, "Borrowing").await;
        let enrollment = enrolled_student(&store, course_id).await;
        let done = ContentRef { course_id, module_number: 1, content_id: 5 };
        store.record_progress(enrollment.enrollment_id, done).await.unwrap();

        let content = store.swap_content(course_id, 1, 5, 7).await.unwrap();

        assert_eq!(content.iter().map(|c| c.content_id).collect::<Vec<_>>(), vec![5, 7]);
        assert_eq!(content[0].title, "Borrowing");
        assert_eq!(content[0].url.as_deref(), Some("https://cdn.test/7"));
        let progress = store.list_progress(enrollment.enrollment_id).await.unwrap();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].content_id, 5);
    }

    #[tokio::test]
    async fn delete_module_with_progress_is_a_conflict() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;
        add_content(&store, course_id, 2, 1, "Traits").await;
        let enrollment = enrolled_student(&store, course_id).await;
        store
            .record_progress(
                enrollment.enrollment_id,
                ContentRef { course_id, module_number: 2, content_id: 1 },
            )
            .await
            .unwrap();

        let err = store.delete_module(course_id, 2).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == PROGRESS_CONFLICT));
        assert_eq!(store.list_content(course_id, 2).await.unwrap().len(), 1);

        // a module without progress cascades to its content
        add_content(&store, course_id, 5, 1, "Project").await;
        store.delete_module(course_id, 5).await.unwrap();
        assert!(store.list_content(course_id, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_module_number_conflicts() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;
        let err = store
            .insert_module(
                course_id,
                ModuleDraft { module_number: 2, name: "Again".into(), duration_weeks: 1 },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn concurrent_swaps_of_same_pair_do_not_lose_updates() {
        let store = Arc::new(MemoryCourseStore::new());
        let course_id = course_with_modules(&store).await;
        let original = store.list_modules(course_id).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.swap_modules(course_id, 1, 2).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // sixteen serialized swaps is an even number of exchanges
        assert_eq!(store.list_modules(course_id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn summary_counts_course_rows() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;
        add_content(&store, course_id, 1, 1, "Welcome").await;
        let enrollment = enrolled_student(&store, course_id).await;
        store.set_evaluation_score(enrollment.enrollment_id, 80).await.unwrap();

        let summary = store.course_summary(course_id).await.unwrap();
        assert_eq!(summary.enrollments, 1);
        assert_eq!(summary.graded, 1);
        assert_eq!(summary.average_score, Some(80.0));
        assert_eq!(summary.modules, 3);
        assert_eq!(summary.content_items, 1);
    }

    #[tokio::test]
    async fn assignment_requires_existing_user() {
        let store = MemoryCourseStore::new();
        let course_id = course_with_modules(&store).await;

        let err = store.assign_instructor(course_id, 404).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.teaches(404, course_id).await.unwrap());
    }
}
