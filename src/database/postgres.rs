use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use super::models::{
    ContentChanges, ContentDraft, ContentItem, ContentRef, Course, CourseSummary, Enrollment,
    Module, ModuleChanges, ModuleDraft, NewCourse, NewUser, Progress, User,
};
use super::store::{CourseStore, StoreError, StoreResult, PROGRESS_CONFLICT};
use super::swap::{swap_in_transaction, PgSequenced};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

const USER_COLUMNS: &str = "user_id, name, email, password_hash, role, created_at";
const COURSE_COLUMNS: &str = "course_id, course_name, description, created_at";
const MODULE_COLUMNS: &str = "course_id, module_number, name, duration_weeks";
const CONTENT_COLUMNS: &str = "course_id, module_number, content_id, title, content_type, url";
const ENROLLMENT_COLUMNS: &str = "enrollment_id, student_id, course_id, evaluation_score, enrolled_at";
const PROGRESS_COLUMNS: &str = "enrollment_id, course_id, module_number, content_id, completed_at";

/// SQLSTATE of a database-side error, if any
fn sql_state(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

/// Map constraint violations to `Conflict`, everything else passes through
fn conflict_on(err: sqlx::Error, unique: &str, foreign_key: &str) -> StoreError {
    match sql_state(&err).as_deref() {
        Some(UNIQUE_VIOLATION) => StoreError::Conflict(unique.to_string()),
        Some(FOREIGN_KEY_VIOLATION) => StoreError::Conflict(foreign_key.to_string()),
        _ => StoreError::Sqlx(err),
    }
}

/// PostgreSQL-backed store over an injected connection pool
#[derive(Clone)]
pub struct PgCourseStore {
    pool: PgPool,
}

impl PgCourseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PgSequenced for Module {
    type Parent = i32;

    const ENTITY: &'static str = "Module";

    async fn lock_pair(
        conn: &mut PgConnection,
        course_id: &i32,
        first: i32,
        second: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {MODULE_COLUMNS} FROM modules \
             WHERE course_id = $1 AND module_number IN ($2, $3) \
             ORDER BY module_number FOR UPDATE"
        );
        sqlx::query_as::<_, Module>(&sql)
            .bind(course_id)
            .bind(first)
            .bind(second)
            .fetch_all(conn)
            .await
    }

    async fn write_payload(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE modules SET name = $3, duration_weeks = $4 \
             WHERE course_id = $1 AND module_number = $2",
        )
        .bind(self.course_id)
        .bind(self.module_number)
        .bind(&self.name)
        .bind(self.duration_weeks)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PgSequenced for ContentItem {
    /// (course_id, module_number)
    type Parent = (i32, i32);

    const ENTITY: &'static str = "Content";

    async fn lock_pair(
        conn: &mut PgConnection,
        parent: &(i32, i32),
        first: i32,
        second: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM content \
             WHERE course_id = $1 AND module_number = $2 AND content_id IN ($3, $4) \
             ORDER BY content_id FOR UPDATE"
        );
        sqlx::query_as::<_, ContentItem>(&sql)
            .bind(parent.0)
            .bind(parent.1)
            .bind(first)
            .bind(second)
            .fetch_all(conn)
            .await
    }

    async fn write_payload(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE content SET title = $4, content_type = $5, url = $6 \
             WHERE course_id = $1 AND module_number = $2 AND content_id = $3",
        )
        .bind(self.course_id)
        .bind(self.module_number)
        .bind(self.content_id)
        .bind(&self.title)
        .bind(self.content_type)
        .bind(&self.url)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CourseStore for PgCourseStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                conflict_on(
                    e,
                    &format!("An account with email '{}' already exists", user.email),
                    "Account references a missing record",
                )
            })
    }

    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_course(&self, course: NewCourse) -> StoreResult<Course> {
        let sql = format!(
            "INSERT INTO courses (course_name, description) VALUES ($1, $2) RETURNING {COURSE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(&course.course_name)
            .bind(&course.description)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_course(&self, course_id: i32) -> StoreResult<Option<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = $1");
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn assign_instructor(&self, course_id: i32, instructor_id: i32) -> StoreResult<()> {
        sqlx::query("INSERT INTO course_instructors (course_id, instructor_id) VALUES ($1, $2)")
            .bind(course_id)
            .bind(instructor_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match sql_state(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::Conflict(format!(
                    "Instructor {} is already assigned to course {}",
                    instructor_id, course_id
                )),
                Some(FOREIGN_KEY_VIOLATION) => StoreError::NotFound(format!(
                    "Course {} or user {} not found",
                    course_id, instructor_id
                )),
                _ => StoreError::Sqlx(e),
            })?;
        Ok(())
    }

    async fn unassign_instructor(&self, course_id: i32, instructor_id: i32) -> StoreResult<()> {
        let result =
            sqlx::query("DELETE FROM course_instructors WHERE course_id = $1 AND instructor_id = $2")
                .bind(course_id)
                .bind(instructor_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "Instructor {} is not assigned to course {}",
                instructor_id, course_id
            )));
        }
        Ok(())
    }

    async fn teaches(&self, instructor_id: i32, course_id: i32) -> StoreResult<bool> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM course_instructors \
             WHERE instructor_id = $1 AND course_id = $2) AS teaches",
        )
        .bind(instructor_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("teaches")?)
    }

    async fn courses_taught_by(&self, instructor_id: i32) -> StoreResult<Vec<Course>> {
        let sql = "SELECT c.course_id, c.course_name, c.description, c.created_at \
                   FROM courses c JOIN course_instructors ci ON ci.course_id = c.course_id \
                   WHERE ci.instructor_id = $1 ORDER BY c.course_id";
        Ok(sqlx::query_as::<_, Course>(sql)
            .bind(instructor_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_modules(&self, course_id: i32) -> StoreResult<Vec<Module>> {
        let sql = format!(
            "SELECT {MODULE_COLUMNS} FROM modules WHERE course_id = $1 ORDER BY module_number"
        );
        Ok(sqlx::query_as::<_, Module>(&sql)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_module(&self, course_id: i32, module: ModuleDraft) -> StoreResult<Module> {
        let sql = format!(
            "INSERT INTO modules (course_id, module_number, name, duration_weeks) \
             VALUES ($1, $2, $3, $4) RETURNING {MODULE_COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&sql)
            .bind(course_id)
            .bind(module.module_number)
            .bind(&module.name)
            .bind(module.duration_weeks)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match sql_state(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::Conflict(format!(
                    "Module {} already exists in course {}",
                    module.module_number, course_id
                )),
                Some(FOREIGN_KEY_VIOLATION) => {
                    StoreError::NotFound(format!("Course {} not found", course_id))
                }
                _ => StoreError::Sqlx(e),
            })
    }

    async fn update_module(
        &self,
        course_id: i32,
        module_number: i32,
        changes: ModuleChanges,
    ) -> StoreResult<Module> {
        let sql = format!(
            "UPDATE modules SET name = COALESCE($3, name), \
             duration_weeks = COALESCE($4, duration_weeks) \
             WHERE course_id = $1 AND module_number = $2 RETURNING {MODULE_COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&sql)
            .bind(course_id)
            .bind(module_number)
            .bind(&changes.name)
            .bind(changes.duration_weeks)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Module {} not found", module_number)))
    }

    async fn delete_module(&self, course_id: i32, module_number: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM modules WHERE course_id = $1 AND module_number = $2")
            .bind(course_id)
            .bind(module_number)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on(e, PROGRESS_CONFLICT, PROGRESS_CONFLICT))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Module {} not found", module_number)));
        }
        Ok(())
    }

    async fn swap_modules(&self, course_id: i32, first: i32, second: i32) -> StoreResult<Vec<Module>> {
        swap_in_transaction::<Module>(&self.pool, &course_id, first, second).await?;
        self.list_modules(course_id).await
    }

    async fn list_content(&self, course_id: i32, module_number: i32) -> StoreResult<Vec<ContentItem>> {
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM content \
             WHERE course_id = $1 AND module_number = $2 ORDER BY content_id"
        );
        Ok(sqlx::query_as::<_, ContentItem>(&sql)
            .bind(course_id)
            .bind(module_number)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_content(
        &self,
        course_id: i32,
        module_number: i32,
        content: ContentDraft,
    ) -> StoreResult<ContentItem> {
        let sql = format!(
            "INSERT INTO content (course_id, module_number, content_id, title, content_type, url) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CONTENT_COLUMNS}"
        );
        sqlx::query_as::<_, ContentItem>(&sql)
            .bind(course_id)
            .bind(module_number)
            .bind(content.content_id)
            .bind(&content.title)
            .bind(content.content_type)
            .bind(&content.url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match sql_state(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::Conflict(format!(
                    "Content {} already exists in module {}",
                    content.content_id, module_number
                )),
                Some(FOREIGN_KEY_VIOLATION) => {
                    StoreError::NotFound(format!("Module {} not found", module_number))
                }
                _ => StoreError::Sqlx(e),
            })
    }

    async fn update_content(&self, item: ContentRef, changes: ContentChanges) -> StoreResult<ContentItem> {
        let sql = format!(
            "UPDATE content SET title = COALESCE($4, title), \
             content_type = COALESCE($5, content_type), \
             url = CASE WHEN $6 THEN $7 ELSE url END \
             WHERE course_id = $1 AND module_number = $2 AND content_id = $3 \
             RETURNING {CONTENT_COLUMNS}"
        );
        let (url_provided, url) = match changes.url {
            Some(url) => (true, url),
            None => (false, None),
        };
        sqlx::query_as::<_, ContentItem>(&sql)
            .bind(item.course_id)
            .bind(item.module_number)
            .bind(item.content_id)
            .bind(&changes.title)
            .bind(changes.content_type)
            .bind(url_provided)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Content {} not found", item.content_id)))
    }

    async fn delete_content(&self, item: ContentRef) -> StoreResult<()> {
        let result = sqlx::query(
            "DELETE FROM content WHERE course_id = $1 AND module_number = $2 AND content_id = $3",
        )
        .bind(item.course_id)
        .bind(item.module_number)
        .bind(item.content_id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on(e, PROGRESS_CONFLICT, PROGRESS_CONFLICT))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Content {} not found", item.content_id)));
        }
        Ok(())
    }

    async fn swap_content(
        &self,
        course_id: i32,
        module_number: i32,
        first: i32,
        second: i32,
    ) -> StoreResult<Vec<ContentItem>> {
        swap_in_transaction::<ContentItem>(&self.pool, &(course_id, module_number), first, second)
            .await?;
        self.list_content(course_id, module_number).await
    }

    async fn enroll(&self, student_id: i32, course_id: i32) -> StoreResult<Enrollment> {
        let sql = format!(
            "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&sql)
            .bind(student_id)
            .bind(course_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match sql_state(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    StoreError::Conflict(format!("Already enrolled in course {}", course_id))
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    StoreError::NotFound(format!("Course {} not found", course_id))
                }
                _ => StoreError::Sqlx(e),
            })
    }

    async fn find_enrollment(&self, enrollment_id: i32) -> StoreResult<Option<Enrollment>> {
        let sql = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE enrollment_id = $1");
        Ok(sqlx::query_as::<_, Enrollment>(&sql)
            .bind(enrollment_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_enrollment_for(&self, student_id: i32, course_id: i32) -> StoreResult<Option<Enrollment>> {
        let sql = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1 AND course_id = $2"
        );
        Ok(sqlx::query_as::<_, Enrollment>(&sql)
            .bind(student_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_evaluation_score(&self, enrollment_id: i32, score: i32) -> StoreResult<Enrollment> {
        let sql = format!(
            "UPDATE enrollments SET evaluation_score = $2 WHERE enrollment_id = $1 \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&sql)
            .bind(enrollment_id)
            .bind(score)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Enrollment {} not found", enrollment_id)))
    }

    async fn record_progress(&self, enrollment_id: i32, item: ContentRef) -> StoreResult<Progress> {
        let sql = format!(
            "INSERT INTO progress (enrollment_id, course_id, module_number, content_id) \
             VALUES ($1, $2, $3, $4) RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&sql)
            .bind(enrollment_id)
            .bind(item.course_id)
            .bind(item.module_number)
            .bind(item.content_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match sql_state(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    StoreError::Conflict(format!("Content {} already completed", item.content_id))
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    StoreError::NotFound(format!("Content {} not found", item.content_id))
                }
                _ => StoreError::Sqlx(e),
            })
    }

    async fn list_progress(&self, enrollment_id: i32) -> StoreResult<Vec<Progress>> {
        let sql = format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress WHERE enrollment_id = $1 \
             ORDER BY module_number, content_id"
        );
        Ok(sqlx::query_as::<_, Progress>(&sql)
            .bind(enrollment_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn course_summary(&self, course_id: i32) -> StoreResult<CourseSummary> {
        let row = sqlx::query(
            "SELECT \
               (SELECT COUNT(*) FROM enrollments WHERE course_id = $1) AS enrollments, \
               (SELECT COUNT(evaluation_score) FROM enrollments WHERE course_id = $1) AS graded, \
               (SELECT AVG(evaluation_score)::float8 FROM enrollments WHERE course_id = $1) AS average_score, \
               (SELECT COUNT(*) FROM modules WHERE course_id = $1) AS modules, \
               (SELECT COUNT(*) FROM content WHERE course_id = $1) AS content_items",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CourseSummary {
            course_id,
            enrollments: row.try_get("enrollments")?,
            graded: row.try_get("graded")?,
            average_score: row.try_get("average_score")?,
            modules: row.try_get("modules")?,
            content_items: row.try_get("content_items")?,
        })
    }
}
