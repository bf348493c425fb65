use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub enrollment_id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub evaluation_score: Option<i32>,
    pub enrolled_at: DateTime<Utc>,
}

/// A student's completion of one content item. Holds a foreign key to the
/// content identity `(course_id, module_number, content_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Progress {
    pub enrollment_id: i32,
    pub course_id: i32,
    pub module_number: i32,
    pub content_id: i32,
    pub completed_at: DateTime<Utc>,
}

/// Reference to a content item by its identity columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentRef {
    pub course_id: i32,
    pub module_number: i32,
    pub content_id: i32,
}
