use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub course_id: i32,
    pub course_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub course_name: String,
    pub description: Option<String>,
}

/// Aggregate counters for the analytics summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub course_id: i32,
    pub enrollments: i64,
    pub graded: i64,
    pub average_score: Option<f64>,
    pub modules: i64,
    pub content_items: i64,
}
