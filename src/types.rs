//! Shared enums used across the store, services and wire format

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. Closed set; every authorization checkpoint matches on it
/// exhaustively rather than comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    Student,
    Instructor,
    Admin,
    Analyst,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Instructor => "Instructor",
            Role::Admin => "Admin",
            Role::Analyst => "Analyst",
        }
    }

    /// Whether this role may read the aggregate analytics endpoints
    pub fn can_view_analytics(&self) -> bool {
        match self {
            Role::Admin | Role::Analyst => true,
            Role::Student | Role::Instructor => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Role::Student),
            "Instructor" => Ok(Role::Instructor),
            "Admin" => Ok(Role::Admin),
            "Analyst" => Ok(Role::Analyst),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Kind of a content item within a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_type")]
pub enum ContentType {
    Video,
    Note,
    Assignment,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentType::Video => "Video",
            ContentType::Note => "Note",
            ContentType::Assignment => "Assignment",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Student, Role::Instructor, Role::Admin, Role::Analyst] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("instructor".parse::<Role>().is_err());
    }

    #[test]
    fn analytics_visibility() {
        assert!(Role::Analyst.can_view_analytics());
        assert!(Role::Admin.can_view_analytics());
        assert!(!Role::Instructor.can_view_analytics());
        assert!(!Role::Student.can_view_analytics());
    }

    #[test]
    fn content_type_serializes_as_variant_name() {
        let v = serde_json::to_value(ContentType::Assignment).unwrap();
        assert_eq!(v, serde_json::json!("Assignment"));
        let parsed: ContentType = serde_json::from_value(serde_json::json!("Video")).unwrap();
        assert_eq!(parsed, ContentType::Video);
    }
}
