use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::swap::Sequenced;

/// A module within a course. `(course_id, module_number)` is the identity;
/// `module_number` is also the user-visible ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub course_id: i32,
    pub module_number: i32,
    pub name: String,
    pub duration_weeks: i32,
}

/// The mutable half of a module: what moves when two modules are swapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePayload {
    pub name: String,
    pub duration_weeks: i32,
}

impl Sequenced for Module {
    type Payload = ModulePayload;

    fn sequence_key(&self) -> i32 {
        self.module_number
    }

    fn payload(&self) -> ModulePayload {
        ModulePayload {
            name: self.name.clone(),
            duration_weeks: self.duration_weeks,
        }
    }

    fn set_payload(&mut self, payload: ModulePayload) {
        self.name = payload.name;
        self.duration_weeks = payload.duration_weeks;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewModule {
    pub module_number: i64,
    pub name: String,
    pub duration_weeks: i64,
}

/// Partial update; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModulePatch {
    pub name: Option<String>,
    pub duration_weeks: Option<i64>,
}

impl ModulePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.duration_weeks.is_none()
    }
}

/// Validated insert, produced by the curriculum service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDraft {
    pub module_number: i32,
    pub name: String,
    pub duration_weeks: i32,
}

/// Validated partial update, produced by the curriculum service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleChanges {
    pub name: Option<String>,
    pub duration_weeks: Option<i32>,
}

impl ModuleChanges {
    pub fn apply(&self, module: &mut Module) {
        if let Some(name) = &self.name {
            module.name = name.clone();
        }
        if let Some(weeks) = self.duration_weeks {
            module.duration_weeks = weeks;
        }
    }
}
