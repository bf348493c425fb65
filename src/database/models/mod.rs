pub mod content;
pub mod course;
pub mod enrollment;
pub mod module;
pub mod user;

pub use content::{ContentChanges, ContentDraft, ContentItem, ContentPatch, ContentPayload, NewContent};
pub use course::{Course, CourseSummary, NewCourse};
pub use enrollment::{ContentRef, Enrollment, Progress};
pub use module::{Module, ModuleChanges, ModuleDraft, ModulePatch, ModulePayload, NewModule};
pub use user::{NewUser, User};
