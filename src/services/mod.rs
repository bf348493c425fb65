pub mod accounts;
pub mod courses;
pub mod curriculum;
pub mod enrollment;
pub mod error;
pub mod grading;
pub mod ownership;
pub mod validate;

pub use accounts::{AccountService, Session};
pub use courses::CourseService;
pub use curriculum::CurriculumService;
pub use enrollment::EnrollmentService;
pub use error::{DomainError, DomainResult};
pub use grading::{parse_score, GradingService};
pub use ownership::ensure_teaches;
