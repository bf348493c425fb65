pub mod auth;
pub mod ownership;
pub mod response;
pub mod roles;
pub mod validate_user;

pub use auth::jwt_auth_middleware;
pub use ownership::{course_ownership_middleware, OwnedCourse};
pub use response::{ApiResponse, ApiResult};
pub use roles::{require_admin, require_analytics, require_instructor, require_student};
pub use validate_user::{validate_user_middleware, ValidatedUser};
