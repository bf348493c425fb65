// handlers/admin/mod.rs - Administrative handlers
//
// Security Level: JWT + Admin role
// Route Prefix: /admin/*

pub mod courses;
pub mod users;

pub use courses::{course_post, instructor_delete, instructor_post};
pub use users::user_post;
