// handlers/instructor/mod.rs - Instructor handlers
//
// Security Level: JWT + Instructor role
// Route Prefix: /instructor/*
// Middleware: routes under /instructor/courses/:id/ also pass the ownership
// gate, which places `OwnedCourse` in the request extensions.

pub mod content;
pub mod courses;
pub mod grading;
pub mod modules;

pub use content::{content_delete, content_get, content_post, content_put, content_swap};
pub use courses::courses_get;
pub use grading::grade_put;
pub use modules::{module_delete, module_put, modules_get, modules_post, modules_swap};
