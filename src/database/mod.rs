pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;
pub mod swap;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCourseStore;
pub use postgres::PgCourseStore;
pub use store::{CourseStore, StoreError, StoreResult, PROGRESS_CONFLICT};
