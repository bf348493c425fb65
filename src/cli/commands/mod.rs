pub mod auth;
pub mod content;
pub mod grade;
pub mod modules;
