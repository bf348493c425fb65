// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and self-service registration.
//
// Security Level: None
// Route Prefix: /auth/*

pub mod auth;

pub use auth::*;
