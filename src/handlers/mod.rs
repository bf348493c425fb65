// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth) → role areas (JWT auth + role gate)
//
pub mod admin;      // Admin role: accounts, courses, teaching assignments
pub mod analytics;  // Analyst or Admin role: course summaries
pub mod instructor; // Instructor role: curriculum and grading
pub mod protected;  // Any authenticated user (/api/*)
pub mod public;     // No authentication required (/auth/*)
pub mod student;    // Student role: enrollment and progress
pub mod utils;
