pub mod whoami;

// Re-export handler functions for use in routing
pub use whoami::whoami_get;
