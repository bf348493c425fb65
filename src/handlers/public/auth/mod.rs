// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login;    // POST /auth/login - verify credentials and issue a JWT
pub mod register; // POST /auth/register - create a student account

pub use login::login_post;
pub use register::register_post;
