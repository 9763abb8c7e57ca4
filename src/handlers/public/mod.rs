// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition only: registration and login.

pub mod auth;

pub use auth::*;
