// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus service discovery and liveness.

pub mod auth;
pub mod service;

pub use auth::login_post;
pub use service::{health_get, root_get};
