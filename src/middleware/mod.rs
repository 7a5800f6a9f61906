pub mod auth;
pub mod identity;

pub use auth::{require_auth, AuthToken};
pub use identity::{attach_caller, require_roles};
