//! Authentication domain module.
//!
//! - `model`: Session, user, profile and request types
//! - `service`: Auth backend and profile store traits

mod model;
mod service;

pub use model::{
    AuthEvent, AuthEventKind, AuthSession, AuthUser, Credentials, DEFAULT_MIN_PASSWORD_LEN,
    Profile, SignUpOutcome, SignUpRequest,
};
pub use service::{AuthService, ProfileRepository};
