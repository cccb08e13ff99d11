//! Adapters for the hosted backend (auth service + REST row store).
//!
//! All adapters share one `SupabaseClient`, which carries the project key and
//! the signed-in session.

mod auth;
mod client;
mod rest;

pub use auth::GoTrueAuthService;
pub use client::{SupabaseClient, error_message};
pub use rest::{PostgrestLeadRepository, PostgrestProfileRepository};
