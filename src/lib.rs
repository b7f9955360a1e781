//! OAuth 2.0 authorization-code login against Google.
//!
//! `GET /login` sends the browser to the consent screen, and
//! `GET /auth/callback` trades the returned code for an access token and
//! answers with the user's profile.

pub mod app;
pub mod error;
pub mod handlers;
pub mod models;

pub use app::create_app;
pub use error::AuthError;
pub use models::{AppConfig, AppState, ConfigError, ProviderEndpoints};
