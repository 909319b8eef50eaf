//! EMS Auth — password verification, access-token issuance/validation,
//! and session lifecycle management.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthContext, LoginInput, LoginOutput, RegisterInput, SessionManager};
pub use token::AccessTokenClaims;
