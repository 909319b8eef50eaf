//! Authentication configuration.

/// Configuration for session and token management.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Server-held secret for HS256 token signing.
    pub jwt_secret: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Lifetime of a session and of the access token bound to it
    /// (default: 28_800 = 8 hours). A session is never renewed —
    /// re-login creates a new one.
    pub session_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id
    /// hashing/verification.
    pub pepper: Option<String>,
}

impl AuthConfig {
    /// Configuration with the given signing secret and all other
    /// fields at their defaults.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Self::default()
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "ems".into(),
            session_lifetime_secs: 28_800,
            pepper: None,
        }
    }
}
