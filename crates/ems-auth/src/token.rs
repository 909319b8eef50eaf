//! JWT access token issuance/verification and opaque session
//! identifier generation.

use chrono::Utc;
use ems_core::models::user::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every access token.
///
/// The token is a capability, not a source of truth — the referenced
/// session must still exist, be active, and be unexpired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    /// Role at login time.
    pub role: Role,
    /// Opaque session identifier the token is bound to.
    pub session_id: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp) — same 8h window as the session.
    pub exp: i64,
}

/// Issue a signed HS256 JWT access token bound to a session.
pub fn issue_access_token(
    user_id: Uuid,
    role: Role,
    session_id: &str,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = AccessTokenClaims {
        sub: user_id.to_string(),
        role,
        session_id: session_id.to_string(),
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.session_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an HS256 JWT access token (signature, expiry,
/// issuer). Purely stateless — no session lookup is performed here.
pub fn decode_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessTokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Generate a cryptographically random session identifier
/// (32 bytes → 64 lowercase hex chars, 256 bits of entropy).
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-do-not-use".into(),
            jwt_issuer: "ems-test".into(),
            session_lifetime_secs: 28_800,
            pepper: None,
        }
    }

    #[test]
    fn jwt_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let session_id = generate_session_id();

        let token =
            issue_access_token(user_id, Role::Admin, &session_id, &config).unwrap();
        let claims = decode_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.session_id, session_id);
        assert_eq!(claims.iss, "ems-test");
        assert_eq!(claims.exp - claims.iat, 28_800);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = test_config();
        let token =
            issue_access_token(Uuid::new_v4(), Role::Employee, "abc", &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "a-different-secret".into(),
            ..test_config()
        };
        assert!(matches!(
            decode_access_token(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: Uuid::new_v4().to_string(),
            role: Role::Employee,
            session_id: "abc".into(),
            iss: config.jwt_issuer.clone(),
            iat: now - 7_200,
            exp: now - 3_600,
        };
        let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();

        assert!(matches!(
            decode_access_token(&token, &config),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = test_config();
        assert!(matches!(
            decode_access_token("not.a.jwt", &config),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn session_id_is_64_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn session_ids_are_unrelated() {
        assert_ne!(generate_session_id(), generate_session_id());
    }
}
