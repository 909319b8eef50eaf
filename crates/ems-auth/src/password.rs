//! Argon2id password hashing and verification.
//!
//! Both directions live in one module so the peppering rule and the
//! cost parameters cannot drift apart: a hash written at registration
//! always verifies against the same [`AuthConfig`](crate::AuthConfig)
//! pepper at login.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};

use crate::error::AuthError;

// Argon2id cost per the OWASP password storage cheat sheet:
// 19 MiB of memory, 2 iterations, a single lane.
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

fn argon2() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 parameters: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn peppered(password: &str, pepper: Option<&str>) -> Vec<u8> {
    match pepper {
        Some(p) => format!("{p}{password}").into_bytes(),
        None => password.as_bytes().to_vec(),
    }
}

/// Hash a password into PHC string form with a fresh random salt.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?
        .hash_password(&peppered(password, pepper), &salt)
        .map_err(|e| AuthError::Crypto(format!("password hashing: {e}")))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// `Ok(false)` is an ordinary mismatch; `Err` means the stored hash
/// itself is unusable. The verifier reads salt and cost out of the
/// hash string, so older hashes keep verifying after a cost bump here.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AuthError::Crypto(format!("stored hash: {e}")))?;

    match argon2()?.verify_password(&peppered(password, pepper), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("password verification: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("hunter2hunter2", None).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2hunter2", &hash, None).unwrap());
        assert!(!verify_password("wrong-password", &hash, None).unwrap());
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let first = hash_password("same-password", None).unwrap();
        let second = hash_password("same-password", None).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn pepper_must_match_between_hash_and_verify() {
        let hash = hash_password("hunter2hunter2", Some("pepper!")).unwrap();
        assert!(verify_password("hunter2hunter2", &hash, Some("pepper!")).unwrap());
        assert!(!verify_password("hunter2hunter2", &hash, None).unwrap());
        assert!(!verify_password("hunter2hunter2", &hash, Some("other")).unwrap());
    }

    #[test]
    fn unreadable_stored_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("pw", "not-a-phc-hash", None).is_err());
    }
}
