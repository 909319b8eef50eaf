//! Integration tests for the session manager.

use chrono::{Duration, Utc};
use ems_auth::config::AuthConfig;
use ems_auth::service::{LoginInput, RegisterInput, SessionManager};
use ems_auth::token;
use ems_core::error::EmsError;
use ems_core::models::session::CreateSession;
use ems_core::models::user::Role;
use ems_core::repository::SessionRepository;
use ems_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-do-not-use".into(),
        jwt_issuer: "ems-test".into(),
        session_lifetime_secs: 28_800,
        pepper: None,
    }
}

type MemUserRepo = SurrealUserRepository<surrealdb::engine::local::Db>;
type MemSessionRepo = SurrealSessionRepository<surrealdb::engine::local::Db>;

/// Spin up in-memory DB, run migrations, and register one user.
async fn setup() -> (SessionManager<MemUserRepo, MemSessionRepo>, MemSessionRepo) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    ems_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let session_repo = SurrealSessionRepository::new(db.clone());
    let manager = SessionManager::new(user_repo, session_repo.clone(), test_config());

    manager
        .register(RegisterInput {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
            role: Role::Admin,
        })
        .await
        .unwrap();

    (manager, session_repo)
}

fn login_input(password: &str) -> LoginInput {
    LoginInput {
        email: "alice@example.com".into(),
        password: password.into(),
        ip_address: Some("127.0.0.1".into()),
        user_agent: Some("TestAgent".into()),
    }
}

#[tokio::test]
async fn login_happy_path() {
    let (manager, _) = setup().await;
    let config = test_config();

    let out = manager.login(login_input("correct-horse-battery")).await.unwrap();

    assert_eq!(out.session_id.len(), 64);
    assert!(out.session_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(out.expires_in, 28_800);
    assert_eq!(out.user.email, "alice@example.com");

    // The token mirrors the session binding.
    let claims = token::decode_access_token(&out.token, &config).unwrap();
    assert_eq!(claims.session_id, out.session_id);
    assert_eq!(claims.sub, out.user.id.to_string());
    assert_eq!(claims.role, Role::Admin);
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let (manager, _) = setup().await;

    let wrong_password = manager
        .login(login_input("wrong-password"))
        .await
        .unwrap_err();
    let unknown_email = manager
        .login(LoginInput {
            email: "ghost@example.com".into(),
            ..login_input("whatever")
        })
        .await
        .unwrap_err();

    // Same uniform message for unknown email and wrong password.
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert!(matches!(
        wrong_password,
        EmsError::AuthenticationFailed { .. }
    ));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (manager, _) = setup().await;

    let err = manager
        .register(RegisterInput {
            name: "Alice Again".into(),
            email: "alice@example.com".into(),
            password: "another-password".into(),
            role: Role::Employee,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EmsError::AlreadyExists { .. }));
}

#[tokio::test]
async fn validate_session_roundtrip() {
    let (manager, _) = setup().await;

    let out = manager.login(login_input("correct-horse-battery")).await.unwrap();
    let user = manager.validate_session(&out.session_id).await.unwrap();
    assert_eq!(user, out.user);
}

#[tokio::test]
async fn logout_revokes_the_session_but_not_the_token_signature() {
    let (manager, _) = setup().await;
    let config = test_config();

    let out = manager.login(login_input("correct-horse-battery")).await.unwrap();
    manager.logout(&out.session_id).await.unwrap();

    // The token still verifies on its own…
    assert!(token::decode_access_token(&out.token, &config).is_ok());
    // …but the dual check fails because the session is revoked.
    assert!(manager.validate_session(&out.session_id).await.is_err());
    assert!(manager.authenticate(&out.token).await.is_err());
}

#[tokio::test]
async fn logout_is_idempotent() {
    let (manager, _) = setup().await;

    let out = manager.login(login_input("correct-horse-battery")).await.unwrap();
    manager.logout(&out.session_id).await.unwrap();
    manager.logout(&out.session_id).await.unwrap();
    manager.logout("0000-never-existed").await.unwrap();
}

#[tokio::test]
async fn expired_session_fails_validation_despite_valid_token() {
    let (manager, session_repo) = setup().await;

    let out = manager.login(login_input("correct-horse-battery")).await.unwrap();

    // Plant an already-expired session owned by the same user and bind
    // a fresh token to it.
    let user_id = out.user.id;
    let expired = session_repo
        .create(CreateSession {
            session_id: token::generate_session_id(),
            user_id,
            expires_at: Utc::now() - Duration::hours(1),
            user_agent: None,
            ip_address: None,
        })
        .await
        .unwrap();
    let stale_token = token::issue_access_token(
        user_id,
        Role::Admin,
        &expired.session_id,
        &test_config(),
    )
    .unwrap();

    let err = manager.validate_session(&expired.session_id).await.unwrap_err();
    assert!(matches!(err, EmsError::AuthenticationFailed { .. }));
    assert!(manager.authenticate(&stale_token).await.is_err());
}

#[tokio::test]
async fn sequential_logins_are_independent() {
    let (manager, _) = setup().await;

    let first = manager.login(login_input("correct-horse-battery")).await.unwrap();
    let second = manager.login(login_input("correct-horse-battery")).await.unwrap();

    assert_ne!(first.session_id, second.session_id);

    // Revoking one login leaves the other intact.
    manager.logout(&first.session_id).await.unwrap();
    assert!(manager.validate_session(&first.session_id).await.is_err());
    assert!(manager.validate_session(&second.session_id).await.is_ok());
    assert!(manager.authenticate(&second.token).await.is_ok());
}

#[tokio::test]
async fn authenticate_rejects_garbage_tokens() {
    let (manager, _) = setup().await;
    assert!(manager.authenticate("not.a.jwt").await.is_err());
    assert!(manager.authenticate("").await.is_err());
}
