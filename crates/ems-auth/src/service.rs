//! Session manager — registration, login/logout, session validation,
//! and bearer-token authentication.

use chrono::{Duration, Utc};
use ems_core::error::{EmsError, EmsResult};
use ems_core::models::session::CreateSession;
use ems_core::models::user::{CreateUser, Role, UserPublic};
use ems_core::repository::{SessionRepository, UserRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token, bound to the session.
    pub token: String,
    /// Opaque session identifier (also set as a cookie by the server).
    pub session_id: String,
    pub user: UserPublic,
    /// Session and token lifetime in seconds.
    pub expires_in: u64,
}

/// Resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserPublic,
    pub session_id: String,
}

/// Session manager.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
#[derive(Clone)]
pub struct SessionManager<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> SessionManager<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Register a new user. Fails with `AlreadyExists` if the email is
    /// taken.
    pub async fn register(&self, input: RegisterInput) -> EmsResult<UserPublic> {
        match self.user_repo.get_by_email(&input.email).await {
            Ok(_) => Err(EmsError::AlreadyExists {
                entity: "user".into(),
            }),
            Err(EmsError::NotFound { .. }) => {
                let user = self
                    .user_repo
                    .create(CreateUser {
                        name: input.name,
                        email: input.email,
                        password: input.password,
                        role: input.role,
                    })
                    .await?;
                Ok(user.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Authenticate with email + password, create a session, and issue
    /// an access token bound to it.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, input: LoginInput) -> EmsResult<LoginOutput> {
        // 1. Look up user by email.
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .map_err(|e| match e {
                EmsError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Create the session record. Re-login never resurrects an
        //    old session — every login gets a fresh identifier.
        let session_id = token::generate_session_id();
        let expires_at =
            Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                session_id,
                user_id: user.id,
                expires_at,
                user_agent: input.user_agent,
                ip_address: input.ip_address,
            })
            .await?;

        // 4. Issue the access token carrying {user, role, session}.
        let token =
            token::issue_access_token(user.id, user.role, &session.session_id, &self.config)?;

        Ok(LoginOutput {
            token,
            session_id: session.session_id,
            user: user.into(),
            expires_in: self.config.session_lifetime_secs,
        })
    }

    /// Deactivate a session (logout). Idempotent — unknown identifiers
    /// are a no-op.
    pub async fn logout(&self, session_id: &str) -> EmsResult<()> {
        self.session_repo.invalidate(session_id).await
    }

    /// Validate a session identifier and resolve its owner.
    ///
    /// Fails with a uniform `SessionInvalid` whether the session is
    /// absent, deactivated, or past its expiry; an orphaned session
    /// (user record gone) fails with `UserNotFound`.
    pub async fn validate_session(&self, session_id: &str) -> EmsResult<UserPublic> {
        let session = self
            .session_repo
            .get(session_id)
            .await
            .map_err(|e| match e {
                EmsError::NotFound { .. } => AuthError::SessionInvalid.into(),
                other => other,
            })?;

        if !session.is_valid_at(Utc::now()) {
            return Err(AuthError::SessionInvalid.into());
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .map_err(|e| match e {
                EmsError::NotFound { .. } => AuthError::UserNotFound.into(),
                other => other,
            })?;

        Ok(user.into())
    }

    /// Full request authentication: verify the bearer token's
    /// signature and expiry, then re-validate the embedded session
    /// against the store. The second check is what lets logout revoke
    /// access before the token's own expiry.
    pub async fn authenticate(&self, bearer_token: &str) -> EmsResult<AuthContext> {
        let claims = token::decode_access_token(bearer_token, &self.config)?;
        let user = self.validate_session(&claims.session_id).await?;
        Ok(AuthContext {
            user,
            session_id: claims.session_id,
        })
    }
}
