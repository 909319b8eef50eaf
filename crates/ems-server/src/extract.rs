//! Request extractors: authentication, role gating, and JSON bodies
//! with uniform error shapes.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use ems_auth::service::AuthContext;
use ems_core::models::user::{Role, UserPublic};
use serde::de::DeserializeOwned;
use surrealdb::Connection;

use crate::error::ApiError;
use crate::state::AppState;

/// The uniform 401 body. Deliberately identical for a missing header,
/// a bad signature, an expired token, and a revoked session, so the
/// response never reveals which check failed.
pub const SESSION_INVALID: &str = "invalid or expired session";

/// An authenticated caller, resolved from the bearer token and the
/// server-side session record.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserPublic,
    pub session_id: String,
}

impl From<AuthContext> for AuthUser {
    fn from(ctx: AuthContext) -> Self {
        Self {
            user: ctx.user,
            session_id: ctx.session_id,
        }
    }
}

impl<C: Connection> FromRequestParts<AppState<C>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized(SESSION_INVALID))?;

        let ctx = state
            .sessions
            .authenticate(token)
            .await
            .map_err(|_| ApiError::unauthorized(SESSION_INVALID))?;

        Ok(ctx.into())
    }
}

/// An authenticated caller holding the admin role. Exact match, no
/// hierarchy.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<C: Connection> FromRequestParts<AppState<C>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C>,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if auth.user.role != Role::Admin {
            return Err(ApiError::forbidden("Forbidden: insufficient permissions"));
        }
        Ok(AdminUser(auth))
    }
}

/// JSON body extractor whose rejection renders as a 400 with the
/// standard `{"message": ...}` body.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}
