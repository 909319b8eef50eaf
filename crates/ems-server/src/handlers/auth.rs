//! Authentication endpoints: register, login, logout, and session
//! validation.

use axum::Json;
use axum::extract::State;
use axum::http::header::{HeaderMap, SET_COOKIE, USER_AGENT};
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use ems_auth::service::{LoginInput, RegisterInput};
use ems_core::error::EmsError;
use ems_core::models::user::{Role, UserPublic};
use serde::{Deserialize, Serialize};
use serde_json::json;
use surrealdb::Connection;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, SESSION_INVALID};
use crate::state::AppState;

const SESSION_COOKIE: &str = "session_id";

fn session_cookie(session_id: &str, max_age: u64) -> String {
    format!(
        "{SESSION_COOKIE}={session_id}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age}"
    )
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Employee
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub session_id: String,
    pub user: UserPublic,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct SessionIdRequest {
    pub session_id: String,
}

pub async fn register<C: Connection>(
    State(state): State<AppState<C>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserPublic>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !looks_like_email(&body.email) {
        return Err(ApiError::bad_request("Valid email is required"));
    }
    if body.password.len() < 8 {
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    let user = state
        .sessions
        .register(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<(
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<LoginResponse>,
)> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let out = state
        .sessions
        .login(LoginInput {
            email: body.email,
            password: body.password,
            ip_address,
            user_agent,
        })
        .await
        .map_err(|e| match e {
            // Login failures are a 400, uniform for unknown email and
            // wrong password alike.
            EmsError::AuthenticationFailed { .. } => ApiError::bad_request("Invalid credentials"),
            other => other.into(),
        })?;

    let cookie = session_cookie(&out.session_id, out.expires_in);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            token: out.token,
            session_id: out.session_id,
            user: out.user,
            expires_in: out.expires_in,
        }),
    ))
}

pub async fn logout<C: Connection>(
    State(state): State<AppState<C>>,
    ApiJson(body): ApiJson<SessionIdRequest>,
) -> ApiResult<(
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<serde_json::Value>,
)> {
    state.sessions.logout(&body.session_id).await?;

    // Expire the cookie immediately.
    let cookie = session_cookie("", 0);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

pub async fn validate_session<C: Connection>(
    State(state): State<AppState<C>>,
    ApiJson(body): ApiJson<SessionIdRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = state
        .sessions
        .validate_session(&body.session_id)
        .await
        .map_err(|_| ApiError::unauthorized(SESSION_INVALID))?;

    Ok(Json(json!({
        "user": user,
        "session_id": body.session_id,
    })))
}

pub(crate) fn looks_like_email(candidate: &str) -> bool {
    match candidate.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("alice@example.com"));
        assert!(!looks_like_email("alice"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("alice@nodot"));
        assert!(!looks_like_email("alice@.com"));
    }

    #[test]
    fn cookie_format() {
        let cookie = session_cookie("abc", 28_800);
        assert_eq!(
            cookie,
            "session_id=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=28800"
        );
    }
}
