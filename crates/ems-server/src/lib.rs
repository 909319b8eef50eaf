//! EMS Server — REST API over the auth and database layers.
//!
//! Exposes the router builder and application state so integration
//! tests can drive the API against an in-memory database.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod reaper;
pub mod state;

pub use state::AppState;

use axum::Router;
use axum::routing::{get, post, put};
use surrealdb::Connection;

use crate::handlers::{attendance, auth, employee, payroll};

async fn root() -> &'static str {
    "EMS backend running"
}

/// Build the full application router.
pub fn router<C: Connection + Clone>(state: AppState<C>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/auth/register", post(auth::register::<C>))
        .route("/api/auth/login", post(auth::login::<C>))
        .route("/api/auth/logout", post(auth::logout::<C>))
        .route(
            "/api/auth/validate-session",
            post(auth::validate_session::<C>),
        )
        .route(
            "/api/employees",
            post(employee::create::<C>).get(employee::list::<C>),
        )
        .route(
            "/api/employees/{id}",
            get(employee::get::<C>)
                .put(employee::update::<C>)
                .delete(employee::delete::<C>),
        )
        .route(
            "/api/attendance",
            post(attendance::create::<C>).get(attendance::list::<C>),
        )
        .route(
            "/api/attendance/employee/{employee_id}",
            get(attendance::list_for_employee::<C>),
        )
        .route(
            "/api/attendance/{id}",
            put(attendance::update::<C>).delete(attendance::delete::<C>),
        )
        .route(
            "/api/payroll",
            post(payroll::create::<C>).get(payroll::list::<C>),
        )
        .route(
            "/api/payroll/employee/{employee_id}",
            get(payroll::list_for_employee::<C>),
        )
        .route(
            "/api/payroll/{id}",
            put(payroll::update::<C>).delete(payroll::delete::<C>),
        )
        .with_state(state)
}
