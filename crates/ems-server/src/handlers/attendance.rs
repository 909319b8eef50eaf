//! Attendance endpoints. Any authenticated user can mark and manage
//! attendance; listings are scoped to the caller's own employee
//! records for non-admins.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ems_core::error::EmsError;
use ems_core::models::attendance::{Attendance, CreateAttendance, UpdateAttendance};
use ems_core::models::user::Role;
use ems_core::repository::{AttendanceRepository, EmployeeRepository};
use serde_json::json;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;

pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    _auth: AuthUser,
    ApiJson(body): ApiJson<CreateAttendance>,
) -> ApiResult<(StatusCode, Json<Attendance>)> {
    // One entry per employee per day.
    match state
        .attendance
        .get_by_employee_and_date(body.employee_id, body.date)
        .await
    {
        Ok(_) => {
            return Err(ApiError::bad_request(
                "Attendance already marked for this date",
            ));
        }
        Err(EmsError::NotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    let attendance = state.attendance.create(body).await?;
    Ok((StatusCode::CREATED, Json(attendance)))
}

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Attendance>>> {
    let records = match auth.user.role {
        Role::Admin => state.attendance.list().await?,
        Role::Employee => {
            let mut records = Vec::new();
            for employee in state.employees.list_by_user(auth.user.id).await? {
                records.extend(state.attendance.list_by_employee(employee.id).await?);
            }
            records
        }
    };
    Ok(Json(records))
}

pub async fn list_for_employee<C: Connection>(
    State(state): State<AppState<C>>,
    auth: AuthUser,
    Path(employee_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Attendance>>> {
    ensure_owner_or_admin(&state, &auth, employee_id).await?;
    let records = state.attendance.list_by_employee(employee_id).await?;
    Ok(Json(records))
}

pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateAttendance>,
) -> ApiResult<Json<Attendance>> {
    let attendance = state.attendance.update(id, body).await?;
    Ok(Json(attendance))
}

pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.attendance.delete(id).await?;
    Ok(Json(json!({ "message": "Attendance record removed" })))
}

/// Admins pass; everyone else must own the employee record through
/// their user account.
pub(crate) async fn ensure_owner_or_admin<C: Connection>(
    state: &AppState<C>,
    auth: &AuthUser,
    employee_id: Uuid,
) -> ApiResult<()> {
    if auth.user.role == Role::Admin {
        return Ok(());
    }
    let employee = state.employees.get_by_id(employee_id).await?;
    if employee.user_id != Some(auth.user.id) {
        return Err(ApiError::forbidden("Forbidden: insufficient permissions"));
    }
    Ok(())
}
