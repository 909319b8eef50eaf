//! Payroll endpoints. Writes are admin-only; the repository derives
//! every computed field, so responses always carry a net salary that
//! matches the stored inputs.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ems_core::models::payroll::{CreatePayroll, Payroll, UpdatePayroll};
use ems_core::models::user::Role;
use ems_core::repository::{EmployeeRepository, PayrollRepository};
use serde_json::json;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminUser, ApiJson, AuthUser};
use crate::handlers::attendance::ensure_owner_or_admin;
use crate::state::AppState;

fn validate_month(month: u32) -> ApiResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::bad_request("Month must be between 1 and 12"));
    }
    Ok(())
}

pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    AdminUser(_): AdminUser,
    ApiJson(body): ApiJson<CreatePayroll>,
) -> ApiResult<(StatusCode, Json<Payroll>)> {
    validate_month(body.month)?;
    if body.basic_salary < 0.0 {
        return Err(ApiError::bad_request("Basic salary must not be negative"));
    }
    let payroll = state.payroll.create(body).await?;
    Ok((StatusCode::CREATED, Json(payroll)))
}

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Payroll>>> {
    let records = match auth.user.role {
        Role::Admin => state.payroll.list().await?,
        Role::Employee => {
            let mut records = Vec::new();
            for employee in state.employees.list_by_user(auth.user.id).await? {
                records.extend(state.payroll.list_by_employee(employee.id).await?);
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
) -> ApiResult<Json<Vec<Payroll>>> {
    ensure_owner_or_admin(&state, &auth, employee_id).await?;
    let records = state.payroll.list_by_employee(employee_id).await?;
    Ok(Json(records))
}

pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdatePayroll>,
) -> ApiResult<Json<Payroll>> {
    if let Some(month) = body.month {
        validate_month(month)?;
    }
    if body.basic_salary.is_some_and(|s| s < 0.0) {
        return Err(ApiError::bad_request("Basic salary must not be negative"));
    }
    let payroll = state.payroll.update(id, body).await?;
    Ok(Json(payroll))
}

pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.payroll.delete(id).await?;
    Ok(Json(json!({ "message": "Payroll record removed" })))
}
