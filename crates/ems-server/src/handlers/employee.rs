//! Employee CRUD. Writes are admin-only; reads are scoped to the
//! caller's own record for non-admins.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ems_core::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use ems_core::models::user::Role;
use ems_core::repository::EmployeeRepository;
use serde_json::json;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminUser, ApiJson, AuthUser};
use crate::handlers::auth::looks_like_email;
use crate::state::AppState;

fn validate_create(input: &CreateEmployee) -> ApiResult<()> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !looks_like_email(&input.email) {
        return Err(ApiError::bad_request("Valid email is required"));
    }
    if input.position.trim().is_empty() {
        return Err(ApiError::bad_request("Position is required"));
    }
    if input.department.trim().is_empty() {
        return Err(ApiError::bad_request("Department is required"));
    }
    if input.salary < 0.0 {
        return Err(ApiError::bad_request("Salary must not be negative"));
    }
    Ok(())
}

fn validate_update(input: &UpdateEmployee) -> ApiResult<()> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::bad_request("Name is required"));
    }
    if input.email.as_deref().is_some_and(|e| !looks_like_email(e)) {
        return Err(ApiError::bad_request("Valid email is required"));
    }
    if input
        .position
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(ApiError::bad_request("Position is required"));
    }
    if input
        .department
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        return Err(ApiError::bad_request("Department is required"));
    }
    if input.salary.is_some_and(|s| s < 0.0) {
        return Err(ApiError::bad_request("Salary must not be negative"));
    }
    Ok(())
}

pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    AdminUser(_): AdminUser,
    ApiJson(body): ApiJson<CreateEmployee>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    validate_create(&body)?;
    let employee = state.employees.create(body).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Employee>>> {
    let employees = match auth.user.role {
        Role::Admin => state.employees.list().await?,
        Role::Employee => state.employees.list_by_user(auth.user.id).await?,
    };
    Ok(Json(employees))
}

pub async fn get<C: Connection>(
    State(state): State<AppState<C>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    let employee = state.employees.get_by_id(id).await?;
    if auth.user.role != Role::Admin && employee.user_id != Some(auth.user.id) {
        return Err(ApiError::forbidden("Forbidden: insufficient permissions"));
    }
    Ok(Json(employee))
}

pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateEmployee>,
) -> ApiResult<Json<Employee>> {
    validate_update(&body)?;
    let employee = state.employees.update(id, body).await?;
    Ok(Json(employee))
}

pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.employees.delete(id).await?;
    Ok(Json(json!({ "message": "Employee removed" })))
}
