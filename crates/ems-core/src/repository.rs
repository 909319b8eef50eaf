//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in
//! `ems-db`; the auth and server layers depend only on these traits.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EmsResult;
use crate::models::{
    attendance::{Attendance, CreateAttendance, UpdateAttendance},
    employee::{CreateEmployee, Employee, UpdateEmployee},
    payroll::{CreatePayroll, Payroll, UpdatePayroll},
    session::{CreateSession, Session},
    user::{CreateUser, User},
};

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = EmsResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EmsResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = EmsResult<User>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = EmsResult<Session>> + Send;
    fn get(&self, session_id: &str) -> impl Future<Output = EmsResult<Session>> + Send;
    /// Deactivate a session. No-op if the identifier is unknown —
    /// logout is idempotent.
    fn invalidate(&self, session_id: &str) -> impl Future<Output = EmsResult<()>> + Send;
    /// Physically delete every session past its expiry, regardless of
    /// the active flag. Returns the number of rows removed.
    fn delete_expired(&self) -> impl Future<Output = EmsResult<u64>> + Send;
}

pub trait EmployeeRepository: Send + Sync {
    fn create(&self, input: CreateEmployee) -> impl Future<Output = EmsResult<Employee>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EmsResult<Employee>> + Send;
    /// Employees linked to a user account (used for self-scoped reads).
    fn list_by_user(&self, user_id: Uuid)
    -> impl Future<Output = EmsResult<Vec<Employee>>> + Send;
    fn list(&self) -> impl Future<Output = EmsResult<Vec<Employee>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateEmployee,
    ) -> impl Future<Output = EmsResult<Employee>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = EmsResult<()>> + Send;
}

pub trait AttendanceRepository: Send + Sync {
    fn create(&self, input: CreateAttendance)
    -> impl Future<Output = EmsResult<Attendance>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EmsResult<Attendance>> + Send;
    /// Lookup used by the one-entry-per-employee-per-date rule.
    fn get_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = EmsResult<Attendance>> + Send;
    fn list(&self) -> impl Future<Output = EmsResult<Vec<Attendance>>> + Send;
    fn list_by_employee(
        &self,
        employee_id: Uuid,
    ) -> impl Future<Output = EmsResult<Vec<Attendance>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAttendance,
    ) -> impl Future<Output = EmsResult<Attendance>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = EmsResult<()>> + Send;
}

pub trait PayrollRepository: Send + Sync {
    /// Derived fields are computed from the inputs inside the
    /// implementation — callers never supply them.
    fn create(&self, input: CreatePayroll) -> impl Future<Output = EmsResult<Payroll>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EmsResult<Payroll>> + Send;
    fn list(&self) -> impl Future<Output = EmsResult<Vec<Payroll>>> + Send;
    fn list_by_employee(
        &self,
        employee_id: Uuid,
    ) -> impl Future<Output = EmsResult<Vec<Payroll>>> + Send;
    /// Applies the changed inputs, then recomputes every derived field.
    fn update(
        &self,
        id: Uuid,
        input: UpdatePayroll,
    ) -> impl Future<Output = EmsResult<Payroll>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = EmsResult<()>> + Send;
}
