//! SurrealDB implementation of [`AttendanceRepository`].
//!
//! Dates are stored as ISO `YYYY-MM-DD` strings; the unique index over
//! (employee_id, date) backs the one-entry-per-day rule.

use chrono::{DateTime, NaiveDate, Utc};
use ems_core::error::EmsResult;
use ems_core::models::attendance::{
    Attendance, AttendanceStatus, CreateAttendance, UpdateAttendance,
};
use ems_core::repository::AttendanceRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, SurrealValue)]
struct AttendanceRow {
    employee_id: String,
    date: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AttendanceRowWithId {
    record_id: String,
    employee_id: String,
    date: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<AttendanceStatus, DbError> {
    match s {
        "Present" => Ok(AttendanceStatus::Present),
        "Absent" => Ok(AttendanceStatus::Absent),
        "Leave" => Ok(AttendanceStatus::Leave),
        other => Err(DbError::decode(
            "attendance",
            format!("unknown status: {other}"),
        )),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DbError::decode("attendance", format!("invalid date: {e}")))
}

impl AttendanceRow {
    fn into_attendance(self, id: Uuid) -> Result<Attendance, DbError> {
        let employee_id = Uuid::parse_str(&self.employee_id)
            .map_err(|e| DbError::decode("attendance", format!("invalid employee UUID: {e}")))?;
        Ok(Attendance {
            id,
            employee_id,
            date: parse_date(&self.date)?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AttendanceRowWithId {
    fn try_into_attendance(self) -> Result<Attendance, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::decode("attendance", format!("invalid record UUID: {e}")))?;
        let employee_id = Uuid::parse_str(&self.employee_id)
            .map_err(|e| DbError::decode("attendance", format!("invalid employee UUID: {e}")))?;
        Ok(Attendance {
            id,
            employee_id,
            date: parse_date(&self.date)?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Attendance repository.
#[derive(Clone)]
pub struct SurrealAttendanceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAttendanceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AttendanceRepository for SurrealAttendanceRepository<C> {
    async fn create(&self, input: CreateAttendance) -> EmsResult<Attendance> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('attendance', $id) SET \
                 employee_id = $employee_id, \
                 date = $date, \
                 status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("employee_id", input.employee_id.to_string()))
            .bind(("date", input.date.format(DATE_FORMAT).to_string()))
            .bind(("status", input.status.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::write("attendance", e))?;

        let rows: Vec<AttendanceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "attendance".into(),
            id: id_str,
        })?;

        Ok(row.into_attendance(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> EmsResult<Attendance> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('attendance', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AttendanceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "attendance".into(),
            id: id_str,
        })?;

        Ok(row.into_attendance(id)?)
    }

    async fn get_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> EmsResult<Attendance> {
        let date_str = date.format(DATE_FORMAT).to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM attendance \
                 WHERE employee_id = $employee_id AND date = $date",
            )
            .bind(("employee_id", employee_id.to_string()))
            .bind(("date", date_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AttendanceRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "attendance".into(),
            id: format!("employee={employee_id} date={date_str}"),
        })?;

        Ok(row.try_into_attendance()?)
    }

    async fn list(&self) -> EmsResult<Vec<Attendance>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM attendance \
                 ORDER BY date ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AttendanceRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_attendance())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list_by_employee(&self, employee_id: Uuid) -> EmsResult<Vec<Attendance>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM attendance \
                 WHERE employee_id = $employee_id \
                 ORDER BY date ASC",
            )
            .bind(("employee_id", employee_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AttendanceRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_attendance())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, input: UpdateAttendance) -> EmsResult<Attendance> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.date.is_some() {
            sets.push("date = $date");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('attendance', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(date) = input.date {
            builder = builder.bind(("date", date.format(DATE_FORMAT).to_string()));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::write("attendance", e))?;

        let rows: Vec<AttendanceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "attendance".into(),
            id: id_str,
        })?;

        Ok(row.into_attendance(id)?)
    }

    async fn delete(&self, id: Uuid) -> EmsResult<()> {
        let id_str = id.to_string();

        self.get_by_id(id).await?;

        self.db
            .query("DELETE type::record('attendance', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
