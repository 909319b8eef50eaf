//! SurrealDB implementation of [`PayrollRepository`].
//!
//! The derived fields (hra, pf, esi, professional tax, net salary) are
//! computed here on every create and update — the same boundary where
//! the user repository derives the password hash. Callers can never
//! store a payroll whose derived fields disagree with its inputs.

use chrono::{DateTime, Utc};
use ems_core::error::EmsResult;
use ems_core::models::payroll::{CreatePayroll, Deduction, Payroll, UpdatePayroll};
use ems_core::payroll::{self, PayrollInputs};
use ems_core::repository::PayrollRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, Clone, SurrealValue)]
struct DeductionRow {
    amount: f64,
    reason: String,
}

impl From<Deduction> for DeductionRow {
    fn from(d: Deduction) -> Self {
        Self {
            amount: d.amount,
            reason: d.reason,
        }
    }
}

impl From<DeductionRow> for Deduction {
    fn from(d: DeductionRow) -> Self {
        Self {
            amount: d.amount,
            reason: d.reason,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct PayrollRow {
    employee_id: String,
    month: u32,
    year: i32,
    basic_salary: f64,
    bonuses: f64,
    special_allowance: f64,
    income_tax: f64,
    deductions: Vec<DeductionRow>,
    hra: f64,
    pf: f64,
    esi: f64,
    professional_tax: f64,
    net_salary: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PayrollRowWithId {
    record_id: String,
    employee_id: String,
    month: u32,
    year: i32,
    basic_salary: f64,
    bonuses: f64,
    special_allowance: f64,
    income_tax: f64,
    deductions: Vec<DeductionRow>,
    hra: f64,
    pf: f64,
    esi: f64,
    professional_tax: f64,
    net_salary: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PayrollRow {
    fn into_payroll(self, id: Uuid) -> Result<Payroll, DbError> {
        let employee_id = Uuid::parse_str(&self.employee_id)
            .map_err(|e| DbError::decode("payroll", format!("invalid employee UUID: {e}")))?;
        Ok(Payroll {
            id,
            employee_id,
            month: self.month,
            year: self.year,
            basic_salary: self.basic_salary,
            bonuses: self.bonuses,
            special_allowance: self.special_allowance,
            income_tax: self.income_tax,
            deductions: self.deductions.into_iter().map(Into::into).collect(),
            hra: self.hra,
            pf: self.pf,
            esi: self.esi,
            professional_tax: self.professional_tax,
            net_salary: self.net_salary,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PayrollRowWithId {
    fn try_into_payroll(self) -> Result<Payroll, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::decode("payroll", format!("invalid record UUID: {e}")))?;
        let employee_id = Uuid::parse_str(&self.employee_id)
            .map_err(|e| DbError::decode("payroll", format!("invalid employee UUID: {e}")))?;
        Ok(Payroll {
            id,
            employee_id,
            month: self.month,
            year: self.year,
            basic_salary: self.basic_salary,
            bonuses: self.bonuses,
            special_allowance: self.special_allowance,
            income_tax: self.income_tax,
            deductions: self.deductions.into_iter().map(Into::into).collect(),
            hra: self.hra,
            pf: self.pf,
            esi: self.esi,
            professional_tax: self.professional_tax,
            net_salary: self.net_salary,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Payroll repository.
#[derive(Clone)]
pub struct SurrealPayrollRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPayrollRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PayrollRepository for SurrealPayrollRepository<C> {
    async fn create(&self, input: CreatePayroll) -> EmsResult<Payroll> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let breakdown = payroll::compute(&PayrollInputs {
            basic_salary: input.basic_salary,
            bonuses: input.bonuses,
            special_allowance: input.special_allowance,
            income_tax: input.income_tax,
            deductions: input.deductions.clone(),
        });

        let deduction_rows: Vec<DeductionRow> =
            input.deductions.into_iter().map(Into::into).collect();

        let result = self
            .db
            .query(
                "CREATE type::record('payroll', $id) SET \
                 employee_id = $employee_id, \
                 month = $month, year = $year, \
                 basic_salary = $basic_salary, \
                 bonuses = $bonuses, \
                 special_allowance = $special_allowance, \
                 income_tax = $income_tax, \
                 deductions = $deductions, \
                 hra = $hra, pf = $pf, esi = $esi, \
                 professional_tax = $professional_tax, \
                 net_salary = $net_salary",
            )
            .bind(("id", id_str.clone()))
            .bind(("employee_id", input.employee_id.to_string()))
            .bind(("month", input.month))
            .bind(("year", input.year))
            .bind(("basic_salary", input.basic_salary))
            .bind(("bonuses", input.bonuses))
            .bind(("special_allowance", input.special_allowance))
            .bind(("income_tax", input.income_tax))
            .bind(("deductions", deduction_rows))
            .bind(("hra", breakdown.hra))
            .bind(("pf", breakdown.pf))
            .bind(("esi", breakdown.esi))
            .bind(("professional_tax", breakdown.professional_tax))
            .bind(("net_salary", breakdown.net_salary))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::write("payroll", e))?;

        let rows: Vec<PayrollRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payroll".into(),
            id: id_str,
        })?;

        Ok(row.into_payroll(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> EmsResult<Payroll> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('payroll', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PayrollRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payroll".into(),
            id: id_str,
        })?;

        Ok(row.into_payroll(id)?)
    }

    async fn list(&self) -> EmsResult<Vec<Payroll>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM payroll \
                 ORDER BY year ASC, month ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PayrollRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_payroll())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list_by_employee(&self, employee_id: Uuid) -> EmsResult<Vec<Payroll>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM payroll \
                 WHERE employee_id = $employee_id \
                 ORDER BY year ASC, month ASC",
            )
            .bind(("employee_id", employee_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PayrollRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_payroll())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, input: UpdatePayroll) -> EmsResult<Payroll> {
        let id_str = id.to_string();

        // Read-merge-recompute-write: the stored derived fields must
        // always reflect the current inputs, so the whole row is
        // rewritten rather than patched field by field.
        let current = self.get_by_id(id).await?;

        let employee_id = input.employee_id.unwrap_or(current.employee_id);
        let month = input.month.unwrap_or(current.month);
        let year = input.year.unwrap_or(current.year);
        let basic_salary = input.basic_salary.unwrap_or(current.basic_salary);
        let bonuses = input.bonuses.unwrap_or(current.bonuses);
        let special_allowance = input
            .special_allowance
            .unwrap_or(current.special_allowance);
        let income_tax = input.income_tax.unwrap_or(current.income_tax);
        let deductions = input.deductions.unwrap_or(current.deductions);

        let breakdown = payroll::compute(&PayrollInputs {
            basic_salary,
            bonuses,
            special_allowance,
            income_tax,
            deductions: deductions.clone(),
        });

        let deduction_rows: Vec<DeductionRow> =
            deductions.into_iter().map(Into::into).collect();

        let result = self
            .db
            .query(
                "UPDATE type::record('payroll', $id) SET \
                 employee_id = $employee_id, \
                 month = $month, year = $year, \
                 basic_salary = $basic_salary, \
                 bonuses = $bonuses, \
                 special_allowance = $special_allowance, \
                 income_tax = $income_tax, \
                 deductions = $deductions, \
                 hra = $hra, pf = $pf, esi = $esi, \
                 professional_tax = $professional_tax, \
                 net_salary = $net_salary, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("employee_id", employee_id.to_string()))
            .bind(("month", month))
            .bind(("year", year))
            .bind(("basic_salary", basic_salary))
            .bind(("bonuses", bonuses))
            .bind(("special_allowance", special_allowance))
            .bind(("income_tax", income_tax))
            .bind(("deductions", deduction_rows))
            .bind(("hra", breakdown.hra))
            .bind(("pf", breakdown.pf))
            .bind(("esi", breakdown.esi))
            .bind(("professional_tax", breakdown.professional_tax))
            .bind(("net_salary", breakdown.net_salary))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::write("payroll", e))?;

        let rows: Vec<PayrollRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payroll".into(),
            id: id_str,
        })?;

        Ok(row.into_payroll(id)?)
    }

    async fn delete(&self, id: Uuid) -> EmsResult<()> {
        let id_str = id.to_string();

        self.get_by_id(id).await?;

        self.db
            .query("DELETE type::record('payroll', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
