//! Payroll domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ad-hoc deduction line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deduction {
    pub amount: f64,
    pub reason: String,
}

/// One employee's compensation for a (month, year) pair.
///
/// `hra`, `pf`, `esi`, `professional_tax`, and `net_salary` are always
/// derived from the inputs by the payroll calculator — they are
/// recomputed on every create and update, never supplied directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payroll {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// 1–12.
    pub month: u32,
    pub year: i32,
    pub basic_salary: f64,
    pub bonuses: f64,
    pub special_allowance: f64,
    pub income_tax: f64,
    pub deductions: Vec<Deduction>,
    pub hra: f64,
    pub pf: f64,
    pub esi: f64,
    pub professional_tax: f64,
    pub net_salary: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Only the basic salary is mandatory; the remaining inputs default to
/// zero (or an empty deduction list) when a request omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayroll {
    pub employee_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub basic_salary: f64,
    #[serde(default)]
    pub bonuses: f64,
    #[serde(default)]
    pub special_allowance: f64,
    #[serde(default)]
    pub income_tax: f64,
    #[serde(default)]
    pub deductions: Vec<Deduction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePayroll {
    pub employee_id: Option<Uuid>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub basic_salary: Option<f64>,
    pub bonuses: Option<f64>,
    pub special_allowance: Option<f64>,
    pub income_tax: Option<f64>,
    pub deductions: Option<Vec<Deduction>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payroll_defaults_omitted_inputs_to_zero() {
        let body = format!(
            r#"{{"employee_id": "{}", "month": 7, "year": 2025, "basic_salary": 50000.0}}"#,
            Uuid::new_v4(),
        );
        let input: CreatePayroll = serde_json::from_str(&body).unwrap();
        assert_eq!(input.bonuses, 0.0);
        assert_eq!(input.special_allowance, 0.0);
        assert_eq!(input.income_tax, 0.0);
        assert!(input.deductions.is_empty());
    }
}
