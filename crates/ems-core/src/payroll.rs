//! Statutory payroll computation.
//!
//! Deterministic and side-effect free: given the compensation inputs it
//! produces the derived components and the net salary. Every payroll
//! create/update runs through [`compute`] so the stored derived fields
//! can never drift from the inputs.

use crate::models::payroll::Deduction;

/// House rent allowance as a fraction of basic salary.
pub const HRA_RATE: f64 = 0.40;
/// Provident fund contribution as a fraction of basic salary.
pub const PF_RATE: f64 = 0.12;
/// Employee state insurance as a fraction of gross pay.
pub const ESI_RATE: f64 = 0.0075;
/// Flat professional tax. Not configurable per jurisdiction.
pub const PROFESSIONAL_TAX: f64 = 200.0;

/// Compensation inputs to the calculator.
#[derive(Debug, Clone, Default)]
pub struct PayrollInputs {
    pub basic_salary: f64,
    pub bonuses: f64,
    pub special_allowance: f64,
    pub income_tax: f64,
    pub deductions: Vec<Deduction>,
}

/// Derived components and the resulting net salary.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollBreakdown {
    pub hra: f64,
    pub pf: f64,
    pub gross: f64,
    pub esi: f64,
    pub professional_tax: f64,
    pub net_salary: f64,
}

/// Compute the statutory deductions and net salary.
///
/// net = basic + hra + allowance + bonuses
///       − (pf + esi + professional tax + income tax + Σ ad-hoc)
pub fn compute(inputs: &PayrollInputs) -> PayrollBreakdown {
    let hra = HRA_RATE * inputs.basic_salary;
    let pf = PF_RATE * inputs.basic_salary;
    let gross = inputs.basic_salary + hra + inputs.special_allowance + inputs.bonuses;
    let esi = ESI_RATE * gross;
    let total_adhoc: f64 = inputs.deductions.iter().map(|d| d.amount).sum();
    let net_salary =
        gross - (pf + esi + PROFESSIONAL_TAX + inputs.income_tax + total_adhoc);

    PayrollBreakdown {
        hra,
        pf,
        gross,
        esi,
        professional_tax: PROFESSIONAL_TAX,
        net_salary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn inputs(basic: f64) -> PayrollInputs {
        PayrollInputs {
            basic_salary: basic,
            ..Default::default()
        }
    }

    #[test]
    fn hra_and_pf_are_fixed_fractions_of_basic() {
        for basic in [0.0, 1.0, 12_345.67, 50_000.0, 1_000_000.0] {
            let b = compute(&inputs(basic));
            assert!((b.hra - 0.40 * basic).abs() < EPS);
            assert!((b.pf - 0.12 * basic).abs() < EPS);
        }
    }

    #[test]
    fn reference_scenario() {
        let b = compute(&PayrollInputs {
            basic_salary: 50_000.0,
            bonuses: 2_000.0,
            special_allowance: 1_000.0,
            income_tax: 500.0,
            deductions: vec![Deduction {
                amount: 300.0,
                reason: "fine".into(),
            }],
        });

        assert!((b.hra - 20_000.0).abs() < EPS);
        assert!((b.pf - 6_000.0).abs() < EPS);
        assert!((b.gross - 73_000.0).abs() < EPS);
        assert!((b.esi - 547.5).abs() < EPS);
        assert!((b.professional_tax - 200.0).abs() < EPS);
        assert!((b.net_salary - 65_452.5).abs() < EPS);
    }

    #[test]
    fn net_salary_decreases_with_income_tax() {
        let mut previous = f64::INFINITY;
        for tax in [0.0, 100.0, 500.0, 2_500.0] {
            let b = compute(&PayrollInputs {
                income_tax: tax,
                ..inputs(40_000.0)
            });
            assert!(b.net_salary < previous);
            previous = b.net_salary;
        }
    }

    #[test]
    fn net_salary_decreases_with_adhoc_deductions() {
        let base = compute(&inputs(40_000.0));
        let with_deductions = compute(&PayrollInputs {
            deductions: vec![
                Deduction {
                    amount: 150.0,
                    reason: "late".into(),
                },
                Deduction {
                    amount: 250.0,
                    reason: "advance recovery".into(),
                },
            ],
            ..inputs(40_000.0)
        });
        assert!((base.net_salary - with_deductions.net_salary - 400.0).abs() < EPS);
    }

    #[test]
    fn zero_inputs_yield_only_professional_tax_liability() {
        let b = compute(&PayrollInputs::default());
        assert!((b.gross - 0.0).abs() < EPS);
        assert!((b.net_salary + PROFESSIONAL_TAX).abs() < EPS);
    }

    #[test]
    fn recompute_is_deterministic() {
        let i = PayrollInputs {
            basic_salary: 31_337.0,
            bonuses: 42.0,
            special_allowance: 7.5,
            income_tax: 99.0,
            deductions: vec![Deduction {
                amount: 10.0,
                reason: "misc".into(),
            }],
        };
        assert_eq!(compute(&i), compute(&i));
    }
}
