//! Reconstruction of past contributions
//!
//! The current salary is deflated backward through the wage growth index to
//! estimate what was earned in each past year. Each year's contribution is then
//! valorized forward to the present through the CPI index.

use crate::assumptions::{growth_factor, Assumptions, ForecastVariant, Indicator};
use crate::error::{ForecastError, Result};
use crate::profile::{record_for_year, YearRecord};
use super::results::HistoricalContribution;

/// Rebuilds the wage and contribution history of a person
pub struct HistoricalReconstructor<'a> {
    assumptions: &'a Assumptions,
    current_year: i32,
}

impl<'a> HistoricalReconstructor<'a> {
    pub fn new(assumptions: &'a Assumptions, current_year: i32) -> Self {
        Self { assumptions, current_year }
    }

    /// Present value of all contributions paid over `years_worked` years
    pub fn estimate_account_balance(
        &self,
        current_salary: f64,
        years_worked: i32,
        variant: ForecastVariant,
    ) -> Result<f64> {
        let rows = self.reconstruct(current_salary, years_worked, &[], variant)?;
        Ok(rows.iter().map(|r| r.valorized_contribution).sum())
    }

    /// Subaccount balance implied by a main account balance
    pub fn estimate_subaccount_balance(&self, account_balance: f64) -> f64 {
        account_balance * self.assumptions.parameters.subaccount_percentage
    }

    /// Per-year history, earliest year first
    ///
    /// Records with a positive salary replace the back-derived salary of their
    /// year; their sick days scale that year's contribution by the worked fraction.
    pub fn reconstruct(
        &self,
        current_salary: f64,
        years_worked: i32,
        records: &[YearRecord],
        variant: ForecastVariant,
    ) -> Result<Vec<HistoricalContribution>> {
        if years_worked <= 0 {
            return Ok(Vec::new());
        }
        let max_age = self.assumptions.parameters.max_age;
        if years_worked as u32 > max_age {
            return Err(ForecastError::invalid(format!(
                "{} years worked exceeds the maximum age of {}",
                years_worked, max_age
            )));
        }

        let indicators = &self.assumptions.indicators;
        let contribution_rate = self.assumptions.parameters.contribution_rate;

        // Walk backward from the present: salary(Y) = salary(Y+1) / wage(Y+1),
        // valorization(Y) = valorization(Y+1) * cpi(Y+1)
        let mut salary = current_salary;
        let mut valorization = 1.0;
        let mut rows = Vec::with_capacity(years_worked as usize);

        for years_ago in 1..=years_worked {
            let year = self.current_year - years_ago;
            let following = year + 1;

            salary /= growth_factor(indicators.index(Indicator::WageGrowth, variant, following)?);
            valorization *= growth_factor(indicators.index(Indicator::CpiTotal, variant, following)?);

            let record = record_for_year(records, year);
            let gross_salary = record.and_then(|r| r.salary_override()).unwrap_or(salary);
            let sick_leave_days = record.map(|r| r.sick_leave_days).unwrap_or(0);

            let mut contribution = gross_salary * contribution_rate * 12.0;
            if let Some(r) = record.filter(|r| r.sick_leave_days > 0) {
                contribution *= r.working_fraction();
            }

            rows.push(HistoricalContribution {
                year,
                gross_salary,
                sick_leave_days,
                contribution,
                valorization_factor: valorization,
                valorized_contribution: contribution * valorization,
            });
        }

        rows.reverse();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::PensionParameters;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_years_worked() {
        let assumptions = Assumptions::default_forecast();
        let history = HistoricalReconstructor::new(&assumptions, 2025);
        let balance = history
            .estimate_account_balance(6000.0, 0, ForecastVariant::Intermediate)
            .unwrap();
        assert_eq!(balance, 0.0);
        assert_eq!(
            history.estimate_account_balance(6000.0, -3, ForecastVariant::Intermediate).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_career_longer_than_max_age_rejected() {
        let assumptions = Assumptions::default_forecast();
        let history = HistoricalReconstructor::new(&assumptions, 2025);
        assert!(history.reconstruct(6000.0, 100, &[], ForecastVariant::Intermediate).is_ok());
        let result = history.estimate_account_balance(6000.0, i32::MAX, ForecastVariant::Intermediate);
        assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
    }

    #[test]
    fn test_constant_rates_match_closed_form() {
        // 5% wage growth and 5% valorization cancel out: every year is worth salary * rate * 12
        let assumptions = Assumptions::constants(PensionParameters::default());
        let history = HistoricalReconstructor::new(&assumptions, 2025);
        let balance = history
            .estimate_account_balance(6000.0, 5, ForecastVariant::Intermediate)
            .unwrap();
        assert_relative_eq!(balance, 5.0 * 6000.0 * 0.1952 * 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rows_ordered_and_compounded() {
        let assumptions = Assumptions::default_forecast();
        let history = HistoricalReconstructor::new(&assumptions, 2025);
        let rows = history
            .reconstruct(6000.0, 3, &[], ForecastVariant::Intermediate)
            .unwrap();

        assert_eq!(rows.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2022, 2023, 2024]);

        // 2024 salary = 6000 / wage(2025)
        assert_relative_eq!(rows[2].gross_salary, 6000.0 / 1.075, max_relative = 1e-12);
        // 2024 contribution valorized by cpi(2025)
        assert_relative_eq!(rows[2].valorization_factor, 1.04, max_relative = 1e-12);
        // 2022 salary = 6000 / (wage(2025) * wage(2024) * wage(2023))
        assert_relative_eq!(
            rows[0].gross_salary,
            6000.0 / (1.075 * 1.11 * 1.128),
            max_relative = 1e-12
        );
        assert_relative_eq!(rows[0].valorization_factor, 1.04 * 1.036 * 1.114, max_relative = 1e-12);
    }

    #[test]
    fn test_records_override_salary_and_reduce_for_sick_leave() {
        let assumptions = Assumptions::default_forecast();
        let history = HistoricalReconstructor::new(&assumptions, 2025);
        let records = [YearRecord::new(2024, 5000.0, 73), YearRecord::new(2023, 0.0, 0)];
        let rows = history
            .reconstruct(6000.0, 2, &records, ForecastVariant::Intermediate)
            .unwrap();

        assert_eq!(rows[1].gross_salary, 5000.0);
        assert_relative_eq!(rows[1].contribution, 5000.0 * 0.1952 * 12.0 * 0.8, max_relative = 1e-12);
        // zero salary falls through to the back-derived value
        assert_relative_eq!(rows[0].gross_salary, 6000.0 / (1.075 * 1.11), max_relative = 1e-12);
    }

    #[test]
    fn test_subaccount_share() {
        let assumptions = Assumptions::default_forecast();
        let history = HistoricalReconstructor::new(&assumptions, 2025);
        assert_relative_eq!(history.estimate_subaccount_balance(100_000.0), 25_000.0);
    }
}
