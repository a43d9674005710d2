//! Forward projection of account and subaccount balances to retirement

use serde::{Deserialize, Serialize};

use crate::assumptions::{growth_factor, Assumptions, ForecastVariant, Indicator};
use crate::error::{ForecastError, Result};
use crate::profile::{record_for_year, Profile, YearRecord};
use super::results::{round2, YearlyForecast};

/// How the salary grows between now and retirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SalaryGrowth {
    /// Fixed annual indexation in percent (5.0 = +5% a year)
    Indexation(f64),
    /// Wage growth series of the forecast variant
    #[default]
    Series,
}

/// Balances at the start of the projection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InitialBalances {
    pub account: f64,
    pub subaccount: f64,
}

impl InitialBalances {
    pub fn total(&self) -> f64 {
        self.account + self.subaccount
    }
}

/// Projected rows plus the unrounded closing balances
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProjection {
    pub rows: Vec<YearlyForecast>,
    pub final_account_balance: f64,
    pub final_subaccount_balance: f64,
    /// Initial balances plus every contribution, without valorization
    pub cumulative_contribution: f64,
}

impl AccountProjection {
    pub fn total_capital(&self) -> f64 {
        self.final_account_balance + self.final_subaccount_balance
    }
}

/// Projects yearly contributions and balances from next year to the retirement year
pub struct ForwardProjector<'a> {
    assumptions: &'a Assumptions,
    current_year: i32,
}

impl<'a> ForwardProjector<'a> {
    pub fn new(assumptions: &'a Assumptions, current_year: i32) -> Self {
        Self { assumptions, current_year }
    }

    pub fn project_forward(
        &self,
        profile: &Profile,
        initial: InitialBalances,
        future: &[YearRecord],
        growth: SalaryGrowth,
        variant: ForecastVariant,
    ) -> Result<AccountProjection> {
        let years = profile.years_to_retirement(self.current_year);
        if years < 0 {
            return Err(ForecastError::invalid(format!(
                "retirement year {} is before the current year {}",
                profile.retirement_year, self.current_year
            )));
        }

        let params = &self.assumptions.parameters;
        // Delayed-retirement variants run past the regular horizon
        let max_years = params.max_retirement_horizon_years as i64 + params.max_delay_years as i64;
        if years as i64 > max_years {
            return Err(ForecastError::invalid(format!(
                "projection of {} years exceeds the maximum of {}",
                years, max_years
            )));
        }

        let indicators = &self.assumptions.indicators;
        let main_share = params.main_account_share();
        let valorization = 1.0 + params.valorization_rate;

        let mut account = initial.account;
        let mut subaccount = initial.subaccount;
        let mut cumulative = initial.total();
        let mut indexed_salary = profile.gross_salary;
        let mut rows = Vec::with_capacity(years as usize);

        for i in 1..=years {
            let year = self.current_year + i;

            indexed_salary *= match growth {
                SalaryGrowth::Indexation(rate) => 1.0 + rate / 100.0,
                SalaryGrowth::Series => {
                    growth_factor(indicators.index(Indicator::WageGrowth, variant, year)?)
                }
            };

            let record = record_for_year(future, year);
            let salary = record.and_then(|r| r.salary_override()).unwrap_or(indexed_salary);
            let sick_leave_days = record.map(|r| r.sick_leave_days).unwrap_or(0);

            let mut contribution = salary * params.contribution_rate * 12.0;
            if sick_leave_days > 0 {
                contribution *= (365.0 - sick_leave_days.min(365) as f64) / 365.0;
            }

            // Valorize what is already on the accounts before crediting this year
            account *= valorization;
            subaccount *= valorization;

            account += contribution * main_share;
            subaccount += contribution * (1.0 - main_share);
            cumulative += contribution;

            rows.push(YearlyForecast {
                year,
                age: profile.age + i as u32,
                gross_salary: round2(salary),
                sick_leave_days,
                account_balance: round2(account),
                subaccount_balance: round2(subaccount),
                total_balance: round2(account + subaccount),
                annual_contribution: round2(contribution),
                cumulative_contribution: round2(cumulative),
            });
        }

        Ok(AccountProjection {
            rows,
            final_account_balance: account,
            final_subaccount_balance: subaccount,
            cumulative_contribution: cumulative,
        })
    }
}
