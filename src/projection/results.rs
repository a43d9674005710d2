//! Output structures produced by the calculation engine

use serde::{Deserialize, Serialize};

use crate::assumptions::{ForecastVariant, PensionBucket};

/// Round a currency or percentage figure to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One reconstructed year of past contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalContribution {
    pub year: i32,
    /// Monthly gross salary used for the year
    pub gross_salary: f64,
    pub sick_leave_days: u32,
    /// Contribution paid during the year
    pub contribution: f64,
    /// Compound CPI factor from the contribution year to the present
    pub valorization_factor: f64,
    /// Contribution expressed in present value
    pub valorized_contribution: f64,
}

/// One projected year of account growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyForecast {
    pub year: i32,
    pub age: u32,
    pub gross_salary: f64,
    pub sick_leave_days: u32,
    pub account_balance: f64,
    pub subaccount_balance: f64,
    pub total_balance: f64,
    pub annual_contribution: f64,
    pub cumulative_contribution: f64,
}

/// Sick-leave effect estimated from gender averages over the whole career
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSickLeaveImpact {
    pub total_sick_days: u32,
    /// Monthly pension reduction in currency units
    pub pension_reduction: f64,
    pub percentage_reduction: f64,
}

/// Sick-leave effect estimated from explicit day entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedSickLeaveImpact {
    pub total_historical_sick_days: u32,
    pub total_future_sick_days: u32,
    pub total_sick_days: u32,
    pub average_days_per_year: f64,
    pub estimated_pension_reduction_percent: f64,
}

/// One year of the post-retirement purchasing power trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasingPowerPoint {
    pub year: i32,
    pub years_after_retirement: u32,
    /// Pension indexed by pensioner inflation
    pub nominal_pension: f64,
    /// Nominal pension in retirement-year prices
    pub purchasing_power: f64,
    /// Pensioner inflation accumulated since retirement, in percent
    pub cumulative_inflation: f64,
}

/// Macroeconomic context of a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicContext {
    pub forecast_variant: ForecastVariant,
    /// Monthly gross salary in the retirement year
    pub future_gross_salary: f64,
    /// Pension as a percentage of the final salary
    pub replacement_rate: f64,
    /// Pension expressed in today's prices
    pub purchasing_power_today: f64,
    /// Mean real GDP growth over the horizon, in percent
    pub average_gdp_growth: f64,
    /// Mean unemployment rate over the horizon, in percent
    pub average_unemployment: f64,
    /// Pensioner inflation accumulated until retirement, in percent
    pub cumulative_inflation: f64,
    pub post_retirement_trajectory: Vec<PurchasingPowerPoint>,
    /// Projected national average pension in the retirement year
    pub avg_pension_retirement_year: f64,
    /// Pension as a percentage of the national average
    pub pension_to_average_ratio: f64,
    pub difference_from_average: f64,
    /// Bracket of the current pension distribution the pension falls into
    pub pension_group: Option<PensionBucket>,
    /// Difference from today's average pension, in percent
    pub percentage_difference_from_average: f64,
}

/// Pension obtained by working longer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayedRetirementOption {
    pub additional_years: u32,
    pub retirement_year: i32,
    pub retirement_age: u32,
    pub monthly_pension: f64,
    pub total_capital: f64,
    pub pension_increase: f64,
}

/// Complete result of a pension calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub forecast_variant: ForecastVariant,
    pub monthly_pension: f64,
    pub monthly_pension_without_sick_leave: f64,
    /// Main account balance at retirement
    pub account_balance: f64,
    /// Subaccount balance at retirement
    pub subaccount_balance: f64,
    /// Total capital converted into the pension
    pub total_contributions: f64,
    pub initial_account_balance: f64,
    pub initial_subaccount_balance: f64,
    pub years_to_retirement: i32,
    pub retirement_age: u32,
    pub sick_leave_impact: AggregateSickLeaveImpact,
    pub economic_context: EconomicContext,
    pub delayed_retirement_options: Vec<DelayedRetirementOption>,
    pub account_growth_forecast: Vec<YearlyForecast>,
}

/// Yearly account growth with the detailed sick-leave estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountGrowthForecast {
    pub initial_account_balance: f64,
    pub initial_subaccount_balance: f64,
    pub rows: Vec<YearlyForecast>,
    pub sick_leave_impact: DetailedSickLeaveImpact,
}

impl AccountGrowthForecast {
    pub fn final_total_balance(&self) -> f64 {
        self.rows
            .last()
            .map(|r| r.total_balance)
            .unwrap_or_else(|| round2(self.initial_account_balance + self.initial_subaccount_balance))
    }
}

/// Outcome of the delayed-retirement search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelaySolution {
    /// Extra working years needed; 0 when the target is out of reach
    pub additional_years: u32,
    pub retirement_year: i32,
    pub monthly_pension: f64,
    pub achievable: bool,
    pub iterations: u32,
}

/// Outcome of the higher-salary search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalarySolution {
    /// Salary meeting the target; 0 when out of reach
    pub required_salary: f64,
    pub salary_increase: f64,
    pub percentage_increase: f64,
    pub monthly_pension: f64,
    pub achievable: bool,
    pub iterations: u32,
}

/// Private savings needed to close the gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSolution {
    pub monthly_savings: f64,
    /// Capital needed at retirement to pay the shortfall for the whole retirement
    pub required_capital: f64,
    pub monthly_shortfall: f64,
    pub annual_return_rate: f64,
    pub saving_months: u32,
}

/// All what-if answers for a target pension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSolution {
    pub target_pension: f64,
    pub projected_pension: f64,
    pub shortfall: f64,
    pub delay: DelaySolution,
    pub salary: SalarySolution,
    pub savings: SavingsSolution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(-2.344), -2.34);
        assert_eq!(round2(1234.5), 1234.5);
    }
}
