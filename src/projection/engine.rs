//! Pension calculation engine
//!
//! Ties the projection stages together: historical reconstruction of the
//! opening balances, forward projection to the retirement year, annuitization,
//! sick-leave adjustment, economic context and delayed-retirement options.

use chrono::Datelike;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, ForecastVariant, Indicator};
use crate::error::{ForecastError, Result};
use crate::profile::{Profile, YearRecord};
use super::annuity::PensionAnnuitizer;
use super::economy::EconomicContextAnalyzer;
use super::forward::{AccountProjection, ForwardProjector, InitialBalances, SalaryGrowth};
use super::history::HistoricalReconstructor;
use super::results::{
    round2, AccountGrowthForecast, AggregateSickLeaveImpact, CalculationResult,
    DelayedRetirementOption, TargetSolution,
};
use super::sick_leave::SickLeaveImpactEstimator;
use super::solver::ScenarioSolver;

/// Indicators a full calculation reads
pub const REQUIRED_INDICATORS: [Indicator; 5] = [
    Indicator::WageGrowth,
    Indicator::CpiTotal,
    Indicator::CpiPensioners,
    Indicator::GdpGrowth,
    Indicator::Unemployment,
];

/// Calendar years accepted as the current year
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1900..=2200;

/// Per-call options of a calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOptions {
    /// Calendar year treated as "now"
    pub current_year: i32,

    /// Forecast variant; `None` uses the configured default
    pub variant: Option<ForecastVariant>,

    /// Subtract the aggregate sick-leave reduction from the monthly pension
    pub include_sick_leave: bool,

    /// Actual past salaries and sick days, overriding reconstructed years
    pub historical_data: Vec<YearRecord>,

    /// Planned future salaries and sick days, overriding projected years
    pub future_data: Vec<YearRecord>,

    /// Additional working years evaluated as delayed-retirement options
    pub delay_offsets: Vec<u32>,
}

impl CalculationOptions {
    pub fn for_year(current_year: i32) -> Self {
        Self {
            current_year,
            variant: None,
            include_sick_leave: false,
            historical_data: Vec::new(),
            future_data: Vec::new(),
            delay_offsets: vec![1, 2, 5],
        }
    }

    pub fn with_variant(mut self, variant: ForecastVariant) -> Self {
        self.variant = Some(variant);
        self
    }
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self::for_year(chrono::Local::now().year())
    }
}

/// One pass through the projection stages for a single retirement year
#[derive(Debug, Clone)]
pub(crate) struct PensionProjection {
    pub projection: AccountProjection,
    pub pension_without_sick_leave: f64,
    pub sick_leave: AggregateSickLeaveImpact,
    pub monthly_pension: f64,
}

/// Main calculation engine
#[derive(Debug, Clone)]
pub struct PensionEngine {
    assumptions: Assumptions,
}

impl PensionEngine {
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Full pension calculation for one person
    pub fn calculate_pension(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
    ) -> Result<CalculationResult> {
        let variant = self.prepare(profile, options)?;
        let cy = options.current_year;

        let initial = self.initial_balances(profile, options, variant)?;
        let base = self.project(profile, initial, options, variant)?;

        let economic_context = EconomicContextAnalyzer::new(&self.assumptions, cy).analyze(
            profile.gross_salary,
            base.monthly_pension,
            profile.retirement_year,
            variant,
        )?;

        let mut delayed_retirement_options = Vec::with_capacity(options.delay_offsets.len());
        for &years in &options.delay_offsets {
            let delayed = Profile {
                retirement_year: profile.retirement_year + years as i32,
                ..profile.clone()
            };
            let outcome = self.project(&delayed, initial, options, variant)?;
            delayed_retirement_options.push(DelayedRetirementOption {
                additional_years: years,
                retirement_year: delayed.retirement_year,
                retirement_age: delayed.retirement_age(cy),
                monthly_pension: round2(outcome.monthly_pension),
                total_capital: round2(outcome.projection.total_capital()),
                pension_increase: round2(outcome.monthly_pension - base.monthly_pension),
            });
        }

        debug!(
            "{} age {} retiring {} ({}): capital {:.2}, pension {:.2}",
            profile.gender,
            profile.age,
            profile.retirement_year,
            variant,
            base.projection.total_capital(),
            base.monthly_pension
        );

        Ok(CalculationResult {
            forecast_variant: variant,
            monthly_pension: round2(base.monthly_pension),
            monthly_pension_without_sick_leave: round2(base.pension_without_sick_leave),
            account_balance: round2(base.projection.final_account_balance),
            subaccount_balance: round2(base.projection.final_subaccount_balance),
            total_contributions: round2(base.projection.total_capital()),
            initial_account_balance: round2(initial.account),
            initial_subaccount_balance: round2(initial.subaccount),
            years_to_retirement: profile.years_to_retirement(cy),
            retirement_age: profile.retirement_age(cy),
            sick_leave_impact: base.sick_leave,
            economic_context,
            delayed_retirement_options,
            account_growth_forecast: base.projection.rows,
        })
    }

    /// Year-by-year account growth with the detailed sick-leave estimate
    pub fn project_account_growth(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        growth: SalaryGrowth,
    ) -> Result<AccountGrowthForecast> {
        let variant = self.prepare(profile, options)?;
        if let SalaryGrowth::Indexation(rate) = growth {
            if !rate.is_finite() || rate <= -100.0 {
                return Err(ForecastError::invalid(format!(
                    "salary indexation must be above -100%, got {}",
                    rate
                )));
            }
        }

        let initial = self.initial_balances(profile, options, variant)?;
        let projection = ForwardProjector::new(&self.assumptions, options.current_year)
            .project_forward(profile, initial, &options.future_data, growth, variant)?;
        let sick_leave_impact = SickLeaveImpactEstimator::new(&self.assumptions.parameters)
            .detailed_impact(&options.historical_data, &options.future_data);

        Ok(AccountGrowthForecast {
            initial_account_balance: round2(initial.account),
            initial_subaccount_balance: round2(initial.subaccount),
            rows: projection.rows,
            sick_leave_impact,
        })
    }

    /// Delay, salary and savings answers for reaching `target_pension`
    pub fn solve_for_target(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        target_pension: f64,
    ) -> Result<TargetSolution> {
        if !target_pension.is_finite() || target_pension <= 0.0 {
            return Err(ForecastError::invalid(format!(
                "target pension must be positive, got {}",
                target_pension
            )));
        }
        let variant = self.prepare(profile, options)?;
        ScenarioSolver::new(self).solve(profile, options, variant, target_pension)
    }

    /// Entry-point validation; resolves the forecast variant
    fn prepare(&self, profile: &Profile, options: &CalculationOptions) -> Result<ForecastVariant> {
        let params = &self.assumptions.parameters;
        params.validate()?;
        if !SUPPORTED_YEARS.contains(&options.current_year) {
            return Err(ForecastError::invalid(format!(
                "current year {} is outside {}..={}",
                options.current_year,
                SUPPORTED_YEARS.start(),
                SUPPORTED_YEARS.end()
            )));
        }
        profile.validate(options.current_year, params)?;
        if let Some(&years) = options
            .delay_offsets
            .iter()
            .find(|&&years| years > params.max_delay_years)
        {
            return Err(ForecastError::invalid(format!(
                "delay of {} years exceeds the maximum of {}",
                years, params.max_delay_years
            )));
        }
        for record in options.historical_data.iter().chain(&options.future_data) {
            record.validate()?;
        }

        let variant = options.variant.unwrap_or(params.default_forecast_variant);
        self.assumptions
            .indicators
            .ensure_variant(variant, &REQUIRED_INDICATORS)?;
        Ok(variant)
    }

    /// Supplied balances, or balances rebuilt from the years already worked
    pub(crate) fn initial_balances(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        variant: ForecastVariant,
    ) -> Result<InitialBalances> {
        let history = HistoricalReconstructor::new(&self.assumptions, options.current_year);

        let account = match profile.account_balance {
            Some(balance) => balance,
            None => {
                let years_worked = profile.years_worked(&self.assumptions.parameters) as i32;
                let rows = history.reconstruct(
                    profile.gross_salary,
                    years_worked,
                    &options.historical_data,
                    variant,
                )?;
                rows.iter().map(|r| r.valorized_contribution).sum()
            }
        };
        let subaccount = profile
            .subaccount_balance
            .unwrap_or_else(|| history.estimate_subaccount_balance(account));

        Ok(InitialBalances { account, subaccount })
    }

    /// Forward projection, annuitization and sick-leave adjustment
    pub(crate) fn project(
        &self,
        profile: &Profile,
        initial: InitialBalances,
        options: &CalculationOptions,
        variant: ForecastVariant,
    ) -> Result<PensionProjection> {
        let params = &self.assumptions.parameters;
        let cy = options.current_year;

        let projection = ForwardProjector::new(&self.assumptions, cy).project_forward(
            profile,
            initial,
            &options.future_data,
            SalaryGrowth::Series,
            variant,
        )?;

        let pension_without_sick_leave =
            PensionAnnuitizer::new(params).monthly_pension(projection.total_capital(), profile.gender);

        let sick_leave = SickLeaveImpactEstimator::new(params).aggregate_impact(
            profile.gender,
            profile.age,
            profile.years_to_retirement(cy),
            pension_without_sick_leave,
        );

        let monthly_pension = if options.include_sick_leave {
            pension_without_sick_leave - sick_leave.pension_reduction
        } else {
            pension_without_sick_leave
        };

        Ok(PensionProjection {
            projection,
            pension_without_sick_leave,
            sick_leave,
            monthly_pension,
        })
    }
}
