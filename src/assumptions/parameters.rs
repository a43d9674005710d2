//! Named calculation parameters with statutory-style defaults
//!
//! Parameters are fixed when the engine is built. Overrides come from a
//! `name,value` CSV file, from `PENSION_*` environment variables or from
//! struct update syntax; the engine never reads ambient state while it runs.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use super::indicators::ForecastVariant;
use crate::error::{ForecastError, Result};
use crate::profile::Gender;

/// Default location of the parameter override file
pub const DEFAULT_PARAMETERS_PATH: &str = "data/parameters.csv";

/// Names accepted by [`PensionParameters::set`], in declaration order
pub const PARAMETER_NAMES: &[&str] = &[
    "contribution_rate",
    "account_contribution_rate",
    "average_wage_growth",
    "valorization_rate",
    "assumed_inflation_rate",
    "default_gdp_growth",
    "default_unemployment_rate",
    "default_collection_rate",
    "default_work_start_age",
    "retirement_age_male",
    "retirement_age_female",
    "life_expectancy_male",
    "life_expectancy_female",
    "sick_days_per_year_male",
    "sick_days_per_year_female",
    "working_days_per_year",
    "sick_leave_contribution_loss",
    "detailed_sick_leave_loss",
    "subaccount_percentage",
    "default_investment_return_rate",
    "default_forecast_variant",
    "average_pension_baseline",
    "average_pension_wage_weight",
    "average_pension_inflation_weight",
    "max_delay_years",
    "salary_step_fraction",
    "max_salary_multiple",
    "trajectory_years",
    "max_retirement_horizon_years",
    "max_age",
];

/// Upper bound for the year-count parameters driving loops
const MAX_LOOP_YEARS: u32 = 100;

/// Upper bound for the number of salary search candidates
const MAX_SALARY_STEPS: u32 = 1000;

/// Calculation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PensionParameters {
    /// Total pension contribution as a share of gross salary (19.52%)
    pub contribution_rate: f64,

    /// Part of the contribution credited to the main account (12.22%)
    pub account_contribution_rate: f64,

    /// Annual wage growth used when no indicator series is available
    pub average_wage_growth: f64,

    /// Annual valorization applied to accumulated balances
    pub valorization_rate: f64,

    /// Annual pensioner inflation used when no indicator series is available
    pub assumed_inflation_rate: f64,

    pub default_gdp_growth: f64,

    /// Unemployment rate in percent
    pub default_unemployment_rate: f64,

    /// Contribution collection rate in percent
    pub default_collection_rate: f64,

    pub default_work_start_age: u32,

    pub retirement_age_male: u32,
    pub retirement_age_female: u32,

    /// Expected years of retirement
    pub life_expectancy_male: u32,
    pub life_expectancy_female: u32,

    pub sick_days_per_year_male: u32,
    pub sick_days_per_year_female: u32,

    pub working_days_per_year: u32,

    /// Share of the contribution lost during sick leave (aggregate model)
    pub sick_leave_contribution_loss: f64,

    /// Contribution loss factor of the detailed (day-entry) model
    pub detailed_sick_leave_loss: f64,

    /// Subaccount balance as a share of the main account when not supplied
    pub subaccount_percentage: f64,

    /// Return assumed for private savings in the savings scenario
    pub default_investment_return_rate: f64,

    pub default_forecast_variant: ForecastVariant,

    /// Present-day average national pension
    pub average_pension_baseline: f64,

    /// Wage growth weight of the blended pension indexation
    pub average_pension_wage_weight: f64,

    /// Pensioner inflation weight of the blended pension indexation
    pub average_pension_inflation_weight: f64,

    /// Ceiling of the delayed-retirement search
    pub max_delay_years: u32,

    /// Salary search increment as a share of the current salary
    pub salary_step_fraction: f64,

    /// Salary search ceiling as a multiple of the current salary
    pub max_salary_multiple: f64,

    /// Length of the post-retirement purchasing power trajectory
    pub trajectory_years: u32,

    /// Latest accepted retirement year, in years after the current year
    pub max_retirement_horizon_years: u32,

    /// Oldest accepted age
    pub max_age: u32,
}

impl Default for PensionParameters {
    fn default() -> Self {
        Self {
            contribution_rate: 0.1952,
            account_contribution_rate: 0.1222,
            average_wage_growth: 0.05,
            valorization_rate: 0.05,
            assumed_inflation_rate: 0.025,
            default_gdp_growth: 0.03,
            default_unemployment_rate: 5.0,
            default_collection_rate: 99.0,
            default_work_start_age: 25,
            retirement_age_male: 65,
            retirement_age_female: 60,
            life_expectancy_male: 20,
            life_expectancy_female: 25,
            sick_days_per_year_male: 9,
            sick_days_per_year_female: 12,
            working_days_per_year: 250,
            sick_leave_contribution_loss: 0.8,
            detailed_sick_leave_loss: 0.8,
            subaccount_percentage: 0.25,
            default_investment_return_rate: 0.06,
            default_forecast_variant: ForecastVariant::Intermediate,
            average_pension_baseline: 3500.0,
            average_pension_wage_weight: 0.2,
            average_pension_inflation_weight: 0.8,
            max_delay_years: 10,
            salary_step_fraction: 0.10,
            max_salary_multiple: 3.0,
            trajectory_years: 10,
            max_retirement_horizon_years: 50,
            max_age: 100,
        }
    }
}

impl PensionParameters {
    pub fn retirement_age(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.retirement_age_male,
            Gender::Female => self.retirement_age_female,
        }
    }

    pub fn life_expectancy_years(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.life_expectancy_male,
            Gender::Female => self.life_expectancy_female,
        }
    }

    pub fn life_expectancy_months(&self, gender: Gender) -> u32 {
        self.life_expectancy_years(gender) * 12
    }

    pub fn sick_days_per_year(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.sick_days_per_year_male,
            Gender::Female => self.sick_days_per_year_female,
        }
    }

    /// Share of each contribution credited to the main account
    pub fn main_account_share(&self) -> f64 {
        self.account_contribution_rate / self.contribution_rate
    }

    /// Candidates tried by the salary search
    pub fn salary_search_steps(&self) -> u32 {
        if self.salary_step_fraction <= 0.0 || self.max_salary_multiple <= 1.0 {
            return 0;
        }
        ((self.max_salary_multiple - 1.0) / self.salary_step_fraction)
            .round()
            .min(u32::MAX as f64) as u32
    }

    /// Override a single parameter by name
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match name.trim() {
            "contribution_rate" => self.contribution_rate = parse_f64(name, value)?,
            "account_contribution_rate" => self.account_contribution_rate = parse_f64(name, value)?,
            "average_wage_growth" => self.average_wage_growth = parse_f64(name, value)?,
            "valorization_rate" => self.valorization_rate = parse_f64(name, value)?,
            "assumed_inflation_rate" => self.assumed_inflation_rate = parse_f64(name, value)?,
            "default_gdp_growth" => self.default_gdp_growth = parse_f64(name, value)?,
            "default_unemployment_rate" => self.default_unemployment_rate = parse_f64(name, value)?,
            "default_collection_rate" => self.default_collection_rate = parse_f64(name, value)?,
            "default_work_start_age" => self.default_work_start_age = parse_u32(name, value)?,
            "retirement_age_male" => self.retirement_age_male = parse_u32(name, value)?,
            "retirement_age_female" => self.retirement_age_female = parse_u32(name, value)?,
            "life_expectancy_male" => self.life_expectancy_male = parse_u32(name, value)?,
            "life_expectancy_female" => self.life_expectancy_female = parse_u32(name, value)?,
            "sick_days_per_year_male" => self.sick_days_per_year_male = parse_u32(name, value)?,
            "sick_days_per_year_female" => self.sick_days_per_year_female = parse_u32(name, value)?,
            "working_days_per_year" => self.working_days_per_year = parse_u32(name, value)?,
            "sick_leave_contribution_loss" => {
                self.sick_leave_contribution_loss = parse_f64(name, value)?
            }
            "detailed_sick_leave_loss" => self.detailed_sick_leave_loss = parse_f64(name, value)?,
            "subaccount_percentage" => self.subaccount_percentage = parse_f64(name, value)?,
            "default_investment_return_rate" => {
                self.default_investment_return_rate = parse_f64(name, value)?
            }
            "default_forecast_variant" => self.default_forecast_variant = value.parse()?,
            "average_pension_baseline" => self.average_pension_baseline = parse_f64(name, value)?,
            "average_pension_wage_weight" => {
                self.average_pension_wage_weight = parse_f64(name, value)?
            }
            "average_pension_inflation_weight" => {
                self.average_pension_inflation_weight = parse_f64(name, value)?
            }
            "max_delay_years" => self.max_delay_years = parse_u32(name, value)?,
            "salary_step_fraction" => self.salary_step_fraction = parse_f64(name, value)?,
            "max_salary_multiple" => self.max_salary_multiple = parse_f64(name, value)?,
            "trajectory_years" => self.trajectory_years = parse_u32(name, value)?,
            "max_retirement_horizon_years" => {
                self.max_retirement_horizon_years = parse_u32(name, value)?
            }
            "max_age" => self.max_age = parse_u32(name, value)?,
            other => {
                return Err(ForecastError::config(format!("unknown parameter: {}", other)));
            }
        }
        Ok(())
    }

    /// Load defaults overridden by the `name,value` rows of a CSV file
    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut params = Self::default();
        let mut reader = csv::Reader::from_reader(reader);
        for result in reader.records() {
            let record = result?;
            let name = record.get(0).unwrap_or_default();
            let value = record.get(1).unwrap_or_default();
            params.set(name, value)?;
        }
        params.validate()?;
        log::debug!("Loaded calculation parameters from CSV");
        Ok(params)
    }

    /// Apply `PENSION_<NAME>` environment variables on top of the current values
    pub fn with_env_overrides(mut self) -> Result<Self> {
        for name in PARAMETER_NAMES {
            let key = format!("PENSION_{}", name.to_ascii_uppercase());
            if let Ok(value) = std::env::var(&key) {
                log::info!("Parameter {} overridden by {}", name, key);
                self.set(name, &value)?;
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the invariants the calculation relies on
    pub fn validate(&self) -> Result<()> {
        if self.life_expectancy_male < 1 || self.life_expectancy_female < 1 {
            return Err(ForecastError::config("life expectancy must be at least one year"));
        }
        if self.working_days_per_year == 0 {
            return Err(ForecastError::config("working days per year must be positive"));
        }
        if self.contribution_rate.is_nan() || self.contribution_rate <= 0.0 {
            return Err(ForecastError::config("contribution rate must be positive"));
        }
        if self.account_contribution_rate < 0.0
            || self.account_contribution_rate > self.contribution_rate
        {
            return Err(ForecastError::config(
                "account contribution rate must lie within 0..=contribution_rate",
            ));
        }
        let non_negative = [
            ("valorization_rate", self.valorization_rate),
            ("subaccount_percentage", self.subaccount_percentage),
            ("sick_leave_contribution_loss", self.sick_leave_contribution_loss),
            ("detailed_sick_leave_loss", self.detailed_sick_leave_loss),
            ("salary_step_fraction", self.salary_step_fraction),
            ("average_pension_baseline", self.average_pension_baseline),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ForecastError::config(format!("{} must be non-negative", name)));
            }
        }
        if !self.max_salary_multiple.is_finite() {
            return Err(ForecastError::config("max_salary_multiple must be finite"));
        }
        for (name, value) in [
            ("max_delay_years", self.max_delay_years),
            ("trajectory_years", self.trajectory_years),
            ("max_retirement_horizon_years", self.max_retirement_horizon_years),
        ] {
            if value > MAX_LOOP_YEARS {
                return Err(ForecastError::config(format!(
                    "{} must not exceed {}, got {}",
                    name, MAX_LOOP_YEARS, value
                )));
            }
        }
        if self.max_retirement_horizon_years == 0 {
            return Err(ForecastError::config("max_retirement_horizon_years must be positive"));
        }
        if self.max_age > 150 {
            return Err(ForecastError::config(format!("max_age must not exceed 150, got {}", self.max_age)));
        }
        if self.salary_search_steps() > MAX_SALARY_STEPS {
            return Err(ForecastError::config(format!(
                "salary search would try more than {} candidates",
                MAX_SALARY_STEPS
            )));
        }
        Ok(())
    }
}

fn parse_f64(name: &str, value: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| ForecastError::Parse(format!("{}: expected a number, got '{}'", name, value)))
}

fn parse_u32(name: &str, value: &str) -> Result<u32> {
    value.parse().map_err(|_| {
        ForecastError::Parse(format!("{}: expected a whole number, got '{}'", name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PensionParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.life_expectancy_months(Gender::Female), 300);
        assert_eq!(params.life_expectancy_months(Gender::Male), 240);
        assert!((params.main_account_share() - 0.1222 / 0.1952).abs() < 1e-12);
        assert_eq!(params.salary_search_steps(), 20);
        assert_eq!(params.max_retirement_horizon_years, 50);
        assert_eq!(params.max_age, 100);
    }

    #[test]
    fn test_every_name_is_settable() {
        let defaults = PensionParameters::default();
        for name in PARAMETER_NAMES {
            let mut params = defaults.clone();
            let value = if *name == "default_forecast_variant" { "optimistic" } else { "7" };
            params.set(name, value).unwrap();
        }
    }

    #[test]
    fn test_csv_overrides() {
        let csv = "name,value\ncontribution_rate,0.2\nlife_expectancy_male,18\ndefault_forecast_variant,variant_2\n";
        let params = PensionParameters::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(params.contribution_rate, 0.2);
        assert_eq!(params.life_expectancy_male, 18);
        assert_eq!(params.default_forecast_variant, ForecastVariant::Pessimistic);
    }

    #[test]
    fn test_unknown_and_invalid_rejected() {
        let unknown = "name,value\nnot_a_parameter,1\n";
        assert!(matches!(
            PensionParameters::from_reader(unknown.as_bytes()),
            Err(ForecastError::Configuration(_))
        ));

        let zero_life = "name,value\nlife_expectancy_female,0\n";
        assert!(matches!(
            PensionParameters::from_reader(zero_life.as_bytes()),
            Err(ForecastError::Configuration(_))
        ));

        let endless_delay = "name,value\nmax_delay_years,4000000000\n";
        assert!(matches!(
            PensionParameters::from_reader(endless_delay.as_bytes()),
            Err(ForecastError::Configuration(_))
        ));

        let tiny_step = "name,value\nsalary_step_fraction,0.000001\n";
        assert!(matches!(
            PensionParameters::from_reader(tiny_step.as_bytes()),
            Err(ForecastError::Configuration(_))
        ));

        let not_number = "name,value\nvalorization_rate,abc\n";
        assert!(matches!(
            PensionParameters::from_reader(not_number.as_bytes()),
            Err(ForecastError::Parse(_))
        ));
    }

    #[test]
    fn test_load_default_parameter_file() {
        let params = PensionParameters::from_csv(Path::new(DEFAULT_PARAMETERS_PATH))
            .expect("Failed to load parameters");
        assert_eq!(params.contribution_rate, 0.1952);
    }
}
