//! Profile and year record structures supplied by the caller

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::assumptions::PensionParameters;
use crate::error::{ForecastError, Result};

/// Minimum age accepted by the calculation entry points
pub const MIN_AGE: u32 = 18;

/// Gender of the insured person; drives retirement age, life expectancy and sick-leave averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(ForecastError::invalid(format!("unknown gender: {}", other))),
        }
    }
}

/// Demographic and salary inputs for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Age in completed years
    pub age: u32,

    pub gender: Gender,

    /// Current monthly gross salary
    pub gross_salary: f64,

    /// Calendar year in which the person stops working
    pub retirement_year: i32,

    /// Balance already accumulated on the main account (estimated when absent)
    #[serde(default)]
    pub account_balance: Option<f64>,

    /// Balance already accumulated on the subaccount (derived from the account when absent)
    #[serde(default)]
    pub subaccount_balance: Option<f64>,
}

impl Profile {
    pub fn new(age: u32, gender: Gender, gross_salary: f64, retirement_year: i32) -> Self {
        Self {
            age,
            gender,
            gross_salary,
            retirement_year,
            account_balance: None,
            subaccount_balance: None,
        }
    }

    /// Attach known account balances
    pub fn with_balances(mut self, account: Option<f64>, subaccount: Option<f64>) -> Self {
        self.account_balance = account;
        self.subaccount_balance = subaccount;
        self
    }

    /// Profile for the statutory retirement age of the given gender
    pub fn at_statutory_age(
        age: u32,
        gender: Gender,
        gross_salary: f64,
        current_year: i32,
        params: &PensionParameters,
    ) -> Self {
        Self::new(
            age,
            gender,
            gross_salary,
            statutory_retirement_year(age, gender, current_year, params),
        )
    }

    pub fn years_to_retirement(&self, current_year: i32) -> i32 {
        self.retirement_year - current_year
    }

    /// Age reached in the retirement year
    pub fn retirement_age(&self, current_year: i32) -> u32 {
        (self.age as i64 + self.years_to_retirement(current_year) as i64).max(0) as u32
    }

    /// Years already worked, counted from the configured work start age
    pub fn years_worked(&self, params: &PensionParameters) -> u32 {
        self.age.saturating_sub(params.default_work_start_age)
    }

    /// Validate the profile for a calculation that needs a positive horizon
    pub fn validate(&self, current_year: i32, params: &PensionParameters) -> Result<()> {
        if self.age < MIN_AGE || self.age > params.max_age {
            return Err(ForecastError::invalid(format!(
                "age {} must lie within {}..={}",
                self.age, MIN_AGE, params.max_age
            )));
        }
        if !self.gross_salary.is_finite() || self.gross_salary <= 0.0 {
            return Err(ForecastError::invalid(format!(
                "gross salary must be positive, got {}",
                self.gross_salary
            )));
        }
        if self.retirement_year <= current_year {
            return Err(ForecastError::invalid(format!(
                "retirement year {} must be after the current year {}",
                self.retirement_year, current_year
            )));
        }
        let horizon = self.retirement_year as i64 - current_year as i64;
        if horizon > params.max_retirement_horizon_years as i64 {
            return Err(ForecastError::invalid(format!(
                "retirement year {} is more than {} years after {}",
                self.retirement_year, params.max_retirement_horizon_years, current_year
            )));
        }
        for (name, balance) in [
            ("account balance", self.account_balance),
            ("subaccount balance", self.subaccount_balance),
        ] {
            if let Some(value) = balance {
                if !value.is_finite() || value < 0.0 {
                    return Err(ForecastError::invalid(format!(
                        "{} must be non-negative, got {}",
                        name, value
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Salary and sick-leave figures for one calendar year (past or future)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,

    /// Monthly gross salary; zero means "not specified"
    pub gross_salary: f64,

    #[serde(default)]
    pub sick_leave_days: u32,
}

impl YearRecord {
    pub fn new(year: i32, gross_salary: f64, sick_leave_days: u32) -> Self {
        Self { year, gross_salary, sick_leave_days }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.gross_salary.is_finite() || self.gross_salary < 0.0 {
            return Err(ForecastError::invalid(format!(
                "year {}: gross salary must be non-negative",
                self.year
            )));
        }
        if self.sick_leave_days > 365 {
            return Err(ForecastError::invalid(format!(
                "year {}: sick leave days must be within 0..=365, got {}",
                self.year, self.sick_leave_days
            )));
        }
        Ok(())
    }

    /// Salary that replaces the computed one, if any
    pub fn salary_override(&self) -> Option<f64> {
        (self.gross_salary > 0.0).then_some(self.gross_salary)
    }

    /// Share of the year actually worked
    pub fn working_fraction(&self) -> f64 {
        (365.0 - self.sick_leave_days.min(365) as f64) / 365.0
    }
}

/// Year in which a person of `age` reaches the statutory retirement age;
/// next year when that age is already reached
pub fn statutory_retirement_year(
    age: u32,
    gender: Gender,
    current_year: i32,
    params: &PensionParameters,
) -> i32 {
    let years_left = params.retirement_age(gender).saturating_sub(age).max(1);
    current_year + years_left as i32
}

/// First record for the given year; later duplicates are ignored
pub fn record_for_year(records: &[YearRecord], year: i32) -> Option<&YearRecord> {
    records.iter().find(|r| r.year == year)
}
