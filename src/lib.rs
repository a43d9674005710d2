//! Pension Forecast - projection engine for state pension account forecasts
//!
//! This library provides:
//! - Reconstruction of past contributions from the current salary
//! - Forward projection of account and subaccount balances under macroeconomic forecast variants
//! - Monthly pension annuitization and sick-leave impact estimates
//! - Economic context (replacement rate, purchasing power, average pension comparison)
//! - What-if searches for delayed retirement, higher salary and private savings
//! - Parallel batch runs over many profiles

pub mod error;
pub mod profile;
pub mod assumptions;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ForecastError, Result};
pub use profile::{Gender, Profile, YearRecord};
pub use assumptions::{
    Assumptions, ForecastData, ForecastVariant, Indicator, IndicatorProvider, PensionDistribution,
    PensionParameters,
};
pub use projection::{CalculationOptions, CalculationResult, PensionEngine, SalaryGrowth};
pub use scenario::ScenarioRunner;
