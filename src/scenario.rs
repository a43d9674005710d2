//! Scenario runner for batch pension calculations
//!
//! Loads assumptions once, then runs many profiles or forecast variants
//! without re-reading the data files.

use std::path::Path;

use rayon::prelude::*;

use crate::assumptions::{Assumptions, ForecastVariant};
use crate::error::Result;
use crate::profile::Profile;
use crate::projection::{CalculationOptions, CalculationResult, PensionEngine};

/// Pre-loaded runner for batch calculations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_data_dir(Path::new("data"))?;
/// let options = CalculationOptions::for_year(2025);
///
/// for result in runner.run_batch(&profiles, &options) {
///     println!("{:.2}", result?.monthly_pension);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: PensionEngine,
}

impl ScenarioRunner {
    /// Runner over the built-in forecast dataset and default parameters
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_forecast())
    }

    /// Runner loading parameters and indicators from a data directory
    pub fn from_data_dir(path: &Path) -> Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_data_dir(path)?))
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            engine: PensionEngine::new(assumptions),
        }
    }

    pub fn run(&self, profile: &Profile, options: &CalculationOptions) -> Result<CalculationResult> {
        self.engine.calculate_pension(profile, options)
    }

    /// Calculates every profile in parallel; results keep the input order
    pub fn run_batch(
        &self,
        profiles: &[Profile],
        options: &CalculationOptions,
    ) -> Vec<Result<CalculationResult>> {
        profiles
            .par_iter()
            .map(|profile| self.engine.calculate_pension(profile, options))
            .collect()
    }

    /// Same profile under each forecast variant
    pub fn run_variants(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        variants: &[ForecastVariant],
    ) -> Result<Vec<CalculationResult>> {
        variants
            .iter()
            .map(|&variant| {
                let options = CalculationOptions {
                    variant: Some(variant),
                    ..options.clone()
                };
                self.engine.calculate_pension(profile, &options)
            })
            .collect()
    }

    pub fn engine(&self) -> &PensionEngine {
        &self.engine
    }

    pub fn assumptions(&self) -> &Assumptions {
        self.engine.assumptions()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;

    #[test]
    fn test_run_batch_keeps_order() {
        let runner = ScenarioRunner::new();
        let options = CalculationOptions::for_year(2025);
        let profiles = vec![
            Profile::new(30, Gender::Male, 6000.0, 2060),
            Profile::new(45, Gender::Female, 8000.0, 2040),
            Profile::new(17, Gender::Male, 3000.0, 2073),
            Profile::new(50, Gender::Male, 12000.0, 2040),
        ];

        let results = runner.run_batch(&profiles, &options);
        assert_eq!(results.len(), 4);
        assert!(results[2].is_err());

        let ok: Vec<&CalculationResult> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(ok.len(), 3);
        assert_eq!(ok[0].years_to_retirement, 35);
        assert_eq!(ok[1].years_to_retirement, 15);
        assert_eq!(ok[2].retirement_age, 65);

        let single = runner.run(&profiles[1], &options).unwrap();
        assert_eq!(&single, ok[1]);
    }

    #[test]
    fn test_run_variants() {
        let runner = ScenarioRunner::new();
        let profile = Profile::new(35, Gender::Female, 7000.0, 2050);
        let results = runner
            .run_variants(&profile, &CalculationOptions::for_year(2025), &ForecastVariant::ALL)
            .unwrap();

        assert_eq!(results.len(), 3);
        for (result, variant) in results.iter().zip(ForecastVariant::ALL) {
            assert_eq!(result.forecast_variant, variant);
            assert!(result.monthly_pension > 0.0);
        }
        assert_ne!(results[0].monthly_pension, results[1].monthly_pension);
    }

    #[test]
    fn test_from_shipped_data_dir() {
        let runner = ScenarioRunner::from_data_dir(Path::new(crate::assumptions::DEFAULT_DATA_PATH)).unwrap();
        let result = runner
            .run(&Profile::new(30, Gender::Male, 6000.0, 2060), &CalculationOptions::for_year(2025))
            .unwrap();
        assert!(result.monthly_pension > 0.0);
    }
}
