//! Calculation assumptions: named parameters and macroeconomic indicator series

pub mod distribution;
pub mod indicators;
pub mod interpolation;
pub mod loader;
mod parameters;

pub use distribution::{percentage_difference, PensionBucket, PensionDistribution};
pub use indicators::{
    ConstantRates, ForecastData, ForecastDataProvider, ForecastVariant, Indicator,
    IndicatorProvider, IndicatorSeries,
};
pub use interpolation::{growth_factor, index_for, DEFAULT_INDEX};
pub use parameters::{PensionParameters, DEFAULT_PARAMETERS_PATH, PARAMETER_NAMES};

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Default root of the shipped data files
pub const DEFAULT_DATA_PATH: &str = "data";

/// Container for everything a calculation reads besides the caller's inputs
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub parameters: PensionParameters,
    pub indicators: Arc<dyn IndicatorProvider>,
    pub distribution: Arc<PensionDistribution>,
}

impl Assumptions {
    /// Default parameters over the shared built-in forecast dataset
    pub fn default_forecast() -> Self {
        Self::forecast(PensionParameters::default(), ForecastData::shared())
    }

    /// Parameters over an explicit forecast dataset
    pub fn forecast(parameters: PensionParameters, data: Arc<ForecastData>) -> Self {
        Self {
            parameters,
            indicators: Arc::new(ForecastDataProvider::new(data)),
            distribution: PensionDistribution::shared(),
        }
    }

    /// Flat-rate mode: every indicator comes from the parameters
    pub fn constants(parameters: PensionParameters) -> Self {
        let rates = ConstantRates::from_parameters(&parameters);
        Self {
            parameters,
            indicators: Arc::new(rates),
            distribution: PensionDistribution::shared(),
        }
    }

    /// Custom indicator source
    pub fn with_provider(parameters: PensionParameters, indicators: Arc<dyn IndicatorProvider>) -> Self {
        Self {
            parameters,
            indicators,
            distribution: PensionDistribution::shared(),
        }
    }

    /// Load from the default data directory (data/)
    pub fn from_default_data() -> Result<Self> {
        Self::from_data_dir(Path::new(DEFAULT_DATA_PATH))
    }

    /// Load `parameters.csv` and `pension_distribution.json` (both optional) and
    /// `indicators/*.json` from a data directory
    pub fn from_data_dir(path: &Path) -> Result<Self> {
        let params_path = path.join("parameters.csv");
        let parameters = if params_path.exists() {
            PensionParameters::from_csv(&params_path)?
        } else {
            log::warn!("{} not found, using default parameters", params_path.display());
            PensionParameters::default()
        };
        let data = ForecastData::from_json_dir(&path.join("indicators"))?;

        let distribution_path = path.join("pension_distribution.json");
        let distribution = if distribution_path.exists() {
            Arc::new(PensionDistribution::from_json_path(&distribution_path)?)
        } else {
            log::warn!("{} not found, using built-in pension distribution", distribution_path.display());
            PensionDistribution::shared()
        };

        Ok(Self::forecast(parameters, Arc::new(data)).with_distribution(distribution))
    }

    pub fn with_distribution(mut self, distribution: Arc<PensionDistribution>) -> Self {
        self.distribution = distribution;
        self
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_forecast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_data() {
        let assumptions = Assumptions::from_default_data().expect("Failed to load data directory");
        assert_eq!(assumptions.parameters, PensionParameters::default());
        assert_eq!(assumptions.indicators.name(), "forecast dataset");
        assert!(assumptions
            .indicators
            .ensure_variant(ForecastVariant::Optimistic, &Indicator::ALL)
            .is_ok());
        assert_eq!(*assumptions.distribution, PensionDistribution::builtin());
    }

    #[test]
    fn test_missing_distribution_file_falls_back_to_builtin() {
        let dir = std::env::temp_dir().join(format!("pension_forecast_no_distribution_{}", std::process::id()));
        let indicators = dir.join("indicators");
        std::fs::create_dir_all(&indicators).unwrap();
        for indicator in Indicator::ALL {
            let name = format!("{}.json", indicator.file_stem());
            std::fs::copy(Path::new(loader::DEFAULT_INDICATORS_PATH).join(&name), indicators.join(&name)).unwrap();
        }

        let assumptions = Assumptions::from_data_dir(&dir).unwrap();
        assert_eq!(assumptions.distribution.len(), 14);
        assert_eq!(assumptions.parameters, PensionParameters::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_constants_mode() {
        let assumptions = Assumptions::constants(PensionParameters::default());
        let wage = assumptions
            .indicators
            .index(Indicator::WageGrowth, ForecastVariant::Intermediate, 2040)
            .unwrap();
        assert!((wage - 105.0).abs() < 1e-12);
    }
}
