//! JSON-based indicator dataset loader
//!
//! Loads forecast series from `data/indicators/<indicator>.json`. Each file maps
//! a variant key to a year → index object:
//!
//! ```json
//! { "variant_1": { "2025": 107.5, "2030": 105.6 }, "variant_2": { ... } }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::indicators::{ForecastData, ForecastVariant, Indicator, IndicatorSeries};
use crate::error::{ForecastError, Result};

/// Default path to the indicator dataset directory
pub const DEFAULT_INDICATORS_PATH: &str = "data/indicators";

type RawDataset = BTreeMap<String, BTreeMap<String, f64>>;

/// Parse one indicator file into per-variant series
pub fn load_indicator<R: std::io::Read>(
    indicator: Indicator,
    reader: R,
) -> Result<BTreeMap<ForecastVariant, IndicatorSeries>> {
    let raw: RawDataset = serde_json::from_reader(reader)?;
    let mut by_variant = BTreeMap::new();

    for (variant_key, points) in raw {
        let variant: ForecastVariant = variant_key.parse().map_err(|_| {
            ForecastError::config(format!(
                "{}: unknown forecast variant key '{}'",
                indicator, variant_key
            ))
        })?;

        let mut series = IndicatorSeries::default();
        for (year, index) in points {
            let year: i32 = year.trim().parse().map_err(|_| {
                ForecastError::Parse(format!("{}: invalid year '{}'", indicator, year))
            })?;
            if !index.is_finite() {
                return Err(ForecastError::Parse(format!(
                    "{}: non-finite index for {}",
                    indicator, year
                )));
            }
            series.insert(year, index);
        }
        by_variant.insert(variant, series);
    }

    Ok(by_variant)
}

impl ForecastData {
    /// Load every indicator file from the default directory
    pub fn load_default() -> Result<Self> {
        Self::from_json_dir(Path::new(DEFAULT_INDICATORS_PATH))
    }

    /// Load every indicator file from a specific directory
    pub fn from_json_dir(path: &Path) -> Result<Self> {
        let mut data = ForecastData::new();

        for indicator in Indicator::ALL {
            let file_path = path.join(format!("{}.json", indicator.file_stem()));
            let file = File::open(&file_path).map_err(|e| {
                ForecastError::config(format!("cannot open {}: {}", file_path.display(), e))
            })?;
            let series = load_indicator(indicator, BufReader::new(file))?;
            log::debug!(
                "Loaded {} ({} variants) from {}",
                indicator,
                series.len(),
                file_path.display()
            );
            for (variant, s) in series {
                data.insert(indicator, variant, s);
            }
        }

        log::info!("Loaded forecast dataset from {}", path.display());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_indicator_from_reader() {
        let json = r#"{"variant_1": {"2025": 103.5, "2030": 102.5}, "pessimistic": {"2025": 104.0}}"#;
        let series = load_indicator(Indicator::CpiTotal, json.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        let intermediate = &series[&ForecastVariant::Intermediate];
        assert_eq!(intermediate.index_for(2030), 102.5);
        assert_eq!(series[&ForecastVariant::Pessimistic].index_for(2090), 104.0);
    }

    #[test]
    fn test_unknown_variant_key_is_configuration_error() {
        let json = r#"{"variant_7": {"2025": 103.5}}"#;
        let result = load_indicator(Indicator::CpiTotal, json.as_bytes());
        assert!(matches!(result, Err(ForecastError::Configuration(_))));
    }

    #[test]
    fn test_bad_year_is_parse_error() {
        let json = r#"{"variant_1": {"twenty": 103.5}}"#;
        let result = load_indicator(Indicator::GdpGrowth, json.as_bytes());
        assert!(matches!(result, Err(ForecastError::Parse(_))));
    }

    #[test]
    fn test_missing_directory_is_configuration_error() {
        let result = ForecastData::from_json_dir(Path::new("does/not/exist"));
        assert!(matches!(result, Err(ForecastError::Configuration(_))));
    }

    #[test]
    fn test_load_default_dataset_matches_builtin() {
        let loaded = ForecastData::load_default().expect("Failed to load indicator dataset");
        for indicator in Indicator::ALL {
            assert_eq!(loaded.variants(indicator).len(), 3);
        }
        let builtin = ForecastData::builtin();
        for indicator in Indicator::ALL {
            for variant in ForecastVariant::ALL {
                let a = loaded.series(indicator, variant).unwrap();
                let b = builtin.series(indicator, variant).unwrap();
                assert_eq!(a.len(), b.len(), "{} {}", indicator, variant);
                for year in 1995..2090 {
                    assert!((a.index_for(year) - b.index_for(year)).abs() < 1e-9);
                }
            }
        }
    }
}
