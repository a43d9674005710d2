//! Macroeconomic indicator series keyed by forecast variant
//!
//! Two providers implement [`IndicatorProvider`]:
//! - [`ForecastDataProvider`] reads published forecast series and interpolates gaps
//! - [`ConstantRates`] answers every year with flat rates taken from the parameters
//!
//! Both feed the same projection code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use super::interpolation::{index_for, rate_to_index};
use super::parameters::PensionParameters;
use crate::error::{ForecastError, Result};

/// Indicators published by the macroeconomic forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Average wage growth index
    WageGrowth,
    /// Consumer price index, all households
    CpiTotal,
    /// Consumer price index for pensioner households
    CpiPensioners,
    /// Real GDP growth index
    GdpGrowth,
    /// Unemployment rate in percent (not a growth index)
    Unemployment,
    /// Contribution collection rate in percent
    ContributionCollection,
}

impl Indicator {
    pub const ALL: [Indicator; 6] = [
        Indicator::WageGrowth,
        Indicator::CpiTotal,
        Indicator::CpiPensioners,
        Indicator::GdpGrowth,
        Indicator::Unemployment,
        Indicator::ContributionCollection,
    ];

    /// File stem of the dataset holding this indicator
    pub fn file_stem(&self) -> &'static str {
        match self {
            Indicator::WageGrowth => "wage_growth",
            Indicator::CpiTotal => "cpi_total",
            Indicator::CpiPensioners => "cpi_pensioners",
            Indicator::GdpGrowth => "gdp_growth",
            Indicator::Unemployment => "unemployment_rate",
            Indicator::ContributionCollection => "contribution_collection",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Named macroeconomic scenario selecting which series to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ForecastVariant {
    #[default]
    #[serde(rename = "intermediate", alias = "variant_1")]
    Intermediate,
    #[serde(rename = "pessimistic", alias = "variant_2")]
    Pessimistic,
    #[serde(rename = "optimistic", alias = "variant_3")]
    Optimistic,
}

impl ForecastVariant {
    pub const ALL: [ForecastVariant; 3] = [
        ForecastVariant::Intermediate,
        ForecastVariant::Pessimistic,
        ForecastVariant::Optimistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastVariant::Intermediate => "intermediate",
            ForecastVariant::Pessimistic => "pessimistic",
            ForecastVariant::Optimistic => "optimistic",
        }
    }

    /// Key used in the published dataset files
    pub fn dataset_key(&self) -> &'static str {
        match self {
            ForecastVariant::Intermediate => "variant_1",
            ForecastVariant::Pessimistic => "variant_2",
            ForecastVariant::Optimistic => "variant_3",
        }
    }

    fn position(&self) -> usize {
        match self {
            ForecastVariant::Intermediate => 0,
            ForecastVariant::Pessimistic => 1,
            ForecastVariant::Optimistic => 2,
        }
    }
}

impl fmt::Display for ForecastVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastVariant {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intermediate" | "variant_1" => Ok(ForecastVariant::Intermediate),
            "pessimistic" | "variant_2" => Ok(ForecastVariant::Pessimistic),
            "optimistic" | "variant_3" => Ok(ForecastVariant::Optimistic),
            other => Err(ForecastError::invalid(format!("unknown forecast variant: {}", other))),
        }
    }
}

/// Sparse year → 100-based index mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries {
    points: BTreeMap<i32, f64>,
}

impl IndicatorSeries {
    pub fn from_points<I: IntoIterator<Item = (i32, f64)>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &BTreeMap<i32, f64> {
        &self.points
    }

    pub fn insert(&mut self, year: i32, index: f64) {
        self.points.insert(year, index);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Interpolated index for any year
    pub fn index_for(&self, year: i32) -> f64 {
        index_for(year, self)
    }
}

/// Complete forecast dataset: indicator → variant → series
///
/// Loaded once and shared read-only (typically behind an `Arc`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastData {
    series: BTreeMap<Indicator, BTreeMap<ForecastVariant, IndicatorSeries>>,
}

static SHARED_BUILTIN: OnceLock<Arc<ForecastData>> = OnceLock::new();

impl ForecastData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, indicator: Indicator, variant: ForecastVariant, series: IndicatorSeries) {
        self.series.entry(indicator).or_default().insert(variant, series);
    }

    pub fn series(&self, indicator: Indicator, variant: ForecastVariant) -> Option<&IndicatorSeries> {
        self.series.get(&indicator).and_then(|by_variant| by_variant.get(&variant))
    }

    /// Variants available for an indicator
    pub fn variants(&self, indicator: Indicator) -> Vec<ForecastVariant> {
        self.series
            .get(&indicator)
            .map(|by_variant| by_variant.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Built-in anchor-year forecast; years in between are interpolated
    pub fn builtin() -> Self {
        let mut data = Self::new();
        for (indicator, anchors) in builtin::TABLES {
            for variant in ForecastVariant::ALL {
                let series = IndicatorSeries::from_points(
                    anchors.iter().map(|(year, values)| (*year, values[variant.position()])),
                );
                data.insert(*indicator, variant, series);
            }
        }
        data
    }

    /// Process-wide built-in dataset, created on first use and never mutated
    pub fn shared() -> Arc<ForecastData> {
        SHARED_BUILTIN
            .get_or_init(|| {
                log::debug!("Initialising built-in forecast dataset");
                Arc::new(Self::builtin())
            })
            .clone()
    }
}

/// Source of indicator values for the projection code
pub trait IndicatorProvider: fmt::Debug + Send + Sync {
    /// 100-based index (or raw rate for unemployment) for a year
    fn index(&self, indicator: Indicator, variant: ForecastVariant, year: i32) -> Result<f64>;

    /// Whether a series exists for this indicator and variant
    fn has_series(&self, indicator: Indicator, variant: ForecastVariant) -> bool;

    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Fail with a configuration error when any required series is missing
    fn ensure_variant(&self, variant: ForecastVariant, required: &[Indicator]) -> Result<()> {
        for &indicator in required {
            if !self.has_series(indicator, variant) {
                return Err(ForecastError::config(format!(
                    "no '{}' series for forecast variant '{}'",
                    indicator, variant
                )));
            }
        }
        Ok(())
    }
}

/// Provider backed by a forecast dataset
#[derive(Debug, Clone)]
pub struct ForecastDataProvider {
    data: Arc<ForecastData>,
}

impl ForecastDataProvider {
    pub fn new(data: Arc<ForecastData>) -> Self {
        Self { data }
    }

    /// Provider over the shared built-in dataset
    pub fn builtin() -> Self {
        Self::new(ForecastData::shared())
    }

    pub fn data(&self) -> &ForecastData {
        &self.data
    }
}

impl IndicatorProvider for ForecastDataProvider {
    fn index(&self, indicator: Indicator, variant: ForecastVariant, year: i32) -> Result<f64> {
        let series = self.data.series(indicator, variant).ok_or_else(|| {
            ForecastError::config(format!(
                "no '{}' series for forecast variant '{}'",
                indicator, variant
            ))
        })?;
        Ok(index_for(year, series))
    }

    fn has_series(&self, indicator: Indicator, variant: ForecastVariant) -> bool {
        self.data.series(indicator, variant).is_some()
    }

    fn name(&self) -> &'static str {
        "forecast dataset"
    }
}

/// Provider answering every year and variant with flat rates
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantRates {
    pub wage_growth: f64,
    /// Used to valorize past contributions
    pub cpi_total: f64,
    pub cpi_pensioners: f64,
    pub gdp_growth: f64,
    pub unemployment: f64,
    pub contribution_collection: f64,
}

impl ConstantRates {
    pub fn from_parameters(params: &PensionParameters) -> Self {
        Self {
            wage_growth: rate_to_index(params.average_wage_growth),
            cpi_total: rate_to_index(params.valorization_rate),
            cpi_pensioners: rate_to_index(params.assumed_inflation_rate),
            gdp_growth: rate_to_index(params.default_gdp_growth),
            unemployment: params.default_unemployment_rate,
            contribution_collection: params.default_collection_rate,
        }
    }
}

impl IndicatorProvider for ConstantRates {
    fn index(&self, indicator: Indicator, _variant: ForecastVariant, _year: i32) -> Result<f64> {
        Ok(match indicator {
            Indicator::WageGrowth => self.wage_growth,
            Indicator::CpiTotal => self.cpi_total,
            Indicator::CpiPensioners => self.cpi_pensioners,
            Indicator::GdpGrowth => self.gdp_growth,
            Indicator::Unemployment => self.unemployment,
            Indicator::ContributionCollection => self.contribution_collection,
        })
    }

    fn has_series(&self, _indicator: Indicator, _variant: ForecastVariant) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "constant rates"
    }
}

/// Anchor years of the built-in forecast as (year, [intermediate, pessimistic, optimistic])
mod builtin {
    use super::Indicator;

    type Anchor = (i32, [f64; 3]);

    const WAGE_GROWTH: &[Anchor] = &[
        (2000, [107.0; 3]),
        (2005, [103.2; 3]),
        (2010, [103.9; 3]),
        (2015, [103.5; 3]),
        (2019, [107.2; 3]),
        (2020, [104.8; 3]),
        (2021, [108.9; 3]),
        (2022, [112.1; 3]),
        (2023, [112.8; 3]),
        (2024, [111.0; 3]),
        (2025, [107.5, 106.8, 108.2]),
        (2030, [105.6, 104.6, 106.4]),
        (2040, [104.9, 103.9, 105.8]),
        (2050, [104.4, 103.4, 105.3]),
        (2060, [104.1, 103.1, 105.0]),
        (2080, [103.8, 102.9, 104.6]),
    ];

    const CPI_TOTAL: &[Anchor] = &[
        (2000, [110.1; 3]),
        (2005, [102.1; 3]),
        (2010, [102.6; 3]),
        (2015, [99.1; 3]),
        (2019, [102.3; 3]),
        (2020, [103.4; 3]),
        (2021, [105.1; 3]),
        (2022, [114.4; 3]),
        (2023, [111.4; 3]),
        (2024, [103.6; 3]),
        (2025, [104.0, 104.6, 103.6]),
        (2030, [102.5, 103.0, 102.3]),
        (2040, [102.5, 102.8, 102.2]),
        (2080, [102.5, 102.8, 102.2]),
    ];

    const CPI_PENSIONERS: &[Anchor] = &[
        (2000, [110.5; 3]),
        (2010, [103.1; 3]),
        (2015, [99.5; 3]),
        (2019, [102.6; 3]),
        (2020, [103.8; 3]),
        (2021, [105.0; 3]),
        (2022, [114.0; 3]),
        (2023, [112.3; 3]),
        (2024, [104.1; 3]),
        (2025, [104.3, 104.9, 103.9]),
        (2030, [102.6, 103.1, 102.4]),
        (2050, [102.6, 102.9, 102.3]),
        (2080, [102.6, 102.9, 102.3]),
    ];

    const GDP_GROWTH: &[Anchor] = &[
        (2000, [104.6; 3]),
        (2010, [103.7; 3]),
        (2015, [104.4; 3]),
        (2019, [104.5; 3]),
        (2020, [98.0; 3]),
        (2021, [106.9; 3]),
        (2022, [105.3; 3]),
        (2023, [100.1; 3]),
        (2024, [102.9; 3]),
        (2025, [103.3, 102.6, 103.9]),
        (2030, [102.7, 101.9, 103.3]),
        (2040, [102.1, 101.4, 102.7]),
        (2060, [101.6, 100.9, 102.2]),
        (2080, [101.3, 100.7, 101.9]),
    ];

    const UNEMPLOYMENT: &[Anchor] = &[
        (2000, [16.1; 3]),
        (2005, [17.6; 3]),
        (2010, [9.6; 3]),
        (2015, [7.5; 3]),
        (2019, [3.3; 3]),
        (2020, [3.2; 3]),
        (2021, [3.4; 3]),
        (2022, [2.9; 3]),
        (2023, [2.8; 3]),
        (2024, [2.9; 3]),
        (2025, [3.0, 3.5, 2.8]),
        (2030, [3.6, 5.0, 3.1]),
        (2040, [4.5, 6.5, 3.8]),
        (2060, [5.0, 7.0, 4.0]),
        (2080, [5.0, 7.0, 4.0]),
    ];

    const CONTRIBUTION_COLLECTION: &[Anchor] = &[
        (2019, [99.2; 3]),
        (2024, [99.3; 3]),
        (2025, [99.3, 98.9, 99.5]),
        (2080, [99.3, 98.9, 99.5]),
    ];

    pub(super) const TABLES: &[(Indicator, &[Anchor])] = &[
        (Indicator::WageGrowth, WAGE_GROWTH),
        (Indicator::CpiTotal, CPI_TOTAL),
        (Indicator::CpiPensioners, CPI_PENSIONERS),
        (Indicator::GdpGrowth, GDP_GROWTH),
        (Indicator::Unemployment, UNEMPLOYMENT),
        (Indicator::ContributionCollection, CONTRIBUTION_COLLECTION),
    ];
}
