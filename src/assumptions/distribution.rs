//! Distribution of current pensions by amount
//!
//! Buckets are ordered by their upper amount. A pension belongs to the first
//! bucket whose amount is at least the pension; anything above the top bucket
//! falls into the last one. Loaded from `data/pension_distribution.json`:
//!
//! ```json
//! [ { "amount": 1000.0, "percentage": 2.1 }, { "amount": 1500.0, "percentage": 4.0 } ]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Default path to the pension distribution file
pub const DEFAULT_DISTRIBUTION_PATH: &str = "data/pension_distribution.json";

/// One pension bracket: pensions up to `amount`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PensionBucket {
    /// Upper bound of the bracket (inclusive), monthly gross
    pub amount: f64,
    /// Share of current pensioners in this bracket, in percent
    pub percentage: f64,
}

impl PensionBucket {
    pub const fn new(amount: f64, percentage: f64) -> Self {
        Self { amount, percentage }
    }
}

const BUILTIN_BUCKETS: [(f64, f64); 14] = [
    (1000.0, 2.1),
    (1500.0, 4.0),
    (2000.0, 7.6),
    (2500.0, 11.2),
    (3000.0, 13.5),
    (3500.0, 13.1),
    (4000.0, 11.4),
    (4500.0, 9.3),
    (5000.0, 7.4),
    (6000.0, 9.2),
    (7000.0, 5.3),
    (8000.0, 2.9),
    (10000.0, 2.2),
    (15000.0, 0.8),
];

static SHARED_BUILTIN: OnceLock<Arc<PensionDistribution>> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PensionDistribution {
    buckets: Vec<PensionBucket>,
}

impl PensionDistribution {
    /// Buckets must have finite, strictly increasing amounts
    pub fn new(buckets: Vec<PensionBucket>) -> Result<Self> {
        for bucket in &buckets {
            if !bucket.amount.is_finite() || bucket.amount < 0.0 {
                return Err(ForecastError::config(format!(
                    "pension bucket amount must be finite and non-negative, got {}",
                    bucket.amount
                )));
            }
            if !bucket.percentage.is_finite() || bucket.percentage < 0.0 {
                return Err(ForecastError::config(format!(
                    "pension bucket {} has invalid percentage {}",
                    bucket.amount, bucket.percentage
                )));
            }
        }
        if let Some(pair) = buckets.windows(2).find(|pair| pair[1].amount <= pair[0].amount) {
            return Err(ForecastError::config(format!(
                "pension buckets must be ordered by amount ({} followed by {})",
                pair[0].amount, pair[1].amount
            )));
        }
        Ok(Self { buckets })
    }

    /// Built-in distribution of current pensions
    pub fn builtin() -> Self {
        Self {
            buckets: BUILTIN_BUCKETS
                .iter()
                .map(|&(amount, percentage)| PensionBucket::new(amount, percentage))
                .collect(),
        }
    }

    pub fn shared() -> Arc<PensionDistribution> {
        SHARED_BUILTIN.get_or_init(|| Arc::new(Self::builtin())).clone()
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let buckets: Vec<PensionBucket> = serde_json::from_reader(reader)?;
        Self::new(buckets)
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| ForecastError::config(format!("cannot open {}: {}", path.display(), e)))?;
        let distribution = Self::from_reader(BufReader::new(file))?;
        log::debug!("Loaded {} pension buckets from {}", distribution.len(), path.display());
        Ok(distribution)
    }

    pub fn load_default() -> Result<Self> {
        Self::from_json_path(Path::new(DEFAULT_DISTRIBUTION_PATH))
    }

    pub fn buckets(&self) -> &[PensionBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bracket a monthly pension falls into; the top bracket catches everything above it
    pub fn find_group(&self, pension: f64) -> Option<&PensionBucket> {
        self.buckets
            .iter()
            .find(|bucket| pension <= bucket.amount)
            .or_else(|| self.buckets.last())
    }
}

/// Relative difference from a reference pension, in percent
pub fn percentage_difference(pension: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        (pension - reference) / reference * 100.0
    } else {
        0.0
    }
}
