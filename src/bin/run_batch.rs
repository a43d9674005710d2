//! Run forecasts for every profile in data/profiles.csv
//!
//! Outputs one summary row per profile to batch_results.csv

use anyhow::{Context, Result};
use pension_forecast::{CalculationOptions, ForecastVariant, ScenarioRunner};
use pension_forecast::assumptions::DEFAULT_DATA_PATH;
use pension_forecast::profile::loader::load_default_profiles;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Summary row written per profile and variant
#[derive(Debug, Serialize)]
struct BatchRow {
    profile: usize,
    age: u32,
    gender: String,
    gross_salary: f64,
    retirement_year: i32,
    variant: ForecastVariant,
    monthly_pension: f64,
    monthly_pension_without_sick_leave: f64,
    total_capital: f64,
    replacement_rate: f64,
    purchasing_power_today: f64,
    pension_to_average_ratio: f64,
    pension_group: Option<f64>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let start = Instant::now();
    println!("Loading profiles from data/profiles.csv...");
    let profiles = load_default_profiles().context("Failed to load profiles")?;
    println!("Loaded {} profiles in {:?}", profiles.len(), start.elapsed());

    let runner = ScenarioRunner::from_data_dir(Path::new(DEFAULT_DATA_PATH))
        .context("Failed to load assumptions")?;
    let base = CalculationOptions::default();

    println!("Running forecasts...");
    let run_start = Instant::now();

    let mut rows = Vec::with_capacity(profiles.len() * ForecastVariant::ALL.len());
    for variant in ForecastVariant::ALL {
        let options = base.clone().with_variant(variant);
        // Parallel over profiles, results in input order
        let results = runner.run_batch(&profiles, &options);

        for (i, (profile, result)) in profiles.iter().zip(results).enumerate() {
            let mut row = BatchRow {
                profile: i + 1,
                age: profile.age,
                gender: profile.gender.to_string(),
                gross_salary: profile.gross_salary,
                retirement_year: profile.retirement_year,
                variant,
                monthly_pension: 0.0,
                monthly_pension_without_sick_leave: 0.0,
                total_capital: 0.0,
                replacement_rate: 0.0,
                purchasing_power_today: 0.0,
                pension_to_average_ratio: 0.0,
                pension_group: None,
                error: None,
            };
            match result {
                Ok(result) => {
                    row.monthly_pension = result.monthly_pension;
                    row.monthly_pension_without_sick_leave = result.monthly_pension_without_sick_leave;
                    row.total_capital = result.total_contributions;
                    row.replacement_rate = result.economic_context.replacement_rate;
                    row.purchasing_power_today = result.economic_context.purchasing_power_today;
                    row.pension_to_average_ratio = result.economic_context.pension_to_average_ratio;
                    row.pension_group = result.economic_context.pension_group.map(|g| g.amount);
                }
                Err(e) => {
                    log::warn!("Profile {} ({}): {}", i + 1, variant, e);
                    row.error = Some(e.to_string());
                }
            }
            rows.push(row);
        }
    }

    println!("Forecasts complete in {:?}", run_start.elapsed());

    let output_path = "batch_results.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create {}", output_path))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let failed = rows.iter().filter(|r| r.error.is_some()).count();
    println!("Wrote {} rows to {} ({} failed)", rows.len(), output_path, failed);
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
