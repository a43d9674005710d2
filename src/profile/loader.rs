//! Load profiles and year records from CSV files

use super::{Gender, Profile, YearRecord};
use crate::error::{ForecastError, Result};
use csv::Reader;
use std::path::Path;

/// Default location of the sample profile block
pub const DEFAULT_PROFILES_PATH: &str = "data/profiles.csv";

/// Raw CSV row matching profiles.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    age: u32,
    gender: String,
    gross_salary: f64,
    retirement_year: i32,
    #[serde(default)]
    account_balance: Option<f64>,
    #[serde(default)]
    subaccount_balance: Option<f64>,
}

impl CsvRow {
    fn to_profile(self) -> Result<Profile> {
        let gender: Gender = self.gender.parse()?;
        Ok(Profile::new(self.age, gender, self.gross_salary, self.retirement_year)
            .with_balances(self.account_balance, self.subaccount_balance))
    }
}

/// Load all profiles from a CSV file
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>> {
    let reader = Reader::from_path(path)?;
    collect_profiles(reader)
}

/// Load profiles from any reader (e.g., string buffer, network stream)
pub fn load_profiles_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Profile>> {
    collect_profiles(Reader::from_reader(reader))
}

fn collect_profiles<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Profile>> {
    let mut profiles = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        profiles.push(row.to_profile()?);
    }
    Ok(profiles)
}

/// Load year records (`year,gross_salary,sick_leave_days`) from a CSV file
pub fn load_year_records<P: AsRef<Path>>(path: P) -> Result<Vec<YearRecord>> {
    let reader = Reader::from_path(path)?;
    collect_year_records(reader)
}

pub fn load_year_records_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<YearRecord>> {
    collect_year_records(Reader::from_reader(reader))
}

fn collect_year_records<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<YearRecord>> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: YearRecord = result?;
        record.validate()?;
        records.push(record);
    }
    records.sort_by_key(|r| r.year);
    Ok(records)
}

/// Load the sample profiles shipped with the crate
pub fn load_default_profiles() -> Result<Vec<Profile>> {
    load_profiles(DEFAULT_PROFILES_PATH).map_err(|e| match e {
        ForecastError::Io(io) => ForecastError::config(format!(
            "cannot read {}: {}",
            DEFAULT_PROFILES_PATH, io
        )),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_profiles_from_reader() {
        let data = "age,gender,gross_salary,retirement_year,account_balance,subaccount_balance\n\
                    30,male,6000,2060,,\n\
                    45,female,8500.5,2040,120000,30000\n";
        let profiles = load_profiles_from_reader(data.as_bytes()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].gender, Gender::Male);
        assert_eq!(profiles[0].account_balance, None);
        assert_eq!(profiles[1].account_balance, Some(120000.0));
        assert_eq!(profiles[1].subaccount_balance, Some(30000.0));
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let data = "age,gender,gross_salary,retirement_year,account_balance,subaccount_balance\n\
                    30,unknown,6000,2060,,\n";
        let result = load_profiles_from_reader(data.as_bytes());
        assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
    }

    #[test]
    fn test_load_year_records_sorted_and_validated() {
        let data = "year,gross_salary,sick_leave_days\n2031,7000,5\n2030,0,12\n";
        let records = load_year_records_from_reader(data.as_bytes()).unwrap();
        assert_eq!(records[0].year, 2030);
        assert_eq!(records[1].sick_leave_days, 5);

        let bad = "year,gross_salary,sick_leave_days\n2030,1000,400\n";
        assert!(load_year_records_from_reader(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_load_default_profiles() {
        let profiles = load_default_profiles().expect("Failed to load profiles");
        assert!(!profiles.is_empty());
    }
}
