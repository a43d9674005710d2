//! Personal inputs to a forecast: the profile and per-year salary/sick-leave records

mod data;
pub mod loader;

pub use data::{Gender, Profile, YearRecord, record_for_year, statutory_retirement_year};
pub use loader::{load_profiles, load_year_records};
