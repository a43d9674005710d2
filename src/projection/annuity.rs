//! Conversion of accumulated capital into a monthly pension

use crate::assumptions::PensionParameters;
use crate::profile::Gender;

/// Divides capital by the expected number of pension months
pub struct PensionAnnuitizer<'a> {
    params: &'a PensionParameters,
}

impl<'a> PensionAnnuitizer<'a> {
    pub fn new(params: &'a PensionParameters) -> Self {
        Self { params }
    }

    /// Expected months of pension payments; at least 12 once parameters are validated
    pub fn life_expectancy_months(&self, gender: Gender) -> u32 {
        self.params.life_expectancy_months(gender)
    }

    pub fn monthly_pension(&self, total_capital: f64, gender: Gender) -> f64 {
        total_capital / self.life_expectancy_months(gender) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monthly_pension_by_gender() {
        let params = PensionParameters::default();
        let annuitizer = PensionAnnuitizer::new(&params);
        assert_relative_eq!(annuitizer.monthly_pension(600_000.0, Gender::Female), 2000.0);
        assert_relative_eq!(annuitizer.monthly_pension(600_000.0, Gender::Male), 2500.0);
    }

    #[test]
    fn test_configured_life_expectancy() {
        let params = PensionParameters { life_expectancy_male: 1, ..Default::default() };
        let annuitizer = PensionAnnuitizer::new(&params);
        assert_eq!(annuitizer.life_expectancy_months(Gender::Male), 12);
        assert_relative_eq!(annuitizer.monthly_pension(1200.0, Gender::Male), 100.0);
    }
}
