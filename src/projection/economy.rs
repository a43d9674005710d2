//! Macroeconomic context of a forecast: replacement rate, purchasing power,
//! horizon averages and the comparison with the national average pension

use crate::assumptions::{
    growth_factor, percentage_difference, Assumptions, ForecastVariant, Indicator,
};
use crate::error::Result;
use super::results::{round2, EconomicContext, PurchasingPowerPoint};

pub struct EconomicContextAnalyzer<'a> {
    assumptions: &'a Assumptions,
    current_year: i32,
}

impl<'a> EconomicContextAnalyzer<'a> {
    pub fn new(assumptions: &'a Assumptions, current_year: i32) -> Self {
        Self { assumptions, current_year }
    }

    fn index(&self, indicator: Indicator, variant: ForecastVariant, year: i32) -> Result<f64> {
        self.assumptions.indicators.index(indicator, variant, year)
    }

    pub fn analyze(
        &self,
        current_salary: f64,
        monthly_pension: f64,
        retirement_year: i32,
        variant: ForecastVariant,
    ) -> Result<EconomicContext> {
        let params = &self.assumptions.parameters;
        let horizon = (self.current_year + 1)..=retirement_year;

        let mut future_salary = current_salary;
        let mut price_level = 1.0;
        let mut average_pension = params.average_pension_baseline;
        let mut gdp_sum = 0.0;
        let mut unemployment_sum = 0.0;
        let mut years = 0u32;

        for year in horizon {
            let wage = self.index(Indicator::WageGrowth, variant, year)?;
            let cpi = self.index(Indicator::CpiPensioners, variant, year)?;

            future_salary *= growth_factor(wage);
            price_level *= growth_factor(cpi);

            // Statutory-style indexation: 20% of wage growth, 80% of pensioner inflation
            let blended = params.average_pension_wage_weight * (wage - 100.0) / 100.0
                + params.average_pension_inflation_weight * (cpi - 100.0) / 100.0;
            average_pension *= 1.0 + blended;

            gdp_sum += self.index(Indicator::GdpGrowth, variant, year)? - 100.0;
            unemployment_sum += self.index(Indicator::Unemployment, variant, year)?;
            years += 1;
        }

        let (average_gdp_growth, average_unemployment) = if years > 0 {
            (gdp_sum / years as f64, unemployment_sum / years as f64)
        } else {
            (0.0, 0.0)
        };

        let replacement_rate = if future_salary > 0.0 {
            monthly_pension / future_salary * 100.0
        } else {
            0.0
        };

        let pension_to_average_ratio = if average_pension > 0.0 {
            monthly_pension / average_pension * 100.0
        } else {
            0.0
        };

        let pension_group = self.assumptions.distribution.find_group(monthly_pension).copied();

        let post_retirement_trajectory = self.trajectory(monthly_pension, retirement_year, variant)?;

        Ok(EconomicContext {
            forecast_variant: variant,
            future_gross_salary: round2(future_salary),
            replacement_rate: round2(replacement_rate),
            purchasing_power_today: round2(monthly_pension / price_level),
            average_gdp_growth: round2(average_gdp_growth),
            average_unemployment: round2(average_unemployment),
            cumulative_inflation: round2((price_level - 1.0) * 100.0),
            post_retirement_trajectory,
            avg_pension_retirement_year: round2(average_pension),
            pension_to_average_ratio: round2(pension_to_average_ratio),
            difference_from_average: round2(monthly_pension - average_pension),
            pension_group,
            percentage_difference_from_average: round2(percentage_difference(
                monthly_pension,
                params.average_pension_baseline,
            )),
        })
    }

    /// Pension indexed by pensioner inflation after retirement, with its value
    /// in retirement-year prices
    pub fn trajectory(
        &self,
        monthly_pension: f64,
        retirement_year: i32,
        variant: ForecastVariant,
    ) -> Result<Vec<PurchasingPowerPoint>> {
        let years = self.assumptions.parameters.trajectory_years;
        let mut nominal = monthly_pension;
        let mut price_level = 1.0;
        let mut points = Vec::with_capacity(years as usize);

        for k in 1..=years {
            let year = retirement_year + k as i32;
            let factor = growth_factor(self.index(Indicator::CpiPensioners, variant, year)?);
            nominal *= factor;
            price_level *= factor;

            points.push(PurchasingPowerPoint {
                year,
                years_after_retirement: k,
                nominal_pension: round2(nominal),
                purchasing_power: round2(nominal / price_level),
                cumulative_inflation: round2((price_level - 1.0) * 100.0),
            });
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::PensionParameters;
    use approx::assert_relative_eq;

    fn constants() -> Assumptions {
        Assumptions::constants(PensionParameters::default())
    }

    #[test]
    fn test_constant_rate_context() {
        let assumptions = constants();
        let analyzer = EconomicContextAnalyzer::new(&assumptions, 2025);
        let context = analyzer
            .analyze(5000.0, 3000.0, 2027, ForecastVariant::Intermediate)
            .unwrap();

        let salary = 5000.0 * 1.05 * 1.05;
        assert_relative_eq!(context.future_gross_salary, round2(salary));
        assert_relative_eq!(context.replacement_rate, round2(3000.0 / salary * 100.0));
        assert_relative_eq!(context.purchasing_power_today, round2(3000.0 / (1.025 * 1.025)));
        assert_relative_eq!(context.cumulative_inflation, round2((1.025 * 1.025 - 1.0) * 100.0));
        assert_relative_eq!(context.average_gdp_growth, 3.0);
        assert_relative_eq!(context.average_unemployment, 5.0);

        // 0.2 * 5% + 0.8 * 2.5% = 3% a year
        let average = 3500.0 * 1.03 * 1.03;
        assert_relative_eq!(context.avg_pension_retirement_year, round2(average));
        assert_relative_eq!(context.pension_to_average_ratio, round2(3000.0 / average * 100.0));
        assert_relative_eq!(context.difference_from_average, round2(3000.0 - average));
    }

    #[test]
    fn test_trajectory_keeps_retirement_purchasing_power() {
        let assumptions = Assumptions::default_forecast();
        let analyzer = EconomicContextAnalyzer::new(&assumptions, 2025);
        let points = analyzer.trajectory(3000.0, 2060, ForecastVariant::Pessimistic).unwrap();

        assert_eq!(points.len(), 10);
        assert_eq!(points[0].year, 2061);
        assert_eq!(points[9].years_after_retirement, 10);
        for pair in points.windows(2) {
            assert!(pair[1].nominal_pension > pair[0].nominal_pension);
            assert!(pair[1].cumulative_inflation > pair[0].cumulative_inflation);
        }
        for point in &points {
            assert_relative_eq!(point.purchasing_power, 3000.0);
        }
    }

    #[test]
    fn test_empty_horizon() {
        let assumptions = Assumptions::default_forecast();
        let analyzer = EconomicContextAnalyzer::new(&assumptions, 2025);
        let context = analyzer
            .analyze(5000.0, 2500.0, 2025, ForecastVariant::Intermediate)
            .unwrap();
        assert_eq!(context.future_gross_salary, 5000.0);
        assert_eq!(context.purchasing_power_today, 2500.0);
        assert_eq!(context.average_gdp_growth, 0.0);
        assert_eq!(context.cumulative_inflation, 0.0);
        assert_eq!(context.avg_pension_retirement_year, 3500.0);
    }

    #[test]
    fn test_pension_group_and_difference() {
        let assumptions = constants();
        let analyzer = EconomicContextAnalyzer::new(&assumptions, 2025);

        let context = analyzer.analyze(5000.0, 3200.0, 2030, ForecastVariant::Intermediate).unwrap();
        assert_eq!(context.pension_group.unwrap().amount, 3500.0);
        assert_relative_eq!(context.percentage_difference_from_average, round2(-300.0 / 3500.0 * 100.0));

        let context = analyzer.analyze(5000.0, 3500.0, 2030, ForecastVariant::Intermediate).unwrap();
        assert_eq!(context.pension_group.unwrap().amount, 3500.0);
        assert_eq!(context.percentage_difference_from_average, 0.0);

        let context = analyzer.analyze(5000.0, 20000.0, 2030, ForecastVariant::Intermediate).unwrap();
        assert_eq!(context.pension_group.unwrap().amount, 15000.0);
        assert_relative_eq!(context.percentage_difference_from_average, round2(16500.0 / 3500.0 * 100.0));
    }

    #[test]
    fn test_empty_distribution_gives_no_group() {
        let assumptions = constants().with_distribution(std::sync::Arc::new(Default::default()));
        let analyzer = EconomicContextAnalyzer::new(&assumptions, 2025);
        let context = analyzer.analyze(5000.0, 3200.0, 2030, ForecastVariant::Intermediate).unwrap();
        assert!(context.pension_group.is_none());
    }
}
