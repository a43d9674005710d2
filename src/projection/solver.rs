//! What-if searches for reaching a target monthly pension
//!
//! Delay and salary searches rerun the full projection for every candidate and
//! stop at the first one meeting the target. Both are bounded by parameters;
//! exhausting the bound yields a zero, non-achievable answer rather than an error.

use log::{debug, info};

use crate::assumptions::ForecastVariant;
use crate::error::Result;
use crate::profile::Profile;
use super::annuity::PensionAnnuitizer;
use super::engine::{CalculationOptions, PensionEngine};
use super::results::{round2, DelaySolution, SalarySolution, SavingsSolution, TargetSolution};

pub struct ScenarioSolver<'a> {
    engine: &'a PensionEngine,
}

impl<'a> ScenarioSolver<'a> {
    pub fn new(engine: &'a PensionEngine) -> Self {
        Self { engine }
    }

    /// Runs all three searches against one baseline projection
    pub fn solve(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        variant: ForecastVariant,
        target_pension: f64,
    ) -> Result<TargetSolution> {
        let projected = self.pension_for(profile, options, variant)?;
        let delay = self.delay_for_target(profile, options, variant, target_pension)?;
        let salary = self.salary_for_target(profile, options, variant, target_pension)?;
        let savings = self.savings_for_target(profile, options.current_year, projected, target_pension);

        info!(
            "Target {:.2} vs projected {:.2}: delay {} years, salary {:.2}, savings {:.2}/month",
            target_pension, projected, delay.additional_years, salary.required_salary, savings.monthly_savings
        );

        Ok(TargetSolution {
            target_pension: round2(target_pension),
            projected_pension: round2(projected),
            shortfall: round2((target_pension - projected).max(0.0)),
            delay,
            salary,
            savings,
        })
    }

    /// First additional working year (1..=max_delay_years) reaching the target
    pub fn delay_for_target(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        variant: ForecastVariant,
        target_pension: f64,
    ) -> Result<DelaySolution> {
        let max_years = self.engine.assumptions().parameters.max_delay_years;
        let initial = self.engine.initial_balances(profile, options, variant)?;

        let mut iterations = 0;
        for years in 1..=max_years {
            iterations += 1;
            let delayed = Profile {
                retirement_year: profile.retirement_year + years as i32,
                ..profile.clone()
            };
            let pension = self.engine.project(&delayed, initial, options, variant)?.monthly_pension;
            if pension >= target_pension {
                debug!("Target reached after {} additional years", years);
                return Ok(DelaySolution {
                    additional_years: years,
                    retirement_year: delayed.retirement_year,
                    monthly_pension: round2(pension),
                    achievable: true,
                    iterations,
                });
            }
        }

        Ok(DelaySolution {
            additional_years: 0,
            retirement_year: profile.retirement_year,
            monthly_pension: 0.0,
            achievable: false,
            iterations,
        })
    }

    /// First salary step of `salary_step_fraction` of the current salary reaching
    /// the target, up to `max_salary_multiple` times the current salary
    pub fn salary_for_target(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        variant: ForecastVariant,
        target_pension: f64,
    ) -> Result<SalarySolution> {
        let params = &self.engine.assumptions().parameters;
        let current = profile.gross_salary;
        let step = current * params.salary_step_fraction;

        let mut iterations = 0;
        if step > 0.0 {
            for n in 1..=params.salary_search_steps() {
                iterations += 1;
                let salary = current + step * n as f64;
                let candidate = Profile {
                    gross_salary: salary,
                    ..profile.clone()
                };
                // Opening balances follow the salary when they are reconstructed
                let initial = self.engine.initial_balances(&candidate, options, variant)?;
                let pension = self.engine.project(&candidate, initial, options, variant)?.monthly_pension;
                if pension >= target_pension {
                    debug!("Target reached at salary {:.2}", salary);
                    return Ok(SalarySolution {
                        required_salary: round2(salary),
                        salary_increase: round2(salary - current),
                        percentage_increase: round2((salary - current) / current * 100.0),
                        monthly_pension: round2(pension),
                        achievable: true,
                        iterations,
                    });
                }
            }
        }

        Ok(SalarySolution {
            required_salary: 0.0,
            salary_increase: 0.0,
            percentage_increase: 0.0,
            monthly_pension: 0.0,
            achievable: false,
            iterations,
        })
    }

    /// Monthly savings, paid at the start of each month until retirement, that
    /// fund the shortfall for the whole life expectancy
    pub fn savings_for_target(
        &self,
        profile: &Profile,
        current_year: i32,
        projected_pension: f64,
        target_pension: f64,
    ) -> SavingsSolution {
        let params = &self.engine.assumptions().parameters;
        let annual_rate = params.default_investment_return_rate;
        let months = u32::try_from(profile.years_to_retirement(current_year))
            .unwrap_or(0)
            .saturating_mul(12);
        let shortfall = target_pension - projected_pension;

        if shortfall <= 0.0 {
            return SavingsSolution {
                monthly_savings: 0.0,
                required_capital: 0.0,
                monthly_shortfall: 0.0,
                annual_return_rate: annual_rate,
                saving_months: months,
            };
        }

        let payout_months = PensionAnnuitizer::new(params).life_expectancy_months(profile.gender);
        let required_capital = shortfall * payout_months as f64;

        let i = annual_rate / 12.0;
        let monthly_savings = if i > 0.0 && months > 0 {
            let growth = (1.0 + i).powi(i32::try_from(months).unwrap_or(i32::MAX));
            required_capital * i / ((growth - 1.0) * (1.0 + i))
        } else {
            required_capital / months.max(1) as f64
        };

        SavingsSolution {
            monthly_savings: round2(monthly_savings),
            required_capital: round2(required_capital),
            monthly_shortfall: round2(shortfall),
            annual_return_rate: annual_rate,
            saving_months: months,
        }
    }

    fn pension_for(
        &self,
        profile: &Profile,
        options: &CalculationOptions,
        variant: ForecastVariant,
    ) -> Result<f64> {
        let initial = self.engine.initial_balances(profile, options, variant)?;
        Ok(self.engine.project(profile, initial, options, variant)?.monthly_pension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Assumptions, ForecastData, PensionParameters};
    use crate::profile::Gender;
    use approx::assert_relative_eq;

    const YEAR: i32 = 2025;

    fn engine() -> PensionEngine {
        PensionEngine::new(Assumptions::default_forecast())
    }

    fn profile() -> Profile {
        Profile::new(40, Gender::Female, 7000.0, YEAR + 20)
    }

    fn options() -> CalculationOptions {
        CalculationOptions::for_year(YEAR).with_variant(ForecastVariant::Intermediate)
    }

    fn baseline(engine: &PensionEngine) -> f64 {
        ScenarioSolver::new(engine)
            .pension_for(&profile(), &options(), ForecastVariant::Intermediate)
            .unwrap()
    }

    #[test]
    fn test_delay_reaches_modest_target() {
        let engine = engine();
        let target = baseline(&engine) * 1.05;
        let solution = ScenarioSolver::new(&engine)
            .delay_for_target(&profile(), &options(), ForecastVariant::Intermediate, target)
            .unwrap();

        assert!(solution.achievable);
        assert!(solution.additional_years >= 1);
        assert_eq!(solution.iterations, solution.additional_years);
        assert_eq!(solution.retirement_year, YEAR + 20 + solution.additional_years as i32);
        assert!(solution.monthly_pension >= round2(target));
    }

    #[test]
    fn test_delay_unreachable_is_bounded() {
        let engine = engine();
        let target = baseline(&engine) * 100.0;
        let solution = ScenarioSolver::new(&engine)
            .delay_for_target(&profile(), &options(), ForecastVariant::Intermediate, target)
            .unwrap();

        assert!(!solution.achievable);
        assert_eq!(solution.additional_years, 0);
        assert_eq!(solution.monthly_pension, 0.0);
        assert_eq!(solution.iterations, 10);
    }

    #[test]
    fn test_salary_search_steps() {
        let engine = engine();
        let target = baseline(&engine) * 1.15;
        let solution = ScenarioSolver::new(&engine)
            .salary_for_target(&profile(), &options(), ForecastVariant::Intermediate, target)
            .unwrap();

        assert!(solution.achievable);
        assert!(solution.iterations >= 1);
        assert_relative_eq!(
            solution.required_salary,
            round2(7000.0 + 700.0 * solution.iterations as f64)
        );
        assert_relative_eq!(solution.percentage_increase, 10.0 * solution.iterations as f64, epsilon = 1e-9);
    }

    #[test]
    fn test_salary_unreachable_is_bounded() {
        let engine = engine();
        let target = baseline(&engine) * 100.0;
        let solution = ScenarioSolver::new(&engine)
            .salary_for_target(&profile(), &options(), ForecastVariant::Intermediate, target)
            .unwrap();

        assert!(!solution.achievable);
        assert_eq!(solution.required_salary, 0.0);
        assert_eq!(solution.iterations, 20);
    }

    #[test]
    fn test_searches_stop_at_configured_ceilings() {
        let params = PensionParameters {
            max_delay_years: 3,
            max_salary_multiple: 1.5,
            ..Default::default()
        };
        let engine = PensionEngine::new(Assumptions::forecast(params, ForecastData::shared()));
        let solver = ScenarioSolver::new(&engine);
        let target = baseline(&engine) * 100.0;

        let delay = solver
            .delay_for_target(&profile(), &options(), ForecastVariant::Intermediate, target)
            .unwrap();
        assert!(!delay.achievable);
        assert_eq!(delay.iterations, 3);

        let salary = solver
            .salary_for_target(&profile(), &options(), ForecastVariant::Intermediate, target)
            .unwrap();
        assert!(!salary.achievable);
        assert_eq!(salary.iterations, 5);
    }

    #[test]
    fn test_savings_months_saturate() {
        let engine = engine();
        let far = Profile::new(30, Gender::Male, 6000.0, YEAR + 400_000_000);
        let savings = ScenarioSolver::new(&engine).savings_for_target(&far, YEAR, 2000.0, 2500.0);
        assert_eq!(savings.saving_months, u32::MAX);
        assert!(savings.monthly_savings.is_finite());
        assert!(savings.monthly_savings >= 0.0);
    }

    #[test]
    fn test_savings_annuity_due() {
        let engine = engine();
        let solver = ScenarioSolver::new(&engine);
        let savings = solver.savings_for_target(&profile(), YEAR, 2000.0, 2500.0);

        // Female: 25 years of payments
        let capital = 500.0 * 300.0;
        let i = 0.06 / 12.0;
        let n = 240;
        let expected = capital * i / (((1.0_f64 + i).powi(n) - 1.0) * (1.0 + i));

        assert_eq!(savings.saving_months, 240);
        assert_relative_eq!(savings.required_capital, capital);
        assert_relative_eq!(savings.monthly_shortfall, 500.0);
        assert_relative_eq!(savings.monthly_savings, round2(expected));
        assert!(savings.monthly_savings < capital / 240.0);
    }

    #[test]
    fn test_savings_without_return_divides() {
        let params = PensionParameters {
            default_investment_return_rate: 0.0,
            ..Default::default()
        };
        let engine = PensionEngine::new(Assumptions::constants(params));
        let savings = ScenarioSolver::new(&engine).savings_for_target(&profile(), YEAR, 2000.0, 2500.0);
        assert_relative_eq!(savings.monthly_savings, round2(150_000.0 / 240.0));
    }

    #[test]
    fn test_no_shortfall_needs_no_savings() {
        let engine = engine();
        let savings = ScenarioSolver::new(&engine).savings_for_target(&profile(), YEAR, 3000.0, 2500.0);
        assert_eq!(savings.monthly_savings, 0.0);
        assert_eq!(savings.required_capital, 0.0);
    }

    #[test]
    fn test_solve_for_target_through_engine() {
        let engine = engine();
        let target = baseline(&engine) * 1.1;
        let solution = engine.solve_for_target(&profile(), &options(), target).unwrap();

        assert_relative_eq!(solution.target_pension, round2(target));
        assert!(solution.shortfall > 0.0);
        assert!(solution.delay.achievable);
        assert!(solution.salary.achievable);
        assert!(solution.savings.monthly_savings > 0.0);
    }
}
