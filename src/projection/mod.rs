//! Pension projection: history, forward balances, annuity and what-if searches

mod annuity;
mod economy;
mod engine;
mod forward;
mod history;
mod results;
mod sick_leave;
mod solver;

pub use annuity::PensionAnnuitizer;
pub use economy::EconomicContextAnalyzer;
pub use engine::{CalculationOptions, PensionEngine, REQUIRED_INDICATORS};
pub use forward::{AccountProjection, ForwardProjector, InitialBalances, SalaryGrowth};
pub use history::HistoricalReconstructor;
pub use results::{
    round2, AccountGrowthForecast, AggregateSickLeaveImpact, CalculationResult,
    DelaySolution, DelayedRetirementOption, DetailedSickLeaveImpact, EconomicContext,
    HistoricalContribution, PurchasingPowerPoint, SalarySolution, SavingsSolution,
    TargetSolution, YearlyForecast,
};
pub use sick_leave::SickLeaveImpactEstimator;
pub use solver::ScenarioSolver;
