//! Sick-leave impact on the pension
//!
//! Two models are kept side by side:
//! - the aggregate model spreads gender-average sick days over the whole career
//!   and drives the headline pension figure
//! - the detailed model sums the day entries supplied for individual years
//!
//! They answer different questions and can disagree for the same person.

use crate::assumptions::PensionParameters;
use crate::profile::{Gender, YearRecord};
use super::results::{round2, AggregateSickLeaveImpact, DetailedSickLeaveImpact};

pub struct SickLeaveImpactEstimator<'a> {
    params: &'a PensionParameters,
}

impl<'a> SickLeaveImpactEstimator<'a> {
    pub fn new(params: &'a PensionParameters) -> Self {
        Self { params }
    }

    /// Career-average model applied to a monthly pension
    pub fn aggregate_impact(
        &self,
        gender: Gender,
        age: u32,
        years_to_retirement: i32,
        monthly_pension: f64,
    ) -> AggregateSickLeaveImpact {
        let years_worked = age.saturating_sub(self.params.default_work_start_age) as f64;
        let total_years = years_worked + years_to_retirement.max(0) as f64;

        if total_years <= 0.0 {
            return AggregateSickLeaveImpact {
                total_sick_days: 0,
                pension_reduction: 0.0,
                percentage_reduction: 0.0,
            };
        }

        let total_sick_days = self.params.sick_days_per_year(gender) as f64 * total_years;
        let total_working_days = self.params.working_days_per_year as f64 * total_years;

        let contribution_loss_pct = total_sick_days / total_working_days * 100.0;
        let effective_loss_pct = contribution_loss_pct * self.params.sick_leave_contribution_loss;
        let pension_reduction = monthly_pension * effective_loss_pct / 100.0;

        AggregateSickLeaveImpact {
            total_sick_days: total_sick_days.round() as u32,
            pension_reduction: round2(pension_reduction),
            percentage_reduction: round2(effective_loss_pct),
        }
    }

    /// Day-entry model over historical and future records
    pub fn detailed_impact(&self, historical: &[YearRecord], future: &[YearRecord]) -> DetailedSickLeaveImpact {
        let total_historical: u32 = historical.iter().map(|r| r.sick_leave_days).sum();
        let total_future: u32 = future.iter().map(|r| r.sick_leave_days).sum();
        let total = total_historical + total_future;

        let record_count = historical.len() + future.len();
        let average = if record_count > 0 {
            total as f64 / record_count as f64
        } else {
            0.0
        };

        let reduction = total as f64 / 365.0 * self.params.detailed_sick_leave_loss;

        DetailedSickLeaveImpact {
            total_historical_sick_days: total_historical,
            total_future_sick_days: total_future,
            total_sick_days: total,
            average_days_per_year: (average * 10.0).round() / 10.0,
            estimated_pension_reduction_percent: round2(reduction * 100.0),
        }
    }
}
