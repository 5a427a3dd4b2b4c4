use super::error::PlanError;
use super::growth::future_value;
use super::types::{GoalOutcome, PlanInput};

/// Monthly rates at or below this magnitude accumulate linearly.
const ZERO_RATE_EPSILON: f64 = 1e-12;

pub fn solve_goal(input: &PlanInput, annual_rate_percent: f64) -> Result<GoalOutcome, PlanError> {
    let horizon_years = validated_horizon(input)?;
    Ok(solve_over_horizon(input, annual_rate_percent, horizon_years))
}

/// Goal decision for a horizon already checked by `validated_horizon`.
pub(crate) fn solve_over_horizon(
    input: &PlanInput,
    annual_rate_percent: f64,
    horizon_years: u32,
) -> GoalOutcome {
    let years = f64::from(horizon_years);

    let future_of_current = future_value(input.current_value, annual_rate_percent, years);
    if future_of_current >= input.target_value {
        return GoalOutcome::OnTrack;
    }

    // Contributions are assumed to start now and continue for the whole horizon.
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let months = years * 12.0;
    let factor = annuity_factor(monthly_rate, months);

    let contribution_future_value = input.monthly_contribution * factor;
    let total_future_value = future_of_current + contribution_future_value;
    if total_future_value >= input.target_value {
        return GoalOutcome::SufficientWithCurrentContribution;
    }

    let additional = (input.target_value - total_future_value) / factor;
    GoalOutcome::AdditionalMonthlyContributionNeeded {
        amount: round_cents(additional).max(0.0),
    }
}

pub(crate) fn validated_horizon(input: &PlanInput) -> Result<u32, PlanError> {
    let horizon = input.horizon_years();
    if horizon <= 0 {
        return Err(PlanError::InvalidHorizon {
            age: input.age,
            retirement_age: input.retirement_age,
        });
    }
    u32::try_from(horizon).map_err(|_| PlanError::InvalidHorizon {
        age: input.age,
        retirement_age: input.retirement_age,
    })
}

/// Future value of contributing 1 per period for `periods` periods. Falls back
/// to `periods` at a zero rate, the limit of the closed form.
pub fn annuity_factor(periodic_rate: f64, periods: f64) -> f64 {
    if periodic_rate.abs() <= ZERO_RATE_EPSILON {
        return periods;
    }
    ((1.0 + periodic_rate).powf(periods) - 1.0) / periodic_rate
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
