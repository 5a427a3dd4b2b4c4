use super::error::PlanError;
use super::growth::projection_series;
use super::rate::RateEstimator;
use super::solver::{solve_over_horizon, validated_horizon};
use super::types::{PlanEvaluation, PlanInput, ProjectionPoint};

/// Predicts the return rate for the plan and solves the goal against it.
pub fn evaluate_plan(input: &PlanInput) -> Result<PlanEvaluation, PlanError> {
    evaluate_plan_with(&RateEstimator::fitted(), input)
}

pub fn evaluate_plan_with(
    estimator: &RateEstimator,
    input: &PlanInput,
) -> Result<PlanEvaluation, PlanError> {
    let horizon_years = validated_horizon(input)?;
    let rate = estimator.predict(input.age, input.risk_tolerance);
    let outcome = solve_over_horizon(input, rate.annual_return_rate_percent, horizon_years);
    Ok(PlanEvaluation {
        rate,
        horizon_years,
        outcome,
    })
}

pub fn projection_for(
    input: &PlanInput,
    annual_rate_percent: f64,
) -> Result<Vec<ProjectionPoint>, PlanError> {
    let horizon_years = validated_horizon(input)?;
    Ok(projection_series(
        input.current_value,
        annual_rate_percent,
        horizon_years,
        input.monthly_contribution,
    ))
}
