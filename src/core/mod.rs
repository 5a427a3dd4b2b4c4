mod error;
mod growth;
mod plan;
mod rate;
mod report;
mod solver;
mod types;

pub use error::PlanError;
pub use growth::{future_value, projection_series};
pub use plan::{evaluate_plan, evaluate_plan_with, projection_for};
pub use rate::RateEstimator;
pub use report::{
    format_currency, outcome_message, recommendation, render_summary, summary_file_name,
    write_summary,
};
pub use solver::{annuity_factor, solve_goal};
pub use types::{
    GoalOutcome, PlanEvaluation, PlanInput, ProjectionPoint, RatePrediction, RiskTolerance,
};
