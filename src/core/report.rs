use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::error::PlanError;
use super::types::{GoalOutcome, PlanEvaluation, PlanInput};

pub fn outcome_message(outcome: GoalOutcome, monthly_contribution: f64) -> String {
    match outcome {
        GoalOutcome::OnTrack => "You're on track! You don't need to invest more.".to_string(),
        GoalOutcome::SufficientWithCurrentContribution => format!(
            "Your current contributions of ${monthly_contribution:.2} are enough to reach your target."
        ),
        GoalOutcome::AdditionalMonthlyContributionNeeded { amount } => format!(
            "You need to invest an additional {} per month to reach your target.",
            format_currency(amount)
        ),
    }
}

pub fn recommendation(outcome: GoalOutcome) -> &'static str {
    match outcome {
        GoalOutcome::OnTrack => {
            "No additional investments needed. Your current strategy is sufficient."
        }
        GoalOutcome::SufficientWithCurrentContribution
        | GoalOutcome::AdditionalMonthlyContributionNeeded { .. } => {
            "Consider increasing your monthly contributions to meet your retirement goal."
        }
    }
}

pub fn summary_file_name(generated_at: NaiveDateTime) -> String {
    format!(
        "Roth_IRA_Summary_{}.txt",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn render_summary(
    input: &PlanInput,
    evaluation: &PlanEvaluation,
    generated_at: NaiveDateTime,
) -> String {
    format!(
        "----- Roth IRA Investment Summary -----\n\
         Date: {date}\n\
         \n\
         Investment Overview:\n\
         \x20- Current Age: {age}\n\
         \x20- Planned Retirement Age: {retirement_age}\n\
         \x20- Time to Invest: {horizon} years\n\
         \n\
         Financial Inputs:\n\
         \x20- Current Investment Value: {current}\n\
         \x20- Target Retirement Value: {target}\n\
         \x20- Current Monthly Contribution: {monthly}\n\
         \x20- Expected Annual Return Rate (Predicted): {rate:.2}%\n\
         \x20- Risk Tolerance: {risk}\n\
         \n\
         Analysis:\n\
         \x20- Based on your inputs and current contributions, the system calculated:\n\
         \x20  {analysis}\n\
         \n\
         Recommendation:\n\
         \x20- {recommendation}\n\
         \n\
         Thank you for using the Roth IRA Tracker!\n",
        date = generated_at.format("%Y-%m-%d %H:%M:%S"),
        age = input.age,
        retirement_age = input.retirement_age,
        horizon = evaluation.horizon_years,
        current = format_currency(input.current_value),
        target = format_currency(input.target_value),
        monthly = format_currency(input.monthly_contribution),
        rate = evaluation.rate.annual_return_rate_percent,
        risk = input.risk_tolerance.as_str(),
        analysis = outcome_message(evaluation.outcome, input.monthly_contribution),
        recommendation = recommendation(evaluation.outcome),
    )
}

/// Writes the rendered summary into `dir` and returns the file path.
pub fn write_summary(
    dir: &Path,
    input: &PlanInput,
    evaluation: &PlanEvaluation,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, PlanError> {
    let path = dir.join(summary_file_name(generated_at));
    fs::write(&path, render_summary(input, evaluation, generated_at))?;
    tracing::info!(path = %path.display(), "summary written");
    Ok(path)
}

/// `$1,234.56` style, rounded to cents.
pub fn format_currency(value: f64) -> String {
    let total_cents = (value.abs() * 100.0).round() as u64;
    let dollars = (total_cents / 100).to_string();
    let cents = total_cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents:02}")
}
