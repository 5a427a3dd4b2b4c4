use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use crate::core::{
    GoalOutcome, PlanError, PlanEvaluation, PlanInput, ProjectionPoint, RatePrediction,
    RiskTolerance, evaluate_plan, format_currency, outcome_message, projection_for,
    recommendation, write_summary,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskTolerance {
    Low,
    Medium,
    High,
}

impl From<CliRiskTolerance> for RiskTolerance {
    fn from(value: CliRiskTolerance) -> Self {
        match value {
            CliRiskTolerance::Low => RiskTolerance::Low,
            CliRiskTolerance::Medium => RiskTolerance::Medium,
            CliRiskTolerance::High => RiskTolerance::High,
        }
    }
}

/// Accepts the three enumerators in any letter case.
fn parse_risk_tolerance(raw: &str) -> Result<CliRiskTolerance, PlanError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(CliRiskTolerance::Low),
        "medium" => Ok(CliRiskTolerance::Medium),
        "high" => Ok(CliRiskTolerance::High),
        _ => Err(PlanError::InvalidRiskTolerance(raw.to_string())),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    age: Option<u32>,
    retirement_age: Option<u32>,
    current_value: Option<f64>,
    target_value: Option<f64>,
    monthly_contribution: Option<f64>,
    risk_tolerance: Option<String>,
    #[serde(alias = "annualRate")]
    annual_return_rate_percent: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "roth-tracker",
    about = "Roth IRA goal tracker: predicted return, shortfall, and required monthly contribution"
)]
struct Cli {
    #[arg(long, help = "Current age in whole years")]
    age: u32,
    #[arg(long, help = "Planned retirement age; must be greater than --age")]
    retirement_age: u32,
    #[arg(long, default_value_t = 0.0, help = "Current investment value in dollars")]
    current_value: f64,
    #[arg(long, help = "Target value at retirement in dollars")]
    target_value: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Current monthly contribution in dollars"
    )]
    monthly_contribution: f64,
    #[arg(
        long,
        value_enum,
        ignore_case = true,
        default_value_t = CliRiskTolerance::Medium,
        help = "Risk tolerance: Low, Medium, or High"
    )]
    risk_tolerance: CliRiskTolerance,
    #[arg(long, help = "Directory to write the timestamped summary file into")]
    summary_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false, help = "Print the year-by-year projection")]
    projection: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    rate: RatePrediction,
    horizon_years: u32,
    outcome: GoalOutcome,
    analysis: String,
    recommendation: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    annual_return_rate_percent: f64,
    horizon_years: u32,
    points: Vec<ProjectionPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<PlanInput, PlanError> {
    if cli.age == 0 {
        return Err(PlanError::invalid_input("age", "--age must be > 0"));
    }

    for (field, flag, value) in [
        ("current_value", "--current-value", cli.current_value),
        ("target_value", "--target-value", cli.target_value),
        (
            "monthly_contribution",
            "--monthly-contribution",
            cli.monthly_contribution,
        ),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PlanError::invalid_input(
                field,
                format!("{flag} must be a finite amount >= 0"),
            ));
        }
    }

    let input = PlanInput {
        age: cli.age,
        retirement_age: cli.retirement_age,
        current_value: cli.current_value,
        target_value: cli.target_value,
        monthly_contribution: cli.monthly_contribution,
        risk_tolerance: cli.risk_tolerance.into(),
    };

    if input.horizon_years() <= 0 {
        return Err(PlanError::InvalidHorizon {
            age: input.age,
            retirement_age: input.retirement_age,
        });
    }

    Ok(input)
}

/// Runs the command-line front end and returns the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { 2 } else { 0 };
        }
    };

    let input = match build_inputs(&cli) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Input error: {e}");
            return 2;
        }
    };

    let evaluation = match evaluate_plan(&input) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            eprintln!("Input error: {e}");
            return 2;
        }
    };
    tracing::info!(
        horizon_years = evaluation.horizon_years,
        rate = evaluation.rate.annual_return_rate_percent,
        outcome = ?evaluation.outcome,
        "plan evaluated"
    );

    println!(
        "Predicted annual return: {:.2}%",
        evaluation.rate.annual_return_rate_percent
    );
    println!(
        "Result: {}",
        outcome_message(evaluation.outcome, input.monthly_contribution)
    );
    println!("Recommendation: {}", recommendation(evaluation.outcome));

    if cli.projection {
        match projection_for(&input, evaluation.rate.annual_return_rate_percent) {
            Ok(points) => {
                for point in points {
                    println!(
                        "  year {:>3}: {}",
                        point.year_offset,
                        format_currency(point.projected_value)
                    );
                }
            }
            Err(e) => {
                eprintln!("Projection error: {e}");
                return 2;
            }
        }
    }

    if let Some(dir) = cli.summary_dir.as_deref() {
        let generated_at = chrono::Local::now().naive_local();
        match write_summary(dir, &input, &evaluation, generated_at) {
            Ok(path) => println!("Analysis saved to {}", path.display()),
            Err(e) => {
                eprintln!("{e}");
                return 1;
            }
        }
    }

    0
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Roth tracker HTTP API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/api/plan");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn projection_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    projection_handler_impl(payload)
}

async fn projection_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    projection_handler_impl(payload)
}

fn plan_handler_impl(payload: PlanPayload) -> Response {
    match plan_response_from_payload(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => {
            tracing::warn!(error = %e, "rejected plan request");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

fn projection_handler_impl(payload: PlanPayload) -> Response {
    match projection_response_from_payload(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => {
            tracing::warn!(error = %e, "rejected projection request");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn plan_response_from_payload(payload: PlanPayload) -> Result<PlanResponse, PlanError> {
    let input = plan_input_from_payload(&payload)?;
    let evaluation = evaluate_plan(&input)?;
    tracing::info!(
        age = input.age,
        retirement_age = input.retirement_age,
        rate = evaluation.rate.annual_return_rate_percent,
        outcome = ?evaluation.outcome,
        "plan evaluated"
    );
    Ok(build_plan_response(&input, &evaluation))
}

fn projection_response_from_payload(
    payload: PlanPayload,
) -> Result<ProjectionResponse, PlanError> {
    let input = plan_input_from_payload(&payload)?;
    let rate = match payload.annual_return_rate_percent {
        Some(rate) if !rate.is_finite() => {
            return Err(PlanError::invalid_input(
                "annual_return_rate_percent",
                "annualReturnRatePercent must be finite",
            ));
        }
        Some(rate) => rate,
        None => evaluate_plan(&input)?.rate.annual_return_rate_percent,
    };
    let points = projection_for(&input, rate)?;
    Ok(ProjectionResponse {
        annual_return_rate_percent: rate,
        horizon_years: points.len().saturating_sub(1) as u32,
        points,
    })
}

fn plan_input_from_payload(payload: &PlanPayload) -> Result<PlanInput, PlanError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.current_value {
        cli.current_value = v;
    }
    if let Some(v) = payload.target_value {
        cli.target_value = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.risk_tolerance.as_deref() {
        cli.risk_tolerance = parse_risk_tolerance(v)?;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        age: 30,
        retirement_age: 65,
        current_value: 10_000.0,
        target_value: 1_000_000.0,
        monthly_contribution: 200.0,
        risk_tolerance: CliRiskTolerance::Medium,
        summary_dir: None,
        projection: false,
    }
}

fn build_plan_response(input: &PlanInput, evaluation: &PlanEvaluation) -> PlanResponse {
    PlanResponse {
        rate: evaluation.rate,
        horizon_years: evaluation.horizon_years,
        outcome: evaluation.outcome,
        analysis: outcome_message(evaluation.outcome, input.monthly_contribution),
        recommendation: recommendation(evaluation.outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn payload_from_json(json: &str) -> PlanPayload {
        serde_json::from_str::<PlanPayload>(json).expect("valid payload json")
    }

    #[test]
    fn build_inputs_accepts_defaults() {
        let input = build_inputs(&default_cli_for_api()).expect("valid inputs");
        assert_eq!(input.age, 30);
        assert_eq!(input.horizon_years(), 35);
        assert_eq!(input.risk_tolerance, RiskTolerance::Medium);
    }

    #[test]
    fn build_inputs_rejects_zero_age() {
        let mut cli = default_cli_for_api();
        cli.age = 0;
        let err = build_inputs(&cli).expect_err("zero age");
        assert!(matches!(err, PlanError::InvalidInput { field: "age", .. }));
    }

    #[test]
    fn build_inputs_rejects_negative_and_non_finite_amounts() {
        let mut cli = default_cli_for_api();
        cli.monthly_contribution = -1.0;
        assert!(matches!(
            build_inputs(&cli),
            Err(PlanError::InvalidInput {
                field: "monthly_contribution",
                ..
            })
        ));

        let mut cli = default_cli_for_api();
        cli.target_value = f64::NAN;
        assert!(matches!(
            build_inputs(&cli),
            Err(PlanError::InvalidInput {
                field: "target_value",
                ..
            })
        ));
    }

    #[test]
    fn build_inputs_rejects_retirement_not_after_age() {
        let mut cli = default_cli_for_api();
        cli.age = 60;
        cli.retirement_age = 55;
        assert!(matches!(
            build_inputs(&cli),
            Err(PlanError::InvalidHorizon {
                age: 60,
                retirement_age: 55
            })
        ));
    }

    #[test]
    fn cli_parses_flags_into_inputs() {
        let cli = Cli::try_parse_from([
            "roth-tracker",
            "--age",
            "40",
            "--retirement-age",
            "67",
            "--current-value",
            "25000",
            "--target-value",
            "750000",
            "--monthly-contribution",
            "500",
            "--risk-tolerance",
            "high",
        ])
        .expect("valid flags");
        let input = build_inputs(&cli).expect("valid inputs");
        assert_eq!(input.retirement_age, 67);
        assert_eq!(input.risk_tolerance, RiskTolerance::High);
        assert_approx(input.current_value, 25_000.0);
        assert!(cli.summary_dir.is_none());
    }

    #[test]
    fn cli_accepts_capitalized_risk_tolerance() {
        for (raw, expected) in [
            ("Low", RiskTolerance::Low),
            ("Medium", RiskTolerance::Medium),
            ("HIGH", RiskTolerance::High),
        ] {
            let cli = Cli::try_parse_from([
                "roth-tracker",
                "--age",
                "40",
                "--retirement-age",
                "67",
                "--target-value",
                "750000",
                "--risk-tolerance",
                raw,
            ])
            .expect("risk tolerance parses regardless of case");
            let input = build_inputs(&cli).expect("valid inputs");
            assert_eq!(input.risk_tolerance, expected);
        }
    }

    #[test]
    fn cli_rejects_unknown_risk_tolerance() {
        let parsed = Cli::try_parse_from([
            "roth-tracker",
            "--age",
            "40",
            "--retirement-age",
            "67",
            "--target-value",
            "750000",
            "--risk-tolerance",
            "reckless",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn run_cli_reports_inverted_ages_with_exit_code() {
        let code = run_cli([
            "roth-tracker",
            "--age",
            "60",
            "--retirement-age",
            "55",
            "--target-value",
            "100000",
        ]);
        assert_eq!(code, 2);
    }

    #[test]
    fn payload_parses_camel_case_keys_and_risk_case_insensitively() {
        let payload = payload_from_json(
            r#"{
                "age": 45,
                "retirementAge": 70,
                "currentValue": 50000,
                "targetValue": 400000,
                "monthlyContribution": 300,
                "riskTolerance": "low"
            }"#,
        );
        let input = plan_input_from_payload(&payload).expect("valid payload");
        assert_eq!(input.age, 45);
        assert_eq!(input.retirement_age, 70);
        assert_eq!(input.risk_tolerance, RiskTolerance::Low);
        assert_approx(input.target_value, 400_000.0);
        assert_approx(input.monthly_contribution, 300.0);
    }

    #[test]
    fn payload_with_unknown_risk_is_rejected_before_core() {
        let payload = payload_from_json(r#"{"riskTolerance": "Aggressive"}"#);
        let err = plan_input_from_payload(&payload).expect_err("unknown risk");
        assert!(matches!(err, PlanError::InvalidRiskTolerance(ref raw) if raw == "Aggressive"));
    }

    #[test]
    fn missing_payload_fields_fall_back_to_defaults() {
        let input = plan_input_from_payload(&PlanPayload::default()).expect("defaults valid");
        assert_eq!(input.age, 30);
        assert_eq!(input.retirement_age, 65);
        assert_approx(input.current_value, 10_000.0);
    }

    #[test]
    fn plan_response_serializes_tagged_outcome() {
        let response = plan_response_from_payload(PlanPayload::default()).expect("valid plan");
        assert_eq!(response.horizon_years, 35);
        let json = serde_json::to_value(&response).expect("response should serialize");

        assert_eq!(json["horizonYears"], 35);
        assert_eq!(
            json["outcome"]["status"],
            "additionalMonthlyContributionNeeded"
        );
        let amount = json["outcome"]["amount"].as_f64().expect("amount present");
        assert!((amount - 473.38).abs() <= 0.011, "got {amount}");
        let rate = json["rate"]["annualReturnRatePercent"]
            .as_f64()
            .expect("rate present");
        assert_approx(rate, 5.85);
        assert!(
            json["recommendation"]
                .as_str()
                .expect("recommendation present")
                .starts_with("Consider increasing")
        );
    }

    #[test]
    fn plan_response_for_large_balance_is_on_track() {
        let payload = payload_from_json(r#"{"currentValue": 900000, "monthlyContribution": 0}"#);
        let response = plan_response_from_payload(payload).expect("valid plan");
        assert_eq!(response.outcome, GoalOutcome::OnTrack);
        let json = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(json["outcome"], serde_json::json!({ "status": "onTrack" }));
    }

    #[test]
    fn projection_response_uses_rate_override_when_given() {
        let payload = payload_from_json(
            r#"{"age": 60, "retirementAge": 62, "currentValue": 1000,
                "monthlyContribution": 100, "annualReturnRatePercent": 10}"#,
        );
        let response = projection_response_from_payload(payload).expect("valid projection");
        assert_eq!(response.horizon_years, 2);
        assert_eq!(response.points.len(), 3);
        assert_approx(response.annual_return_rate_percent, 10.0);
        assert_approx(response.points[1].projected_value, 2_420.0);
        assert_approx(response.points[2].projected_value, 4_114.0);
    }

    #[test]
    fn projection_response_defaults_to_predicted_rate() {
        let response =
            projection_response_from_payload(PlanPayload::default()).expect("valid projection");
        assert_eq!(response.points.len(), 36);
        assert_approx(response.annual_return_rate_percent, 5.85);
    }

    #[test]
    fn projection_response_rejects_inverted_ages() {
        let payload = payload_from_json(r#"{"age": 70, "retirementAge": 65}"#);
        assert!(matches!(
            projection_response_from_payload(payload),
            Err(PlanError::InvalidHorizon { .. })
        ));
    }

    #[test]
    fn error_response_is_json_and_not_cached() {
        let response = error_response(StatusCode::BAD_REQUEST, "bad");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }
}
