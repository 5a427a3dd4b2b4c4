use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTolerance::Low => "Low",
            RiskTolerance::Medium => "Medium",
            RiskTolerance::High => "High",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanInput {
    pub age: u32,
    pub retirement_age: u32,
    pub current_value: f64,
    pub target_value: f64,
    pub monthly_contribution: f64,
    pub risk_tolerance: RiskTolerance,
}

impl PlanInput {
    /// Years left to invest. Zero or negative when the plan is already past
    /// retirement age.
    pub fn horizon_years(&self) -> i64 {
        i64::from(self.retirement_age) - i64::from(self.age)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePrediction {
    pub annual_return_rate_percent: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GoalOutcome {
    OnTrack,
    SufficientWithCurrentContribution,
    #[serde(rename_all = "camelCase")]
    AdditionalMonthlyContributionNeeded { amount: f64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year_offset: u32,
    pub projected_value: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEvaluation {
    pub rate: RatePrediction,
    pub horizon_years: u32,
    pub outcome: GoalOutcome,
}
