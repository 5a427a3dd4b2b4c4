use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("retirement age ({retirement_age}) must be greater than current age ({age})")]
    InvalidHorizon { age: u32, retirement_age: u32 },

    #[error("risk tolerance must be Low, Medium, or High (got {0:?})")]
    InvalidRiskTolerance(String),

    #[error("invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    #[error("failed to write summary: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        PlanError::InvalidInput {
            field,
            message: message.into(),
        }
    }
}
