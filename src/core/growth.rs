use super::types::ProjectionPoint;

/// Grows `principal` at `annual_rate_percent` compounded once a year.
pub fn future_value(principal: f64, annual_rate_percent: f64, years: f64) -> f64 {
    principal * (1.0 + annual_rate_percent / 100.0).powf(years)
}

/// Year-by-year values for charting, offsets `0..=horizon_years`.
///
/// Each point adds `year_offset` years of contributions to the starting value
/// as one lump sum and grows the combined amount for `year_offset` years. This
/// is a display approximation and differs from the annuity model
/// used by the goal solver.
pub fn projection_series(
    current_value: f64,
    annual_rate_percent: f64,
    horizon_years: u32,
    monthly_contribution: f64,
) -> Vec<ProjectionPoint> {
    (0..=horizon_years)
        .map(|year| {
            let contributed = monthly_contribution * 12.0 * f64::from(year);
            ProjectionPoint {
                year_offset: year,
                projected_value: future_value(
                    current_value + contributed,
                    annual_rate_percent,
                    f64::from(year),
                ),
            }
        })
        .collect()
}
