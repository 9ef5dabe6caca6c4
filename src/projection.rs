use crate::types::EstimateResult;

/// One year of the degraded outlook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearOutlook {
    pub year: i32,
    pub production_kwh: f64,
    pub savings: f64,
    /// Cumulative savings minus the effective cost.
    pub cumulative_net: f64,
}

/// Year-by-year outlook where panel output falls by `degradation` each year
/// after the first. Savings scale with production.
///
/// This is a supplementary view; the closed-form lifetime and ROI figures
/// on the result are left as they are.
pub fn yearly_projection(
    result: &EstimateResult,
    degradation: f64,
    first_year: i32,
    years: u32,
) -> Vec<YearOutlook> {
    let mut rows = Vec::with_capacity(years as usize);
    let mut cumulative = -result.effective_cost;
    for i in 0..years {
        let retained = (1.0 - degradation).powi(i as i32);
        let production_kwh = result.annual_production_kwh * retained;
        let savings = result.annual_savings * retained;
        cumulative += savings;
        rows.push(YearOutlook {
            year: first_year + i as i32,
            production_kwh,
            savings,
            cumulative_net: cumulative,
        });
    }
    rows
}

/// First calendar year whose cumulative position is non-negative.
pub fn degraded_break_even(outlook: &[YearOutlook]) -> Option<i32> {
    outlook.iter().find(|y| y.cumulative_net >= 0.0).map(|y| y.year)
}
