use crate::error::EstimateError;
use crate::estimator::estimate;
use crate::projection::YearOutlook;
use crate::rates::RateTable;
use crate::types::{EstimateResult, EstimateRow, ProjectionRow, Scenario, SummaryStats};
use crate::util::{average, format_currency, format_number, format_or_na};

/// Outcome of one scenario, kept alongside its id for reporting.
pub struct ScenarioOutcome {
    pub id: String,
    pub model: &'static str,
    pub result: Result<EstimateResult, EstimateError>,
}

pub fn run_scenarios(scenarios: &[Scenario], rates: &RateTable, current_year: i32) -> Vec<ScenarioOutcome> {
    scenarios
        .iter()
        .map(|s| ScenarioOutcome {
            id: s.id.clone(),
            model: s.model.label(),
            result: estimate(&s.input, rates, s.model, current_year),
        })
        .collect()
}

fn estimate_row(id: &str, model: &str, r: &EstimateResult) -> EstimateRow {
    EstimateRow {
        id: id.to_string(),
        model: model.to_string(),
        system_size_kw: format_number(r.system_size_kw, 1),
        panels: r.panel_count.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
        annual_production_kwh: format_number(r.annual_production_kwh, 0),
        net_cost: format_currency(r.net_cost, 2),
        annual_savings: format_currency(r.annual_savings, 2),
        payback_years: format_or_na(r.payback_years, 1),
        break_even_year: r
            .break_even_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "not calculable".to_string()),
        roi_percent: format_or_na(r.roi_percent, 0),
        status: "OK".to_string(),
    }
}

fn rejected_row(id: &str, model: &str, e: &EstimateError) -> EstimateRow {
    let dash = || "-".to_string();
    EstimateRow {
        id: id.to_string(),
        model: model.to_string(),
        system_size_kw: dash(),
        panels: dash(),
        annual_production_kwh: dash(),
        net_cost: dash(),
        annual_savings: dash(),
        payback_years: dash(),
        break_even_year: dash(),
        roi_percent: dash(),
        status: format!("Rejected: {}", e),
    }
}

pub fn generate_estimates(outcomes: &[ScenarioOutcome]) -> Vec<EstimateRow> {
    outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(r) => estimate_row(&o.id, o.model, r),
            Err(e) => rejected_row(&o.id, o.model, e),
        })
        .collect()
}

pub fn generate_summary(outcomes: &[ScenarioOutcome]) -> SummaryStats {
    let ok: Vec<&EstimateResult> = outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect();
    let sizes: Vec<f64> = ok.iter().map(|r| r.system_size_kw).collect();
    let paybacks: Vec<f64> = ok
        .iter()
        .map(|r| r.payback_years)
        .filter(|p| p.is_finite())
        .collect();
    SummaryStats {
        total_scenarios: outcomes.len(),
        estimated: ok.len(),
        rejected: outcomes.len() - ok.len(),
        avg_system_size_kw: average(&sizes),
        avg_payback_years: average(&paybacks),
        total_annual_savings: ok.iter().map(|r| r.annual_savings).sum(),
        total_net_cost: ok.iter().map(|r| r.net_cost).sum(),
    }
}

pub fn projection_rows(outlook: &[YearOutlook]) -> Vec<ProjectionRow> {
    outlook
        .iter()
        .map(|y| ProjectionRow {
            year: y.year,
            production_kwh: format_number(y.production_kwh, 0),
            savings: format_currency(y.savings, 2),
            cumulative_net: format_currency(y.cumulative_net, 2),
        })
        .collect()
}
