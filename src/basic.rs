// Basic estimator: bill -> usage -> system size -> tiered savings -> payback.
use crate::finance;
use crate::rates::BasicRates;
use crate::types::{EstimateResult, Incentives, Model, PaymentMethod};

/// Annual kWh implied by a monthly bill at the average tier rate.
/// A non-positive bill yields 0.
pub fn estimate_usage(monthly_bill: f64, rates: &BasicRates) -> f64 {
    if monthly_bill <= 0.0 {
        return 0.0;
    }
    monthly_bill / rates.average_tiered_rate() * 12.0
}

/// Recommended capacity in kW, limited by usable roof area when given,
/// held to the configured band and rounded to one decimal.
pub fn size_system(annual_usage: f64, roof_area_sq_ft: Option<f64>, rates: &BasicRates) -> f64 {
    let mut size = annual_usage / rates.annual_yield_per_kw();
    if let Some(roof) = roof_area_sq_ft {
        size = size.min(roof * rates.usable_roof_kw_per_sqft);
    }
    let size = size.clamp(rates.min_system_kw, rates.max_system_kw);
    (size * 10.0).round() / 10.0
}

pub fn annual_production(system_size_kw: f64, rates: &BasicRates) -> f64 {
    system_size_kw * rates.annual_yield_per_kw()
}

pub fn incentives(gross_cost: f64, rates: &BasicRates) -> Incentives {
    Incentives {
        federal: gross_cost * rates.federal_credit,
        state: gross_cost * rates.state_rebate,
        utility: gross_cost * rates.utility_rebate,
    }
}

/// Runs the pipeline over an already-resolved usage figure.
pub(crate) fn run(
    annual_usage: f64,
    roof_area_sq_ft: Option<f64>,
    rates: &BasicRates,
    current_year: i32,
) -> EstimateResult {
    let system_size_kw = size_system(annual_usage, roof_area_sq_ft, rates);
    let gross_cost = system_size_kw * 1000.0 * rates.cost_per_watt;
    let incentives = incentives(gross_cost, rates);
    let incentive_total = incentives.total();
    let net_cost = gross_cost - incentive_total;

    let annual_production_kwh = annual_production(system_size_kw, rates);
    let annual_savings = finance::tiered_savings(annual_production_kwh, annual_usage, rates);
    let payback_years = finance::payback_years(net_cost, annual_savings);
    let lifetime_savings = finance::lifetime_savings(annual_savings, rates.lifetime_years, net_cost);

    EstimateResult {
        model: Model::Basic,
        annual_usage_kwh: annual_usage,
        system_size_kw,
        panel_count: None,
        annual_production_kwh,
        gross_cost,
        incentives,
        incentive_total,
        net_cost,
        payment_method: PaymentMethod::Cash,
        monthly_payment: 0.0,
        effective_cost: net_cost,
        monthly_savings: annual_savings / 12.0,
        annual_savings,
        lifetime_savings,
        payback_years,
        break_even_year: finance::break_even_year(current_year, payback_years),
        roi_percent: finance::roi_percent(lifetime_savings, net_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::SACRAMENTO;

    #[test]
    fn usage_from_bill() {
        let r = &SACRAMENTO.basic;
        let usage = estimate_usage(200.0, r);
        assert!((usage - 200.0 / 0.1344 * 12.0).abs() < 1e-9);
        assert_eq!(estimate_usage(0.0, r), 0.0);
        assert_eq!(estimate_usage(-5.0, r), 0.0);
    }

    #[test]
    fn size_band_holds() {
        let r = &SACRAMENTO.basic;
        assert_eq!(size_system(1.0, None, r), 3.0);
        assert_eq!(size_system(1.0e9, None, r), 15.0);
    }

    #[test]
    fn roof_limit_binds_before_band() {
        let r = &SACRAMENTO.basic;
        // 50 sq ft caps at 7.5 kW even though usage asks for the maximum.
        assert_eq!(size_system(1.0e9, Some(50.0), r), 7.5);
        // Tiny roof still gets the band floor.
        assert_eq!(size_system(1.0e9, Some(1.0), r), 3.0);
    }

    #[test]
    fn size_rounds_to_one_decimal() {
        let r = &SACRAMENTO.basic;
        // 474.5 kWh per kW; 2847 kWh asks for 6.0 kW exactly, 3000 for 6.322...
        assert_eq!(size_system(2847.0, None, r), 6.0);
        assert_eq!(size_system(3000.0, None, r), 6.3);
    }

    #[test]
    fn incentive_split() {
        let i = incentives(10_000.0, &SACRAMENTO.basic);
        assert!((i.federal - 3000.0).abs() < 1e-9);
        assert!((i.state - 1000.0).abs() < 1e-9);
        assert!((i.utility - 500.0).abs() < 1e-9);
        assert!((i.total() - 4500.0).abs() < 1e-9);
    }
}
