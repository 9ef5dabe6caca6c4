// Advanced estimator: roof-constrained sizing, orientation/tilt/shading
// losses, flat-rate savings and cash or loan financing.
use crate::finance;
use crate::rates::AdvancedRates;
use crate::types::{EstimateResult, Incentives, Model, PaymentMethod, RoofDirection, RoofTilt, Shading};

pub fn usage_from_bill(monthly_bill: f64, rates: &AdvancedRates) -> f64 {
    monthly_bill / rates.flat_kwh_rate * 12.0
}

/// Capacity needed to cover `annual_usage` at the site's yield.
pub fn usage_size(annual_usage: f64, rates: &AdvancedRates) -> f64 {
    annual_usage / rates.solar_irradiance
}

/// Largest capacity whole panels can reach on the roof.
pub fn roof_max_size(roof_area_sq_ft: f64, rates: &AdvancedRates) -> f64 {
    let max_panels = (roof_area_sq_ft / rates.panel_footprint_sq_ft).floor();
    max_panels * rates.panel_wattage / 1000.0
}

pub fn size_system(annual_usage: f64, roof_area_sq_ft: f64, rates: &AdvancedRates) -> f64 {
    usage_size(annual_usage, rates).min(roof_max_size(roof_area_sq_ft, rates))
}

pub fn panel_count(system_size_kw: f64, rates: &AdvancedRates) -> u32 {
    (system_size_kw * 1000.0 / rates.panel_wattage).ceil() as u32
}

/// Product of the direction, shading and tilt multipliers.
pub fn efficiency_factor(
    direction: Option<RoofDirection>,
    tilt: Option<RoofTilt>,
    shading: Option<Shading>,
    rates: &AdvancedRates,
) -> f64 {
    rates.direction_factor(direction) * rates.shading_factor(shading) * rates.tilt_factor(tilt)
}

pub fn annual_production(system_size_kw: f64, efficiency: f64, rates: &AdvancedRates) -> f64 {
    system_size_kw * rates.solar_irradiance * efficiency
}

/// What the owner pays in total and per month for the given financing.
///
/// A loan's total can exceed the net cost; payback is measured against it.
/// A term too long to count in months gives `NaN` for both figures.
pub fn financed_cost(
    net_cost: f64,
    method: PaymentMethod,
    loan_term_years: u32,
    rates: &AdvancedRates,
) -> (f64, f64) {
    match method {
        PaymentMethod::Cash => (net_cost, 0.0),
        PaymentMethod::Loan => {
            let Some(months) = loan_term_years.checked_mul(12) else {
                return (f64::NAN, f64::NAN);
            };
            let monthly = finance::amortized_payment(net_cost, rates.loan_rate, months);
            (monthly * months as f64, monthly)
        }
    }
}

pub(crate) struct Site {
    pub roof_area_sq_ft: f64,
    pub direction: Option<RoofDirection>,
    pub tilt: Option<RoofTilt>,
    pub shading: Option<Shading>,
}

pub(crate) fn run(
    annual_usage: f64,
    site: &Site,
    method: PaymentMethod,
    loan_term_years: u32,
    rates: &AdvancedRates,
    current_year: i32,
) -> EstimateResult {
    let system_size_kw = size_system(annual_usage, site.roof_area_sq_ft, rates);
    let efficiency = efficiency_factor(site.direction, site.tilt, site.shading, rates);
    let annual_production_kwh = annual_production(system_size_kw, efficiency, rates);

    let gross_cost = system_size_kw * 1000.0 * rates.cost_per_watt;
    let incentives = Incentives {
        federal: gross_cost * rates.federal_credit,
        ..Incentives::default()
    };
    let incentive_total = incentives.total();
    let net_cost = gross_cost - incentive_total;

    let annual_savings = annual_production_kwh * rates.flat_kwh_rate;
    let (effective_cost, monthly_payment) = financed_cost(net_cost, method, loan_term_years, rates);

    let payback_years = finance::payback_years(effective_cost, annual_savings);
    let lifetime_savings =
        finance::lifetime_savings(annual_savings, rates.lifetime_years, effective_cost);

    EstimateResult {
        model: Model::Advanced,
        annual_usage_kwh: annual_usage,
        system_size_kw,
        panel_count: Some(panel_count(system_size_kw, rates)),
        annual_production_kwh,
        gross_cost,
        incentives,
        incentive_total,
        net_cost,
        payment_method: method,
        monthly_payment,
        effective_cost,
        monthly_savings: annual_savings / 12.0,
        annual_savings,
        lifetime_savings,
        payback_years,
        break_even_year: finance::break_even_year(current_year, payback_years),
        roi_percent: finance::roi_percent(lifetime_savings, effective_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::SACRAMENTO;

    #[test]
    fn roof_max_uses_whole_panels() {
        let r = &SACRAMENTO.advanced;
        assert_eq!(roof_max_size(1000.0, r), 20.0);
        // 59 sq ft fits two 20 sq ft panels.
        assert!((roof_max_size(59.0, r) - 0.8).abs() < 1e-12);
        assert_eq!(roof_max_size(19.0, r), 0.0);
    }

    #[test]
    fn roof_binds_when_usage_is_large() {
        let r = &SACRAMENTO.advanced;
        assert_eq!(size_system(1.0e6, 200.0, r), 4.0);
        assert_eq!(panel_count(4.0, r), 10);
    }

    #[test]
    fn partial_panel_rounds_up() {
        assert_eq!(panel_count(4.01, &SACRAMENTO.advanced), 11);
    }

    #[test]
    fn composite_factor() {
        let r = &SACRAMENTO.advanced;
        let f = efficiency_factor(
            Some(RoofDirection::West),
            Some(RoofTilt::Flat),
            Some(Shading::Moderate),
            r,
        );
        assert!((f - 0.85 * 0.90 * 0.85).abs() < 1e-12);
        assert_eq!(efficiency_factor(None, None, None, r), 1.0);
    }

    #[test]
    fn loan_total_exceeds_net() {
        let r = &SACRAMENTO.advanced;
        let (total, monthly) = financed_cost(20_000.0, PaymentMethod::Loan, 20, r);
        assert!(total > 20_000.0);
        assert!((total - monthly * 240.0).abs() < 1e-6);
        assert_eq!(financed_cost(20_000.0, PaymentMethod::Cash, 20, r), (20_000.0, 0.0));
    }

    #[test]
    fn uncountable_loan_term_is_not_a_number() {
        let r = &SACRAMENTO.advanced;
        let (total, monthly) = financed_cost(20_000.0, PaymentMethod::Loan, 400_000_000, r);
        assert!(total.is_nan());
        assert!(monthly.is_nan());
    }
}
