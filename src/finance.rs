// Money helpers shared by both estimators: net-metering credit against the
// three-tier schedule, loan amortization, payback and return figures.
use crate::rates::BasicRates;

/// Share of annual usage billed at tier 1.
pub const TIER1_SHARE: f64 = 0.4;
/// Share of annual usage billed at tier 2.
pub const TIER2_BAND: f64 = 0.3;
/// Cumulative share of annual usage billed at tiers 1 and 2.
pub const TIER2_SHARE: f64 = 0.7;

/// Unrounded credit for `production` kWh offset against `usage` kWh.
///
/// Each band's upper edge is inclusive. Production past 70% of usage is all
/// credited at tier 3 with no cap, even when it exceeds usage.
pub fn tiered_credit(production: f64, usage: f64, rates: &BasicRates) -> f64 {
    let tier1_cap = usage * TIER1_SHARE;
    let tier2_cap = usage * TIER2_SHARE;
    if production <= tier1_cap {
        production * rates.tier1
    } else if production <= tier2_cap {
        tier1_cap * rates.tier1 + (production - tier1_cap) * rates.tier2
    } else {
        tier1_cap * rates.tier1
            + usage * TIER2_BAND * rates.tier2
            + (production - tier2_cap) * rates.tier3
    }
}

/// Tiered credit rounded to whole currency units.
pub fn tiered_savings(production: f64, usage: f64, rates: &BasicRates) -> f64 {
    tiered_credit(production, usage, rates).round()
}

/// Fixed-rate amortized monthly payment on `principal`.
///
/// Falls back to straight division when the rate is zero. `term_months`
/// must be positive.
pub fn amortized_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    let n = term_months as f64;
    let r = annual_rate / 12.0;
    if r == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + r).powf(n);
    principal * (r * growth) / (growth - 1.0)
}

/// Years until cumulative savings cover `cost`.
///
/// Zero savings gives `INFINITY` (or `NaN` when the cost is zero too).
pub fn payback_years(cost: f64, annual_savings: f64) -> f64 {
    cost / annual_savings
}

/// `None` when the payback period is not a finite number or the year it
/// lands on cannot be represented.
pub fn break_even_year(current_year: i32, payback: f64) -> Option<i32> {
    let years = payback.ceil();
    if !years.is_finite() || years < i32::MIN as f64 || years > i32::MAX as f64 {
        return None;
    }
    current_year.checked_add(years as i32)
}

pub fn lifetime_savings(annual_savings: f64, years: u32, cost: f64) -> f64 {
    annual_savings * years as f64 - cost
}

pub fn roi_percent(lifetime: f64, cost: f64) -> f64 {
    lifetime / cost * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::SACRAMENTO;

    #[test]
    fn tier_bands() {
        let r = &SACRAMENTO.basic;
        assert!((tiered_credit(1000.0, 10000.0, r) - 108.9).abs() < 1e-9);
        let mid = 4000.0 * 0.1089 + 1000.0 * 0.1345;
        assert!((tiered_credit(5000.0, 10000.0, r) - mid).abs() < 1e-9);
        let top = 4000.0 * 0.1089 + 3000.0 * 0.1345 + 1000.0 * 0.1598;
        assert!((tiered_credit(8000.0, 10000.0, r) - top).abs() < 1e-9);
    }

    #[test]
    fn upper_edge_is_inclusive() {
        let r = &SACRAMENTO.basic;
        assert!((tiered_credit(4000.0, 10000.0, r) - 4000.0 * r.tier1).abs() < 1e-9);
        let at_tier2 = tiered_credit(7000.0, 10000.0, r);
        assert!((at_tier2 - (4000.0 * r.tier1 + 3000.0 * r.tier2)).abs() < 1e-9);
    }

    #[test]
    fn savings_are_rounded() {
        let r = &SACRAMENTO.basic;
        assert_eq!(tiered_savings(1000.0, 10000.0, r), 109.0);
    }

    #[test]
    fn zero_rate_loan_is_straight_division() {
        assert_eq!(amortized_payment(12000.0, 0.0, 120), 100.0);
    }

    #[test]
    fn known_amortization() {
        // 100k at 6% over 30 years.
        let p = amortized_payment(100_000.0, 0.06, 360);
        assert!((p - 599.55).abs() < 0.01, "got {}", p);
    }

    #[test]
    fn zero_savings_payback_is_not_finite() {
        assert_eq!(payback_years(100.0, 0.0), f64::INFINITY);
        assert!(payback_years(0.0, 0.0).is_nan());
        assert_eq!(break_even_year(2026, f64::INFINITY), None);
        assert_eq!(break_even_year(2026, f64::NAN), None);
    }

    #[test]
    fn break_even_rounds_up() {
        assert_eq!(break_even_year(2026, 8.1), Some(2035));
        assert_eq!(break_even_year(2026, 9.0), Some(2035));
    }

    #[test]
    fn break_even_past_representable_years_is_none() {
        assert_eq!(break_even_year(2026, 1.3e12), None);
        assert_eq!(break_even_year(2026, f64::MAX), None);
        assert_eq!(break_even_year(2026, (i32::MAX - 2026) as f64), Some(i32::MAX));
        assert_eq!(break_even_year(2026, (i32::MAX - 2025) as f64), None);
    }
}
