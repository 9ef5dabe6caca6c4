// Rate and efficiency constants for the Sacramento / SMUD service area.
//
// The defaults live in a `Lazy` static and are only ever read. Callers pass a
// `&RateTable` into each estimate, so a JSON override loaded at startup is
// just another value of the same type.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::error::Error;

use crate::types::{RoofDirection, RoofTilt, Shading};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicRates {
    pub tier1: f64,
    pub tier2: f64,
    pub tier3: f64,
    pub summer_peak: f64,
    pub winter_peak: f64,
    pub sunshine_hours: f64,
    pub panel_efficiency: f64,
    pub degradation: f64,
    pub cost_per_watt: f64,
    pub federal_credit: f64,
    pub state_rebate: f64,
    pub utility_rebate: f64,
    /// kW of capacity one square foot of roof can carry.
    pub usable_roof_kw_per_sqft: f64,
    pub min_system_kw: f64,
    pub max_system_kw: f64,
    pub lifetime_years: u32,
}

impl BasicRates {
    /// Unweighted mean of the three tiers.
    pub fn average_tiered_rate(&self) -> f64 {
        (self.tier1 + self.tier2 + self.tier3) / 3.0
    }

    /// kWh produced per year by one kW of capacity.
    pub fn annual_yield_per_kw(&self) -> f64 {
        self.sunshine_hours * 365.0 * self.panel_efficiency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionFactors {
    pub south: f64,
    pub southwest: f64,
    pub southeast: f64,
    pub west: f64,
    pub east: f64,
    pub north: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingFactors {
    pub none: f64,
    pub minimal: f64,
    pub moderate: f64,
    pub heavy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiltFactors {
    pub flat: f64,
    pub low: f64,
    pub medium: f64,
    pub steep: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedRates {
    pub sun_hours: f64,
    pub flat_kwh_rate: f64,
    /// Annual kWh per installed kW.
    pub solar_irradiance: f64,
    pub panel_wattage: f64,
    pub panel_footprint_sq_ft: f64,
    pub cost_per_watt: f64,
    pub federal_credit: f64,
    pub loan_rate: f64,
    pub default_loan_term_years: u32,
    pub lifetime_years: u32,
    pub direction: DirectionFactors,
    pub shading: ShadingFactors,
    pub tilt: TiltFactors,
}

/// Longest loan term, in years, that an estimate accepts.
pub const MAX_LOAN_TERM_YEARS: u32 = 50;

impl AdvancedRates {
    pub fn direction_factor(&self, direction: Option<RoofDirection>) -> f64 {
        match direction {
            Some(RoofDirection::South) => self.direction.south,
            Some(RoofDirection::Southwest) => self.direction.southwest,
            Some(RoofDirection::Southeast) => self.direction.southeast,
            Some(RoofDirection::West) => self.direction.west,
            Some(RoofDirection::East) => self.direction.east,
            Some(RoofDirection::North) => self.direction.north,
            None => 1.0,
        }
    }

    pub fn shading_factor(&self, shading: Option<Shading>) -> f64 {
        match shading {
            Some(Shading::None) => self.shading.none,
            Some(Shading::Minimal) => self.shading.minimal,
            Some(Shading::Moderate) => self.shading.moderate,
            Some(Shading::Heavy) => self.shading.heavy,
            None => 1.0,
        }
    }

    pub fn tilt_factor(&self, tilt: Option<RoofTilt>) -> f64 {
        match tilt {
            Some(RoofTilt::Flat) => self.tilt.flat,
            Some(RoofTilt::Low) => self.tilt.low,
            Some(RoofTilt::Medium) => self.tilt.medium,
            Some(RoofTilt::Steep) => self.tilt.steep,
            None => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub basic: BasicRates,
    pub advanced: AdvancedRates,
}

/// SMUD rates and Sacramento solar factors (2025).
pub static SACRAMENTO: Lazy<RateTable> = Lazy::new(|| RateTable {
    basic: BasicRates {
        tier1: 0.1089,
        tier2: 0.1345,
        tier3: 0.1598,
        summer_peak: 0.1899,
        winter_peak: 0.1345,
        sunshine_hours: 6.5,
        panel_efficiency: 0.20,
        degradation: 0.005,
        cost_per_watt: 2.85,
        federal_credit: 0.30,
        state_rebate: 0.10,
        utility_rebate: 0.05,
        usable_roof_kw_per_sqft: 0.15,
        min_system_kw: 3.0,
        max_system_kw: 15.0,
        lifetime_years: 25,
    },
    advanced: AdvancedRates {
        sun_hours: 5.5,
        flat_kwh_rate: 0.145,
        solar_irradiance: 1900.0,
        panel_wattage: 400.0,
        panel_footprint_sq_ft: 20.0,
        cost_per_watt: 3.50,
        federal_credit: 0.30,
        loan_rate: 0.06,
        default_loan_term_years: 20,
        lifetime_years: 25,
        direction: DirectionFactors {
            south: 1.0,
            southwest: 0.95,
            southeast: 0.95,
            west: 0.85,
            east: 0.85,
            north: 0.65,
        },
        shading: ShadingFactors {
            none: 1.0,
            minimal: 0.95,
            moderate: 0.85,
            heavy: 0.70,
        },
        tilt: TiltFactors {
            flat: 0.90,
            low: 0.95,
            medium: 1.0,
            steep: 0.92,
        },
    },
});

impl Default for RateTable {
    fn default() -> Self {
        SACRAMENTO.clone()
    }
}

impl RateTable {
    /// Read a full table from a JSON file and check it before use.
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let content = std::fs::read_to_string(path)?;
        let table: RateTable = serde_json::from_str(&content)?;
        table.validate()?;
        Ok(table)
    }

    /// Every rate and factor must be finite and non-negative; panel
    /// geometry and year counts must be strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        let b = &self.basic;
        let a = &self.advanced;
        let values = [
            ("basic.tier1", b.tier1),
            ("basic.tier2", b.tier2),
            ("basic.tier3", b.tier3),
            ("basic.summer_peak", b.summer_peak),
            ("basic.winter_peak", b.winter_peak),
            ("basic.sunshine_hours", b.sunshine_hours),
            ("basic.panel_efficiency", b.panel_efficiency),
            ("basic.degradation", b.degradation),
            ("basic.cost_per_watt", b.cost_per_watt),
            ("basic.federal_credit", b.federal_credit),
            ("basic.state_rebate", b.state_rebate),
            ("basic.utility_rebate", b.utility_rebate),
            ("basic.usable_roof_kw_per_sqft", b.usable_roof_kw_per_sqft),
            ("basic.min_system_kw", b.min_system_kw),
            ("basic.max_system_kw", b.max_system_kw),
            ("advanced.sun_hours", a.sun_hours),
            ("advanced.flat_kwh_rate", a.flat_kwh_rate),
            ("advanced.solar_irradiance", a.solar_irradiance),
            ("advanced.cost_per_watt", a.cost_per_watt),
            ("advanced.federal_credit", a.federal_credit),
            ("advanced.loan_rate", a.loan_rate),
            ("advanced.direction.south", a.direction.south),
            ("advanced.direction.southwest", a.direction.southwest),
            ("advanced.direction.southeast", a.direction.southeast),
            ("advanced.direction.west", a.direction.west),
            ("advanced.direction.east", a.direction.east),
            ("advanced.direction.north", a.direction.north),
            ("advanced.shading.none", a.shading.none),
            ("advanced.shading.minimal", a.shading.minimal),
            ("advanced.shading.moderate", a.shading.moderate),
            ("advanced.shading.heavy", a.shading.heavy),
            ("advanced.tilt.flat", a.tilt.flat),
            ("advanced.tilt.low", a.tilt.low),
            ("advanced.tilt.medium", a.tilt.medium),
            ("advanced.tilt.steep", a.tilt.steep),
        ];
        if let Some((name, v)) = values.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(format!("rate table field {} must be a non-negative number, got {}", name, v));
        }
        if a.panel_wattage <= 0.0 || !a.panel_wattage.is_finite() {
            return Err(format!("advanced.panel_wattage must be positive, got {}", a.panel_wattage));
        }
        if a.panel_footprint_sq_ft <= 0.0 || !a.panel_footprint_sq_ft.is_finite() {
            return Err(format!(
                "advanced.panel_footprint_sq_ft must be positive, got {}",
                a.panel_footprint_sq_ft
            ));
        }
        if b.lifetime_years == 0 {
            return Err("basic.lifetime_years must be at least 1".to_string());
        }
        if a.lifetime_years == 0 {
            return Err("advanced.lifetime_years must be at least 1".to_string());
        }
        if a.default_loan_term_years == 0 || a.default_loan_term_years > MAX_LOAN_TERM_YEARS {
            return Err(format!(
                "advanced.default_loan_term_years must be between 1 and {}, got {}",
                MAX_LOAN_TERM_YEARS, a.default_loan_term_years
            ));
        }
        if b.min_system_kw > b.max_system_kw {
            return Err(format!(
                "basic.min_system_kw ({}) exceeds basic.max_system_kw ({})",
                b.min_system_kw, b.max_system_kw
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(SACRAMENTO.validate().is_ok());
        assert_eq!(RateTable::default(), *SACRAMENTO);
    }

    #[test]
    fn average_rate_is_unweighted_mean() {
        let avg = SACRAMENTO.basic.average_tiered_rate();
        assert!((avg - 0.1344).abs() < 1e-12);
    }

    #[test]
    fn absent_selectors_are_neutral() {
        let a = &SACRAMENTO.advanced;
        assert_eq!(a.direction_factor(None), 1.0);
        assert_eq!(a.shading_factor(None), 1.0);
        assert_eq!(a.tilt_factor(None), 1.0);
        assert_eq!(a.direction_factor(Some(RoofDirection::North)), 0.65);
        assert_eq!(a.shading_factor(Some(Shading::Heavy)), 0.70);
        assert_eq!(a.tilt_factor(Some(RoofTilt::Steep)), 0.92);
    }

    #[test]
    fn negative_rate_rejected() {
        let mut t = SACRAMENTO.clone();
        t.basic.tier2 = -0.1;
        let err = t.validate().unwrap_err();
        assert!(err.contains("basic.tier2"));
    }

    #[test]
    fn zero_panel_footprint_rejected() {
        let mut t = SACRAMENTO.clone();
        t.advanced.panel_footprint_sq_ft = 0.0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn zero_year_counts_rejected() {
        let mut t = SACRAMENTO.clone();
        t.advanced.default_loan_term_years = 0;
        assert!(t.validate().unwrap_err().contains("default_loan_term_years"));

        let mut t = SACRAMENTO.clone();
        t.advanced.default_loan_term_years = MAX_LOAN_TERM_YEARS + 1;
        assert!(t.validate().is_err());

        let mut t = SACRAMENTO.clone();
        t.advanced.lifetime_years = 0;
        assert!(t.validate().unwrap_err().contains("advanced.lifetime_years"));

        let mut t = SACRAMENTO.clone();
        t.basic.lifetime_years = 0;
        assert!(t.validate().unwrap_err().contains("basic.lifetime_years"));
    }

    #[test]
    fn zero_loan_term_file_fails_to_load() {
        let path = std::env::temp_dir().join("solar_estimator_rates_zero_term.json");
        let mut t = SACRAMENTO.clone();
        t.advanced.default_loan_term_years = 0;
        std::fs::write(&path, serde_json::to_string(&t).unwrap()).unwrap();
        assert!(RateTable::load(path.to_str().unwrap()).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_round_trips_through_json() {
        let path = std::env::temp_dir().join("solar_estimator_rates_test.json");
        let json = serde_json::to_string_pretty(&*SACRAMENTO).unwrap();
        std::fs::write(&path, json).unwrap();
        let loaded = RateTable::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded, *SACRAMENTO);
        let _ = std::fs::remove_file(&path);
    }
}
