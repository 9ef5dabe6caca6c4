use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Which estimation pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Bill-driven sizing, tiered net-metering credit, cash purchase.
    Basic,
    /// Roof-constrained sizing, efficiency factors, cash or loan.
    Advanced,
}

impl Model {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "basic" | "simple" => Some(Model::Basic),
            "advanced" => Some(Model::Advanced),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Model::Basic => "basic",
            Model::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofDirection {
    South,
    Southwest,
    Southeast,
    West,
    East,
    North,
}

impl RoofDirection {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "south" => Some(RoofDirection::South),
            "southwest" => Some(RoofDirection::Southwest),
            "southeast" => Some(RoofDirection::Southeast),
            "west" => Some(RoofDirection::West),
            "east" => Some(RoofDirection::East),
            "north" => Some(RoofDirection::North),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofTilt {
    Flat,
    Low,
    Medium,
    Steep,
}

impl RoofTilt {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "flat" => Some(RoofTilt::Flat),
            "low" => Some(RoofTilt::Low),
            "medium" => Some(RoofTilt::Medium),
            "steep" => Some(RoofTilt::Steep),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    None,
    Minimal,
    Moderate,
    Heavy,
}

impl Shading {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Shading::None),
            "minimal" => Some(Shading::Minimal),
            "moderate" => Some(Shading::Moderate),
            "heavy" => Some(Shading::Heavy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Loan,
}

impl PaymentMethod {
    /// Anything other than `loan` is a cash purchase.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "loan" => PaymentMethod::Loan,
            _ => PaymentMethod::Cash,
        }
    }
}

/// Caller-supplied figures for one estimate. Numbers are already parsed;
/// range checks happen in the estimator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    pub monthly_bill: Option<f64>,
    pub annual_kwh: Option<f64>,
    pub roof_area_sq_ft: Option<f64>,
    pub roof_direction: Option<RoofDirection>,
    pub roof_tilt: Option<RoofTilt>,
    pub shading: Option<Shading>,
    pub payment_method: PaymentMethod,
    pub loan_term_years: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Incentives {
    pub federal: f64,
    pub state: f64,
    pub utility: f64,
}

impl Incentives {
    pub fn total(&self) -> f64 {
        self.federal + self.state + self.utility
    }
}

/// Output of a single estimate.
///
/// `payback_years` and `roi_percent` are `INFINITY`/`NaN` when savings or
/// cost are zero; check [`EstimateResult::is_payback_calculable`] before
/// showing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResult {
    pub model: Model,
    pub annual_usage_kwh: f64,
    pub system_size_kw: f64,
    pub panel_count: Option<u32>,
    pub annual_production_kwh: f64,
    pub gross_cost: f64,
    pub incentives: Incentives,
    pub incentive_total: f64,
    pub net_cost: f64,
    pub payment_method: PaymentMethod,
    pub monthly_payment: f64,
    pub effective_cost: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub lifetime_savings: f64,
    pub payback_years: f64,
    pub break_even_year: Option<i32>,
    pub roi_percent: f64,
}

impl EstimateResult {
    pub fn is_payback_calculable(&self) -> bool {
        self.payback_years.is_finite()
    }

    pub fn is_roi_calculable(&self) -> bool {
        self.roi_percent.is_finite()
    }
}

#[derive(Debug, Deserialize)]
pub struct RawScenario {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "Model")]
    pub model: Option<String>,
    #[serde(rename = "MonthlyBill")]
    pub monthly_bill: Option<String>,
    #[serde(rename = "AnnualKwh")]
    pub annual_kwh: Option<String>,
    #[serde(rename = "RoofAreaSqFt")]
    pub roof_area_sq_ft: Option<String>,
    #[serde(rename = "RoofDirection")]
    pub roof_direction: Option<String>,
    #[serde(rename = "RoofTilt")]
    pub roof_tilt: Option<String>,
    #[serde(rename = "Shading")]
    pub shading: Option<String>,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "LoanTermYears")]
    pub loan_term_years: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub id: String,
    pub model: Model,
    pub input: EstimateInput,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct EstimateRow {
    #[serde(rename = "Id")]
    #[tabled(rename = "Id")]
    pub id: String,
    #[serde(rename = "Model")]
    #[tabled(rename = "Model")]
    pub model: String,
    #[serde(rename = "SystemSizeKw")]
    #[tabled(rename = "SystemSizeKw")]
    pub system_size_kw: String,
    #[serde(rename = "Panels")]
    #[tabled(rename = "Panels")]
    pub panels: String,
    #[serde(rename = "AnnualProductionKwh")]
    #[tabled(rename = "AnnualProductionKwh")]
    pub annual_production_kwh: String,
    #[serde(rename = "NetCost")]
    #[tabled(rename = "NetCost")]
    pub net_cost: String,
    #[serde(rename = "AnnualSavings")]
    #[tabled(rename = "AnnualSavings")]
    pub annual_savings: String,
    #[serde(rename = "PaybackYears")]
    #[tabled(rename = "PaybackYears")]
    pub payback_years: String,
    #[serde(rename = "BreakEvenYear")]
    #[tabled(rename = "BreakEvenYear")]
    pub break_even_year: String,
    #[serde(rename = "RoiPercent")]
    #[tabled(rename = "RoiPercent")]
    pub roi_percent: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProjectionRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "ProductionKwh")]
    #[tabled(rename = "ProductionKwh")]
    pub production_kwh: String,
    #[serde(rename = "Savings")]
    #[tabled(rename = "Savings")]
    pub savings: String,
    #[serde(rename = "CumulativeNet")]
    #[tabled(rename = "CumulativeNet")]
    pub cumulative_net: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_scenarios: usize,
    pub estimated: usize,
    pub rejected: usize,
    pub avg_system_size_kw: f64,
    pub avg_payback_years: f64,
    pub total_annual_savings: f64,
    pub total_net_cost: f64,
}
