use crate::types::{
    EstimateInput, Model, PaymentMethod, RawScenario, RoofDirection, RoofTilt, Scenario, Shading,
};
use crate::util::{non_blank, parse_f64_safe, parse_u32_safe};
use csv::ReaderBuilder;
use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    /// Selector values (direction, tilt, shading, model, payment) that were
    /// not recognised and fell back to their neutral default.
    pub unknown_selectors: usize,
}

/// Parse an optional numeric cell. A blank cell is `Ok(None)`; text that is
/// present but not a number is `Err(())`.
fn numeric_cell(s: Option<&str>) -> Result<Option<f64>, ()> {
    match non_blank(s) {
        None => Ok(None),
        Some(t) => parse_f64_safe(Some(t)).map(Some).ok_or(()),
    }
}

fn term_cell(s: Option<&str>) -> Result<Option<u32>, ()> {
    match non_blank(s) {
        None => Ok(None),
        Some(t) => parse_u32_safe(Some(t)).map(Some).ok_or(()),
    }
}

/// Look up a selector; a non-blank value that isn't recognised bumps
/// `unknown` and is treated as absent.
fn selector<T>(s: Option<&str>, parse: fn(&str) -> Option<T>, unknown: &mut usize) -> Option<T> {
    let text = non_blank(s)?;
    let parsed = parse(text);
    if parsed.is_none() {
        *unknown += 1;
    }
    parsed
}

fn scenario_from_row(row: RawScenario, index: usize, unknown: &mut usize) -> Result<Scenario, ()> {
    let monthly_bill = numeric_cell(row.monthly_bill.as_deref())?;
    let annual_kwh = numeric_cell(row.annual_kwh.as_deref())?;
    let roof_area_sq_ft = numeric_cell(row.roof_area_sq_ft.as_deref())?;
    let loan_term_years = term_cell(row.loan_term_years.as_deref())?;

    let model = match selector(row.model.as_deref(), Model::from_key, unknown) {
        Some(m) => m,
        None => Model::Advanced,
    };
    let payment_method = match non_blank(row.payment_method.as_deref()) {
        None => PaymentMethod::Cash,
        Some(text) => {
            let method = PaymentMethod::from_key(text);
            if method == PaymentMethod::Cash && !text.eq_ignore_ascii_case("cash") {
                *unknown += 1;
            }
            method
        }
    };

    let id = non_blank(row.id.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("row-{}", index));

    Ok(Scenario {
        id,
        model,
        input: EstimateInput {
            monthly_bill,
            annual_kwh,
            roof_area_sq_ft,
            roof_direction: selector(row.roof_direction.as_deref(), RoofDirection::from_key, unknown),
            roof_tilt: selector(row.roof_tilt.as_deref(), RoofTilt::from_key, unknown),
            shading: selector(row.shading.as_deref(), Shading::from_key, unknown),
            payment_method,
            loan_term_years,
        },
    })
}

pub fn load_scenarios(path: &str) -> Result<(Vec<Scenario>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_path(path)?;
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut unknown_selectors = 0usize;
    let mut scenarios: Vec<Scenario> = Vec::new();

    for result in rdr.deserialize::<RawScenario>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        match scenario_from_row(row, total_rows, &mut unknown_selectors) {
            Ok(s) => scenarios.push(s),
            Err(()) => parse_errors += 1,
        }
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: scenarios.len(),
        parse_errors,
        unknown_selectors,
    };
    Ok((scenarios, report))
}
