// Single entry point for both estimators. Input checks live here so the
// pipelines in `basic` and `advanced` only ever see usable numbers.
use crate::advanced::{self, Site};
use crate::basic;
use crate::error::EstimateError;
use crate::rates::{RateTable, MAX_LOAN_TERM_YEARS};
use crate::types::{EstimateInput, EstimateResult, Model, PaymentMethod};

fn check_non_negative(field: &'static str, value: Option<f64>) -> Result<Option<f64>, EstimateError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(EstimateError::InvalidInput { field, value: v }),
        other => Ok(other),
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Run `model` over `input` with the given constants.
///
/// `current_year` anchors the break-even year so that identical inputs give
/// identical results.
pub fn estimate(
    input: &EstimateInput,
    rates: &RateTable,
    model: Model,
    current_year: i32,
) -> Result<EstimateResult, EstimateError> {
    let bill = positive(check_non_negative("monthly_bill", input.monthly_bill)?);
    let annual_kwh = positive(check_non_negative("annual_kwh", input.annual_kwh)?);
    let roof = positive(check_non_negative("roof_area_sq_ft", input.roof_area_sq_ft)?);

    if bill.is_none() && annual_kwh.is_none() {
        return Err(EstimateError::MissingRequiredInput("monthly bill or annual usage"));
    }

    match model {
        Model::Basic => {
            let usage = match annual_kwh {
                Some(kwh) => kwh,
                None => basic::estimate_usage(bill.unwrap_or(0.0), &rates.basic),
            };
            Ok(basic::run(usage, roof, &rates.basic, current_year))
        }
        Model::Advanced => {
            let roof_area_sq_ft = roof.ok_or(EstimateError::MissingRequiredInput("roof area"))?;
            let loan_term_years = match input.payment_method {
                PaymentMethod::Cash => 0,
                PaymentMethod::Loan => {
                    let years = input
                        .loan_term_years
                        .unwrap_or(rates.advanced.default_loan_term_years);
                    if years == 0 || years > MAX_LOAN_TERM_YEARS {
                        return Err(EstimateError::InvalidInput {
                            field: "loan_term_years",
                            value: years as f64,
                        });
                    }
                    years
                }
            };
            let usage = match annual_kwh {
                Some(kwh) => kwh,
                None => advanced::usage_from_bill(bill.unwrap_or(0.0), &rates.advanced),
            };
            let site = Site {
                roof_area_sq_ft,
                direction: input.roof_direction,
                tilt: input.roof_tilt,
                shading: input.shading,
            };
            Ok(advanced::run(
                usage,
                &site,
                input.payment_method,
                loan_term_years,
                &rates.advanced,
                current_year,
            ))
        }
    }
}
