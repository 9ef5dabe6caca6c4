use serde::Serialize;
use std::error::Error;
use tabled::{settings::Style, Table, Tabled};

use crate::types::EstimateResult;
use crate::util::{format_currency, format_number};

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[derive(Tabled, Clone)]
struct Line {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn section(title: &str, lines: Vec<(&str, String)>) -> String {
    let rows: Vec<Line> = lines
        .into_iter()
        .map(|(item, value)| Line { item: item.to_string(), value })
        .collect();
    format!("{}\n{}\n", title, Table::new(rows).with(Style::markdown()).to_string())
}

/// Printable plain-text report for one estimate.
pub fn render_report(r: &EstimateResult, generated_on: &str) -> String {
    let mut system = vec![
        ("Recommended System Size", format!("{} kW", format_number(r.system_size_kw, 1))),
        ("Annual Energy Production", format!("{} kWh/year", format_number(r.annual_production_kwh, 0))),
    ];
    if let Some(n) = r.panel_count {
        system.insert(1, ("Number of Panels", format!("{} panels", n)));
    }

    let mut financial = vec![
        ("System Cost (before incentives)", format_currency(r.gross_cost, 2)),
        ("Federal Tax Credit", format!("-{}", format_currency(r.incentives.federal, 2))),
    ];
    if r.incentives.state > 0.0 {
        financial.push(("State Rebate", format!("-{}", format_currency(r.incentives.state, 2))));
    }
    if r.incentives.utility > 0.0 {
        financial.push(("Utility Rebate", format!("-{}", format_currency(r.incentives.utility, 2))));
    }
    financial.push(("Net Cost After Incentives", format_currency(r.net_cost, 2)));
    if r.monthly_payment > 0.0 {
        financial.push(("Monthly Loan Payment", format_currency(r.monthly_payment, 2)));
        financial.push(("Total Paid Over Loan", format_currency(r.effective_cost, 2)));
    }

    let savings = vec![
        ("Monthly Savings", format_currency(r.monthly_savings, 0)),
        ("Annual Savings", format_currency(r.annual_savings, 2)),
        ("25-Year Savings", format_currency(r.lifetime_savings, 2)),
    ];

    let payback_text = if r.is_payback_calculable() {
        format!("{} years", format_number(r.payback_years, 1))
    } else {
        "not calculable".to_string()
    };
    let break_even_text = r
        .break_even_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "not calculable".to_string());
    let roi_text = if r.is_roi_calculable() {
        format!("{}%", format_number(r.roi_percent, 0))
    } else {
        "not calculable".to_string()
    };
    let payback = vec![
        ("Payback Period", payback_text),
        ("Break-even Year", break_even_text),
        ("ROI After 25 Years", roi_text),
    ];

    let mut out = String::new();
    out.push_str("Sacramento Solar Calculator Results\n");
    out.push_str(&format!("Generated on {}\n\n", generated_on));
    out.push_str(&section("System Specifications", system));
    out.push('\n');
    out.push_str(&section("Financial Analysis", financial));
    out.push('\n');
    out.push_str(&section("Savings Analysis", savings));
    out.push('\n');
    out.push_str(&section("Payback Analysis", payback));
    out.push_str("\nEstimate based on Sacramento, CA solar conditions and SMUD rates. Actual results may vary.\n");
    out
}
