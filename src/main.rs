// Entry point and menu-driven CLI flow.
//
// - Option [1] loads scenarios.csv and prints load diagnostics.
// - Option [2] estimates every loaded scenario, writes estimates.csv and
//   summary.json, and prints previews.
// - Option [3] prompts for a single scenario and prints the full report
//   with its 25-year outlook.
// - Option [4], or end of input, exits.
use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use solar_estimator::types::Scenario;
use solar_estimator::{
    loader, output, projection, reports, util, EstimateInput, Model, PaymentMethod, RateTable,
    RoofDirection, RoofTilt, Shading, SACRAMENTO,
};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCENARIOS_FILE: &str = "scenarios.csv";
const RATES_FILE: &str = "rates.json";

// Loaded scenarios survive between menu choices so the file is read once.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { scenarios: None }));

struct AppState {
    scenarios: Option<Vec<Scenario>>,
}

fn app_state() -> MutexGuard<'static, AppState> {
    match APP_STATE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// One trimmed line, or `None` once the input is closed or unreadable.
fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn read_input(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    read_trimmed_line(&mut io::stdin().lock())
}

// Closed input reads as a blank answer, so field prompts fall back to defaults.
fn prompt(label: &str) -> String {
    read_input(label).unwrap_or_default()
}

fn read_choice() -> Option<String> {
    read_input("Enter choice: ")
}

/// Ask whether to return to the menu after generating estimates.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = read_input("Back to Menu (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Use rates.json when present and valid, the built-in SMUD table otherwise.
fn load_rates() -> RateTable {
    if !Path::new(RATES_FILE).exists() {
        return SACRAMENTO.clone();
    }
    match RateTable::load(RATES_FILE) {
        Ok(table) => {
            println!("Rate table loaded from {}", RATES_FILE);
            table
        }
        Err(e) => {
            eprintln!("Ignoring {}: {}. Using built-in SMUD rates.", RATES_FILE, e);
            SACRAMENTO.clone()
        }
    }
}

fn handle_load() {
    match loader::load_scenarios(SCENARIOS_FILE) {
        Ok((scenarios, report)) => {
            println!(
                "Loading scenarios... ({} rows read, {} loaded)",
                util::format_int(report.total_rows),
                util::format_int(report.loaded_rows)
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to unreadable numbers.",
                    util::format_int(report.parse_errors)
                );
            }
            if report.unknown_selectors > 0 {
                println!(
                    "Warning: {} unrecognised selector values fell back to defaults.",
                    util::format_int(report.unknown_selectors)
                );
            }
            println!();
            app_state().scenarios = Some(scenarios);
        }
        Err(e) => {
            eprintln!("Failed to load {}: {}\n", SCENARIOS_FILE, e);
        }
    }
}

fn handle_generate(rates: &RateTable, year: i32) {
    let scenarios = app_state().scenarios.clone();
    let Some(scenarios) = scenarios else {
        println!("Error: No scenarios loaded. Please load {} first (option 1).\n", SCENARIOS_FILE);
        return;
    };

    println!("Estimating {} scenarios...\n", util::format_int(scenarios.len()));
    let outcomes = reports::run_scenarios(&scenarios, rates, year);

    let rows = reports::generate_estimates(&outcomes);
    let file = "estimates.csv";
    if let Err(e) = output::write_csv(file, &rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Scenario Estimates\n");
    output::preview_table_rows(&rows, 5);
    println!("(Full table exported to {})\n", file);

    let summary = reports::generate_summary(&outcomes);
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"estimated\": {}, \"rejected\": {}, \"avg_payback_years\": {}, \"total_annual_savings\": {}}}\n",
        summary.estimated,
        summary.rejected,
        util::format_number(summary.avg_payback_years, 1),
        util::format_number(summary.total_annual_savings, 2)
    );
}

fn optional_number(label: &str) -> Option<f64> {
    util::parse_f64_safe(Some(prompt(label).as_str()))
}

fn handle_quick_estimate(rates: &RateTable, year: i32) {
    let model = Model::from_key(&prompt("Model (basic/advanced) [advanced]: ")).unwrap_or(Model::Advanced);
    let mut input = EstimateInput {
        monthly_bill: optional_number("Monthly electric bill ($): "),
        annual_kwh: optional_number("Annual usage (kWh, blank to estimate from bill): "),
        roof_area_sq_ft: optional_number("Available roof area (sq ft): "),
        ..Default::default()
    };
    if model == Model::Advanced {
        input.roof_direction = RoofDirection::from_key(&prompt("Roof direction [south]: "));
        input.roof_tilt = RoofTilt::from_key(&prompt("Roof tilt (flat/low/medium/steep) [medium]: "));
        input.shading = Shading::from_key(&prompt("Shading (none/minimal/moderate/heavy) [none]: "));
        input.payment_method = PaymentMethod::from_key(&prompt("Payment (cash/loan) [cash]: "));
        if input.payment_method == PaymentMethod::Loan {
            input.loan_term_years = util::parse_u32_safe(Some(prompt("Loan term (years) [20]: ").as_str()));
        }
    }
    println!();

    let result = match solar_estimator::estimate(&input, rates, model, year) {
        Ok(r) => r,
        Err(e) => {
            println!("Cannot estimate: {}\n", e);
            return;
        }
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    println!("{}", output::render_report(&result, &today));

    let outlook = projection::yearly_projection(&result, rates.basic.degradation, year, 25);
    println!("25-Year Outlook (with {}% annual degradation)\n", rates.basic.degradation * 100.0);
    output::preview_table_rows(&reports::projection_rows(&outlook), 25);
    match projection::degraded_break_even(&outlook) {
        Some(y) => println!("Break-even with degradation: {}\n", y),
        None => println!("Break-even with degradation: not reached within 25 years\n"),
    }
}

fn main() {
    let rates = load_rates();
    let year = Local::now().year();

    loop {
        println!("Sacramento Solar Savings Estimator");
        println!("[1] Load scenarios ({})", SCENARIOS_FILE);
        println!("[2] Generate estimates");
        println!("[3] Quick estimate");
        println!("[4] Exit\n");
        let Some(choice) = read_choice() else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate(&rates, year);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!();
                handle_quick_estimate(&rates, year);
            }
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2, 3 or 4.\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn closed_input_reads_as_none() {
        let mut empty = Cursor::new(Vec::<u8>::new());
        assert_eq!(read_trimmed_line(&mut empty), None);
    }

    #[test]
    fn lines_are_trimmed_until_input_ends() {
        let mut input = Cursor::new(b" 2 \n\nY".to_vec());
        assert_eq!(read_trimmed_line(&mut input).as_deref(), Some("2"));
        assert_eq!(read_trimmed_line(&mut input).as_deref(), Some(""));
        assert_eq!(read_trimmed_line(&mut input).as_deref(), Some("Y"));
        assert_eq!(read_trimmed_line(&mut input), None);
    }
}
