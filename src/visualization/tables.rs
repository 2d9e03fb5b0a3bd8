use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::{LogisticFit, Prediction, SeedEstimate};
use crate::config::DataConfig;
use crate::io::CleaningReport;
use crate::models::CatchSeries;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "NA".to_string())
}

/// R-style rendering of a p-value.
fn format_p_value(p: Option<f64>) -> String {
    match p {
        None => "NA".to_string(),
        Some(p) if p < 2e-16 => "< 2e-16".to_string(),
        Some(p) if p < 1e-4 => format!("{p:.2e}"),
        Some(p) => format!("{p:.4}"),
    }
}

fn significance_code(p: Option<f64>) -> &'static str {
    match p {
        Some(p) if p < 0.001 => "***",
        Some(p) if p < 0.01 => "**",
        Some(p) if p < 0.05 => "*",
        Some(p) if p < 0.1 => ".",
        _ => "",
    }
}

/// Format the dataset overview as a string.
pub fn format_series_summary(series: &CatchSeries, data: &DataConfig) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Catch Series Summary".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Metric", "Value", "Unit"]);
    let unit = data.unit_label.as_str();

    table.add_row(vec![Cell::new("Dataset"), Cell::new(&series.name), Cell::new("")]);
    let span = match (series.first_year(), series.last_year()) {
        (Some(first), Some(last)) => format!("{first}-{last}"),
        _ => "-".to_string(),
    };
    table.add_row(vec![Cell::new("Years"), Cell::new(span), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Observations"),
        Cell::new(format!("{}", series.len())),
        Cell::new("years"),
    ]);
    table.add_row(vec![
        Cell::new("Missing Years"),
        Cell::new(format!("{}", series.missing_years().len())),
        Cell::new("years"),
    ]);
    if let (Some(first), Some(last)) = (series.records.first(), series.records.last()) {
        table.add_row(vec![
            Cell::new(format!("Wild Catch ({})", first.year)),
            Cell::new(format!("{:.2}", first.wild_catch / data.unit_scale)),
            Cell::new(unit),
        ]);
        table.add_row(vec![
            Cell::new(format!("Wild Catch ({})", last.year)),
            Cell::new(format!("{:.2}", last.wild_catch / data.unit_scale)),
            Cell::new(unit),
        ]);
    }
    if let Some((year, peak)) = series.peak_wild_catch() {
        table.add_row(vec![
            Cell::new(format!("Peak Wild Catch ({year})")),
            Cell::new(format!("{:.2}", peak / data.unit_scale)),
            Cell::new(unit),
        ]);
    }
    if let Some((year, share)) = series.latest_farmed_share() {
        table.add_row(vec![
            Cell::new(format!("Farmed Share ({year})")),
            Cell::new(format!("{:.1}%", share * 100.0)),
            Cell::new("of total"),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the dataset overview.
pub fn print_series_summary(series: &CatchSeries, data: &DataConfig) {
    print!("{}", format_series_summary(series, data));
}

/// Format the exponential-phase regression and the solver seeds it implies.
pub fn format_seed_table(seed: &SeedEstimate) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Solver Seeds".bold().green()));
    output.push_str(&format!(
        "{}\n",
        format!(
            "ln(catch) ~ t over offsets < {} ({} observations)",
            seed.exponential_years, seed.window
        )
        .dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Quantity", "Value"]);
    let fit = &seed.log_fit;
    let rows = [
        ("Slope", format!("{:.6}", fit.slope)),
        ("Intercept", format!("{:.6}", fit.intercept)),
        ("R²", format!("{:.4}", fit.r_squared)),
        ("Initial Level (P0)", format!("{:.4}", seed.initial_level)),
        ("Seed K", format!("{:.4}", seed.curve.capacity)),
        ("Seed A", format!("{:.4}", seed.curve.ratio)),
        ("Seed k", format!("{:.6}", seed.curve.rate)),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the seed table.
pub fn print_seed_table(seed: &SeedEstimate) {
    print!("{}", format_seed_table(seed));
}

/// Format the fitted coefficients with standard errors and t tests.
pub fn format_coefficient_table(fit: &LogisticFit) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Logistic Coefficients".bold().green()));
    output.push_str(&format!("{}\n", format!("{}", fit.curve).dimmed()));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    let mut table = new_table(vec![
        "Parameter",
        "Estimate",
        "Std. Error",
        "t value",
        "Pr(>|t|)",
        "",
    ]);

    for p in &fit.parameters {
        table.add_row(vec![
            Cell::new(format!("{} ({})", p.symbol, p.name)),
            Cell::new(format!("{:.6}", p.estimate)),
            Cell::new(format_optional(p.std_error, 6)),
            Cell::new(format_optional(p.t_value, 2)),
            Cell::new(format_p_value(p.p_value)),
            Cell::new(significance_code(p.p_value)),
        ]);
    }

    output.push_str(&format!("{table}\n"));
    output.push_str(&format!(
        "{}\n",
        "Signif. codes: 0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1".dimmed()
    ));
    output
}

/// Print the coefficient table.
pub fn print_coefficient_table(fit: &LogisticFit) {
    print!("{}", format_coefficient_table(fit));
}

/// Format goodness-of-fit and curve-shape statistics.
///
/// `first_year` converts the inflection offset to a calendar year.
pub fn format_fit_statistics(fit: &LogisticFit, first_year: Option<i32>) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Fit Statistics".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Statistic", "Value"]);
    let inflection = match (fit.inflection_time, first_year) {
        (Some(t), Some(year)) => {
            format!("t = {t:.1} ({})", year.saturating_add(t.round() as i32))
        }
        (Some(t), None) => format!("t = {t:.1}"),
        (None, _) => "none".to_string(),
    };
    let rows = [
        ("Observations", format!("{}", fit.n)),
        ("Degrees of Freedom", format!("{}", fit.degrees_of_freedom)),
        ("Iterations", format!("{}", fit.iterations)),
        ("Residual Sum of Squares", format!("{:.6}", fit.sse)),
        ("Residual Std. Error", format!("{:.6}", fit.residual_std_error)),
        ("R²", format!("{:.6}", fit.r_squared)),
        ("Inflection Point", inflection),
        ("Max Growth Rate", format!("{:.4} per year", fit.max_growth_rate)),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the fit statistics table.
pub fn print_fit_statistics(fit: &LogisticFit, first_year: Option<i32>) {
    print!("{}", format_fit_statistics(fit, first_year));
}

/// Format predicted against observed wild catch, including projection rows.
pub fn format_prediction_table(predictions: &[Prediction], unit_label: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Predictions".bold().green()));
    output.push_str(&format!("{}\n", format!("Values in {unit_label}").dimmed()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table(vec!["Year", "t", "Observed", "Predicted", "Residual"]);
    for p in predictions {
        table.add_row(vec![
            Cell::new(format!("{}", p.year)),
            Cell::new(format!("{:.0}", p.offset)),
            Cell::new(p.observed.map_or("-".to_string(), |v| format!("{v:.2}"))),
            Cell::new(format!("{:.2}", p.predicted)),
            Cell::new(p.residual.map_or("-".to_string(), |v| format!("{v:+.2}"))),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the prediction table.
pub fn print_prediction_table(predictions: &[Prediction], unit_label: &str) {
    print!("{}", format_prediction_table(predictions, unit_label));
}

/// Format the rows dropped or flagged while cleaning the input.
pub fn format_cleaning_report(report: &CleaningReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Data Cleaning".bold().green()));
    output.push_str(&format!(
        "{}\n",
        format!(
            "Rows read: {} | kept: {} | dropped: {}",
            report.rows_read,
            report.rows_kept,
            report.rows_dropped()
        )
        .dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    if report.issues.is_empty() {
        output.push_str("  No issues found.\n");
        return output;
    }

    let mut table = new_table(vec!["Line", "Field", "Issue"]);
    for issue in &report.issues {
        let line = if issue.line == 0 {
            "-".to_string()
        } else {
            issue.line.to_string()
        };
        table.add_row(vec![
            Cell::new(line),
            Cell::new(&issue.field),
            Cell::new(&issue.message),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the cleaning report.
pub fn print_cleaning_report(report: &CleaningReport) {
    print!("{}", format_cleaning_report(report));
}
