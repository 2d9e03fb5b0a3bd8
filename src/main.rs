use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use catch_growth_analyzer::{
    analysis::{predict_series, Analyzer, MAX_HORIZON_YEARS},
    config::AppConfig,
    io, logging,
    visualization::{
        print_catch_chart, print_cleaning_report, print_coefficient_table, print_fit_chart,
        print_fit_statistics, print_log_chart, print_prediction_table, print_seed_table,
        print_series_summary,
    },
};

#[derive(Parser)]
#[command(
    name = "catch-analyzer",
    about = "Wild Catch Analyzer - logistic growth fit of historical fish catch",
    version,
    author
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a summary of the cleaned series and any data issues
    Summary {
        /// Path to input file (CSV, JSON, or Excel)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Chart the raw series
    Plot {
        /// Path to input file (CSV, JSON, or Excel)
        #[arg(short, long)]
        input: PathBuf,

        /// Also chart ln(wild catch) with the exponential-phase regression
        #[arg(long)]
        log: bool,
    },

    /// Fit the logistic growth curve to wild catch
    Fit {
        /// Path to input file (CSV, JSON, or Excel)
        #[arg(short, long)]
        input: PathBuf,

        /// Years treated as the exponential phase when seeding
        #[arg(short, long)]
        exponential_years: Option<u32>,

        /// Carrying capacity seed, in scaled units (default: largest observation)
        #[arg(short, long)]
        capacity: Option<f64>,

        /// Solver iteration budget
        #[arg(short, long)]
        max_iterations: Option<usize>,

        /// Years to extend the fitted curve past the data on the chart
        #[arg(
            long,
            default_value = "0",
            value_parser = clap::value_parser!(u32).range(..=MAX_HORIZON_YEARS as i64)
        )]
        horizon: u32,

        /// Skip the fit chart
        #[arg(long)]
        no_chart: bool,

        /// Write the full fit report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tabulate fitted values and project beyond the data
    Predict {
        /// Path to input file (CSV, JSON, or Excel)
        #[arg(short, long)]
        input: PathBuf,

        /// Years to project past the last observation
        #[arg(
            long,
            default_value = "10",
            value_parser = clap::value_parser!(u32).range(..=MAX_HORIZON_YEARS as i64)
        )]
        horizon: u32,

        /// Write predictions to CSV, Excel, or JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert catch data between formats
    Convert {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn print_loaded(series: &catch_growth_analyzer::CatchSeries) {
    println!(
        "{} {} ({} years, {}-{})",
        "Loaded".bold(),
        series.name,
        series.len(),
        series.first_year().unwrap_or_default(),
        series.last_year().unwrap_or_default()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary { input } => {
            let (series, report) = io::load_series_with_report(&input)?;
            print_series_summary(&series, &config.data);
            print_cleaning_report(&report);
        }

        Commands::Plot { input, log } => {
            let series = io::load_series(&input)?;
            print_loaded(&series);
            print_catch_chart(&series, &config.data, config.chart);

            if log {
                let analyzer = Analyzer::new(&series, config.analysis_options());
                let observations = analyzer.observations()?;
                let seed = analyzer.seeds()?;
                print_log_chart(&observations, &seed, config.chart);
            }
        }

        Commands::Fit {
            input,
            exponential_years,
            capacity,
            max_iterations,
            horizon,
            no_chart,
            output,
        } => {
            if let Some(years) = exponential_years {
                config.seed.exponential_years = years;
            }
            if capacity.is_some() {
                config.seed.capacity = capacity;
            }
            if let Some(n) = max_iterations {
                config.solver.max_iterations = n;
            }
            config.validate()?;

            let series = io::load_series(&input)?;
            print_loaded(&series);

            let analyzer = Analyzer::new(&series, config.analysis_options());
            let report = analyzer.report(horizon)?;

            print_seed_table(&report.seed);
            print_coefficient_table(&report.fit);
            print_fit_statistics(&report.fit, report.first_year);

            if !no_chart {
                let observations = analyzer.observations()?;
                print_fit_chart(
                    &observations,
                    &report.fit.curve,
                    horizon,
                    &report.unit_label,
                    config.chart,
                );
            }

            if let Some(path) = output {
                io::write_fit_report_json(&report, &path)?;
                println!(
                    "{} Fit report written to {}",
                    "Success:".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Predict {
            input,
            horizon,
            output,
        } => {
            let series = io::load_series(&input)?;
            let analyzer = Analyzer::new(&series, config.analysis_options());
            let observations = analyzer.observations()?;
            let fit = analyzer.fit()?;
            let predictions = predict_series(&observations, &fit.curve, horizon)?;

            println!(
                "\n{}",
                format!("Logistic Projection: {horizon} years").bold().cyan()
            );
            print_prediction_table(&predictions, &config.data.unit_label);

            if let Some(path) = output {
                match extension(&path).as_str() {
                    "csv" => io::write_predictions_csv(&predictions, &path)?,
                    "xlsx" => io::write_predictions_excel(&predictions, &path)?,
                    "json" => io::write_fit_report_json(&predictions, &path)?,
                    ext => anyhow::bail!("Unsupported output format: .{ext}"),
                }
                println!(
                    "\n{} Predictions written to {}",
                    "Success:".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Convert {
            input,
            output,
            pretty,
        } => {
            let series = io::load_series(&input)?;
            io::writer_for(&output, pretty)?.write(&series, &output)?;

            println!(
                "{} Converted {} -> {}",
                "Success:".green().bold(),
                input.display(),
                output.display()
            );
        }
    }

    Ok(())
}
