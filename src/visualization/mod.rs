mod charts;
mod tables;

pub use charts::{
    format_catch_chart, format_fit_chart, format_log_chart, print_catch_chart, print_fit_chart,
    print_log_chart,
};
pub use tables::{
    format_cleaning_report, print_cleaning_report,
    format_coefficient_table, print_coefficient_table,
    format_fit_statistics, print_fit_statistics,
    format_prediction_table, print_prediction_table,
    format_seed_table, print_seed_table,
    format_series_summary, print_series_summary,
};
