//! Fixed-grid terminal charts.
//!
//! Glyphs: wild catch / observations `o`, farmed fish `+`, total
//! production `*`, fitted or regression lines `-`. Lines are drawn first and
//! only fill blank cells; points overwrite whatever is beneath them.

use colored::Colorize;

use crate::analysis::SeedEstimate;
use crate::config::{ChartConfig, DataConfig};
use crate::models::{CatchSeries, LogisticCurve, Observation};

/// Character grid with data-space ranges on both axes.
struct Canvas {
    grid: Vec<Vec<char>>,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Canvas {
    fn new(width: usize, height: usize, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let width = width.max(10);
        let height = height.max(5);
        Self {
            grid: vec![vec![' '; width]; height],
            x_range,
            y_range,
        }
    }

    fn width(&self) -> usize {
        self.grid[0].len()
    }

    fn height(&self) -> usize {
        self.grid.len()
    }

    fn cell(&self, x: f64, y: f64) -> (usize, usize) {
        (
            map_x(x, self.x_range.0, self.x_range.1, self.width()),
            map_y(y, self.y_range.0, self.y_range.1, self.height()),
        )
    }

    fn point(&mut self, x: f64, y: f64, ch: char) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let (col, row) = self.cell(x, y);
        self.grid[row][col] = ch;
    }

    fn polyline(&mut self, points: &[(f64, f64)], ch: char) {
        let mut prev = None;
        for &(x, y) in points.iter().filter(|(x, y)| x.is_finite() && y.is_finite()) {
            let (col, row) = self.cell(x, y);
            match prev {
                Some((c0, r0)) => draw_line(&mut self.grid, c0, r0, col, row, ch),
                None => {
                    if self.grid[row][col] == ' ' {
                        self.grid[row][col] = ch;
                    }
                }
            }
            prev = Some((col, row));
        }
    }

    /// Grid with y labels on the top, middle and bottom rows and the
    /// x-axis end labels underneath.
    fn render(&self, x_labels: (&str, &str), precision: usize) -> String {
        let height = self.height();
        let width = self.width();
        let (y_min, y_max) = self.y_range;
        let label_rows = [0, height / 2, height - 1];

        let label_at = |row: usize| {
            let u = row as f64 / (height as f64 - 1.0);
            format!("{:.*}", precision, y_max - u * (y_max - y_min))
        };
        let label_width = label_rows
            .iter()
            .map(|&r| label_at(r).len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (r, row) in self.grid.iter().enumerate() {
            let label = if label_rows.contains(&r) {
                label_at(r)
            } else {
                String::new()
            };
            out.push_str(&format!(
                "{label:>label_width$} │{}\n",
                row.iter().collect::<String>()
            ));
        }

        out.push_str(&format!(
            "{} └{}\n",
            " ".repeat(label_width),
            "─".repeat(width)
        ));

        let (left, right) = x_labels;
        let gap = width.saturating_sub(left.len() + right.len()).max(1);
        out.push_str(&format!(
            "{}{left}{}{right}\n",
            " ".repeat(label_width + 2),
            " ".repeat(gap)
        ));
        out
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // row 0 holds y_max
    (height as f64 - 1.0 - u * (height as f64 - 1.0)).round() as usize
}

/// Integer line drawing (Bresenham) into blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(y0 as usize)
            .and_then(|row| row.get_mut(x0 as usize))
        {
            if *cell == ' ' {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Min and max of the finite values, widened when they coincide.
fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        let half = (min.abs() * 0.05).max(0.5);
        Some((min - half, max + half))
    }
}

fn pad_range((min, max): (f64, f64), frac: f64) -> (f64, f64) {
    let pad = ((max - min) * frac).max(1e-12);
    (min - pad, max + pad)
}

fn chart_header(title: &str, subtitle: Option<String>) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", title.bold().green()));
    if let Some(sub) = subtitle {
        output.push_str(&format!("{}\n", sub.dimmed()));
    }
    output.push_str(&format!("{}\n", "=".repeat(60)));
    output
}

fn year_labels(base_year: i32, x_range: (f64, f64)) -> (String, String) {
    (
        base_year.saturating_add(x_range.0.round() as i32).to_string(),
        base_year.saturating_add(x_range.1.round() as i32).to_string(),
    )
}

/// Calendar year of offset 0.
fn base_year(observations: &[Observation]) -> i32 {
    observations
        .first()
        .map(|o| o.year.saturating_sub(o.offset.round() as i32))
        .unwrap_or(0)
}

/// Evenly spaced samples of `curve` over `[t_min, t_max]`.
fn sample_curve(curve: &LogisticCurve, t_min: f64, t_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let t = t_min + (t_max - t_min) * i as f64 / (n as f64 - 1.0);
            (t, curve.evaluate(t))
        })
        .collect()
}

/// Format the raw series chart: wild catch, farmed fish and total production.
pub fn format_catch_chart(series: &CatchSeries, data: &DataConfig, size: ChartConfig) -> String {
    let mut output = chart_header(
        "Wild Catch, Farmed Fish and Total Production",
        Some(format!("Values in {}", data.unit_label)),
    );

    let (Some(first), Some(last)) = (series.first_year(), series.last_year()) else {
        output.push_str("  No data available.\n");
        return output;
    };

    let scaled: Vec<(f64, f64, f64, f64)> = series
        .records
        .iter()
        .map(|r| {
            (
                (r.year - first) as f64,
                r.wild_catch / data.unit_scale,
                r.farmed_fish / data.unit_scale,
                r.total_production / data.unit_scale,
            )
        })
        .collect();

    let x_range = value_range([0.0, (last - first) as f64]).unwrap_or((0.0, 1.0));
    let y_range = value_range(scaled.iter().flat_map(|&(_, w, f, t)| [w, f, t]))
        .map(|r| pad_range(r, 0.05))
        .unwrap_or((0.0, 1.0));

    let mut canvas = Canvas::new(size.width, size.height, x_range, y_range);
    for &(t, _, _, total) in &scaled {
        canvas.point(t, total, '*');
    }
    for &(t, _, farmed, _) in &scaled {
        canvas.point(t, farmed, '+');
    }
    for &(t, wild, _, _) in &scaled {
        canvas.point(t, wild, 'o');
    }

    let (left, right) = year_labels(first, x_range);
    output.push_str(&canvas.render((&left, &right), 1));
    output.push_str("  o wild catch   + farmed fish   * total production\n");
    output
}

/// Print the raw series chart.
pub fn print_catch_chart(series: &CatchSeries, data: &DataConfig, size: ChartConfig) {
    print!("{}", format_catch_chart(series, data, size));
}

/// Format ln(wild catch) against time with the exponential-phase regression
/// line drawn over its window.
pub fn format_log_chart(
    observations: &[Observation],
    seed: &SeedEstimate,
    size: ChartConfig,
) -> String {
    let fit = &seed.log_fit;
    let mut output = chart_header(
        "Log Wild Catch",
        Some(format!(
            "ln(catch) = {:.4} + {:.5} t over the first {} years (R² {:.4})",
            fit.intercept, fit.slope, seed.exponential_years, fit.r_squared
        )),
    );

    if observations.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let window_end = observations
        .iter()
        .map(|o| o.offset)
        .filter(|&t| t < seed.exponential_years as f64)
        .fold(0.0, f64::max);
    let line = [(0.0, fit.predict(0.0)), (window_end, fit.predict(window_end))];

    let x_range = value_range(observations.iter().map(|o| o.offset)).unwrap_or((0.0, 1.0));
    let y_range = value_range(
        observations
            .iter()
            .map(|o| o.log_wild_catch)
            .chain(line.iter().map(|&(_, y)| y)),
    )
    .map(|r| pad_range(r, 0.05))
    .unwrap_or((0.0, 1.0));

    let mut canvas = Canvas::new(size.width, size.height, x_range, y_range);
    canvas.polyline(&line, '-');
    for o in observations {
        canvas.point(o.offset, o.log_wild_catch, 'o');
    }

    let (left, right) = year_labels(base_year(observations), x_range);
    output.push_str(&canvas.render((&left, &right), 2));
    output.push_str("  o ln(wild catch)   - exponential-phase regression\n");
    output
}

/// Print the log chart.
pub fn print_log_chart(observations: &[Observation], seed: &SeedEstimate, size: ChartConfig) {
    print!("{}", format_log_chart(observations, seed, size));
}

/// Format the observations with the fitted curve, extended `horizon_years`
/// past the last observation.
pub fn format_fit_chart(
    observations: &[Observation],
    curve: &LogisticCurve,
    horizon_years: u32,
    unit_label: &str,
    size: ChartConfig,
) -> String {
    let mut output = chart_header("Logistic Fit", Some(format!("{curve} [{unit_label}]")));

    let Some(last) = observations.last() else {
        output.push_str("  No data available.\n");
        return output;
    };

    let t_end = last.offset + horizon_years as f64;
    let x_range = value_range(
        observations
            .iter()
            .map(|o| o.offset)
            .chain(std::iter::once(t_end)),
    )
    .unwrap_or((0.0, 1.0));
    let fitted = sample_curve(curve, x_range.0, x_range.1, size.width);
    let y_range = value_range(
        observations
            .iter()
            .map(|o| o.wild_catch)
            .chain(fitted.iter().map(|&(_, y)| y)),
    )
    .map(|r| pad_range(r, 0.05))
    .unwrap_or((0.0, 1.0));

    let mut canvas = Canvas::new(size.width, size.height, x_range, y_range);
    canvas.polyline(&fitted, '-');
    for o in observations {
        canvas.point(o.offset, o.wild_catch, 'o');
    }

    let (left, right) = year_labels(base_year(observations), x_range);
    output.push_str(&canvas.render((&left, &right), 1));
    output.push_str("  o observed   - fitted\n");
    output
}

/// Print the fit chart.
pub fn print_fit_chart(
    observations: &[Observation],
    curve: &LogisticCurve,
    horizon_years: u32,
    unit_label: &str,
    size: ChartConfig,
) {
    print!(
        "{}",
        format_fit_chart(observations, curve, horizon_years, unit_label, size)
    );
}
