//! Terminal presentation helpers: currency/percent formatting, table
//! defaults, section rules, and the text sparkline / bar rendering used
//! for value history and allocations.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::api::ApiError;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Table with the house defaults applied
pub fn table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Section header with a rule underneath
pub fn section(title: &str) {
    println!("\n{}", title.bright_yellow());
    println!("{}", "─".repeat(60).bright_black());
}

/// Inline error panel for one failed section. Other sections keep
/// rendering; one broken analytic never blanks the page.
pub fn error_panel(title: &str, err: &ApiError) {
    println!("\n{}", title.bright_yellow());
    println!("{}", "─".repeat(60).bright_black());
    println!("{} {}", "✗".bright_red(), err.to_string().bright_red());
}

/// Informational banner for a successful response that carries no usable
/// data (e.g. not enough history). Distinct from a hard failure.
pub fn info_banner(message: &str) {
    println!("{} {}", "ℹ".bright_blue(), message.bright_black());
}

pub fn fmt_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

/// Signed currency, colored by sign
pub fn fmt_signed_currency(value: f64) -> String {
    if value >= 0.0 {
        format!("+${:.2}", value).bright_green().to_string()
    } else {
        format!("-${:.2}", value.abs()).bright_red().to_string()
    }
}

pub fn fmt_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn fmt_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value).bright_green().to_string()
    } else {
        format!("{:.2}%", value).bright_red().to_string()
    }
}

pub fn fmt_opt_percent(value: Option<f64>) -> String {
    value.map(fmt_percent).unwrap_or_else(|| "—".to_string())
}

/// Render a series as a fixed-width block sparkline. Values are bucketed
/// into the target width by averaging, then scaled to the eight block
/// glyphs. A flat series renders mid-height rather than dividing by zero.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let buckets = bucket_means(values, width.min(values.len()));
    let min = buckets.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    buckets
        .iter()
        .map(|v| {
            let level = if range == 0.0 {
                SPARK_LEVELS.len() / 2
            } else {
                (((v - min) / range) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Horizontal allocation bar, `percent` out of 100
pub fn hbar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let mut bar = "█".repeat(filled.min(width));
    bar.push_str(&"░".repeat(width - filled.min(width)));
    bar
}

fn bucket_means(values: &[f64], buckets: usize) -> Vec<f64> {
    let chunk = (values.len() as f64 / buckets as f64).ceil() as usize;
    values
        .chunks(chunk.max(1))
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect()
}

/// Shorten an identifier for table display
pub fn truncate(text: &str, max: usize) -> String {
    if text.len() > max {
        format!("{}...", &text[..max.saturating_sub(3)])
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_formatting() {
        assert_eq!(fmt_currency(1234.5), "$1234.50");
        assert_eq!(fmt_currency(-12.345), "-$12.35");
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(fmt_percent(12.345), "12.35%");
        assert_eq!(fmt_opt_percent(None), "—");
    }

    #[test]
    fn test_sparkline_shape() {
        let spark = sparkline(&[1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(spark.chars().count(), 4);
        assert_eq!(spark.chars().next(), Some('▁'));
        assert_eq!(spark.chars().last(), Some('█'));
    }

    #[test]
    fn test_sparkline_flat_series_does_not_divide_by_zero() {
        let spark = sparkline(&[5.0, 5.0, 5.0], 3);
        assert_eq!(spark.chars().count(), 3);
    }

    #[test]
    fn test_sparkline_empty_series() {
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn test_hbar_is_clamped() {
        assert_eq!(hbar(50.0, 10), "█████░░░░░");
        assert_eq!(hbar(150.0, 4), "████");
        assert_eq!(hbar(-5.0, 4), "░░░░");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-much-longer-identifier", 10), "a-much-...");
    }
}
