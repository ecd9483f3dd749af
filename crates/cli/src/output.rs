//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;
use streamlyne_engine::LayerStatus;

/// Output format selected with `--format`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON document on stdout
    Json,
}

impl OutputFormat {
    /// Whether JSON output was requested
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Print any serializable value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Plain-text summary of a layer's status
pub fn describe_status(status: &LayerStatus) -> String {
    match status {
        LayerStatus::Hidden => "hidden".to_string(),
        LayerStatus::Loading => "loading".to_string(),
        LayerStatus::Ready { features } => format_count(*features, "feature", "features"),
        LayerStatus::Errored { message } => format!("error: {message}"),
    }
}

/// Layer status colored for the terminal
pub fn colored_status(status: &LayerStatus) -> String {
    let text = describe_status(status);
    match status {
        LayerStatus::Hidden => text.dimmed().to_string(),
        LayerStatus::Loading => text.yellow().to_string(),
        LayerStatus::Ready { .. } => text.green().to_string(),
        LayerStatus::Errored { .. } => text.red().to_string(),
    }
}

/// Format a distance in kilometers to six significant figures
pub fn format_distance_km(km: f64) -> String {
    const SIGNIFICANT: i32 = 6;

    if km == 0.0 || !km.is_finite() {
        return format!("{km:.5}");
    }
    let magnitude = km.abs().log10().floor() as i32;
    let decimals = (SIGNIFICANT - 1 - magnitude).max(0) as usize;
    format!("{km:.decimals$}")
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_six_significant_figures() {
        assert_eq!(format_distance_km(1.234_567_89), "1.23457");
        assert_eq!(format_distance_km(50.0), "50.0000");
        assert_eq!(format_distance_km(1234.5678), "1234.57");
        assert_eq!(format_distance_km(0.012_345_678), "0.0123457");
        assert_eq!(format_distance_km(123_456_789.0), "123456789");
    }

    #[test]
    fn test_zero_distance() {
        assert_eq!(format_distance_km(0.0), "0.00000");
    }

    #[test]
    fn test_describe_status() {
        assert_eq!(describe_status(&LayerStatus::Hidden), "hidden");
        assert_eq!(describe_status(&LayerStatus::Ready { features: 1 }), "1 feature");
        assert_eq!(describe_status(&LayerStatus::Ready { features: 0 }), "0 features");
        assert_eq!(
            describe_status(&LayerStatus::Errored { message: "bad json".to_string() }),
            "error: bad json"
        );
    }

    #[test]
    fn test_colored_status_keeps_text() {
        let status = LayerStatus::Ready { features: 3 };
        assert!(colored_status(&status).contains("3 features"));
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "review", "reviews"), "1 review");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(5, "review", "reviews"), "5 reviews");
    }

    #[test]
    fn test_output_format_parses() {
        assert_eq!(OutputFormat::from_str("json", true), Ok(OutputFormat::Json));
        assert!(OutputFormat::default() == OutputFormat::Text);
        assert!(OutputFormat::Json.is_json());
    }
}
