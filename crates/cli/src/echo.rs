use owo_colors::OwoColorize;
use sitesift_core::{OutcomeCounts, ResultTable};

use crate::VERSION;

/// Widest content preview shown per row.
const PREVIEW_WIDTH: usize = 72;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "sitesift".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Extract selected content from lists of web pages\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print outcome counts and total run time
pub fn print_summary(counts: &OutcomeCounts, elapsed: std::time::Duration) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Extraction Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Extracted:".dimmed(), counts.text.to_string().bright_green());
    eprintln!("  {} {}", "Not found:".dimmed(), counts.not_found.to_string().bright_yellow());
    eprintln!("  {} {}", "Errors:".dimmed(), counts.error.to_string().bright_red());
    eprintln!("  {} {:.2}s\n", "Elapsed:".dimmed(), elapsed.as_secs_f64());
}

/// Print the first `limit` rows with their content cut to one line
pub fn print_preview(table: &ResultTable, limit: usize) {
    for row in table.iter().take(limit) {
        let cell = truncate(&row.outcome.to_string(), PREVIEW_WIDTH);
        let cell = if row.outcome.is_error() { cell.red().to_string() } else { cell };
        eprintln!("  {} {}", row.url.bright_white(), cell.dimmed());
    }

    if table.len() > limit {
        eprintln!("  {}", format!("… {} more rows", table.len() - limit).dimmed());
    }
}

/// Collapse a cell to a single line of at most `width` characters
pub fn truncate(text: &str, width: usize) -> String {
    let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= width {
        line
    } else {
        let cut: String = line.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
