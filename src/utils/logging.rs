// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored console helpers

use crate::models::TriageLevel;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    colored::control::set_override(colored_output);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Badge-style rendering of a triage level, padded for table alignment.
pub fn format_level(level: TriageLevel) -> String {
    let label = format!("{:<6}", level.as_str());
    match level {
        TriageLevel::Urgent => label.red().bold().to_string(),
        TriageLevel::High => label.truecolor(249, 115, 22).bold().to_string(),
        TriageLevel::Medium => label.yellow().to_string(),
        TriageLevel::Low => label.green().to_string(),
    }
}
