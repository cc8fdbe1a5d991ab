//! Line-oriented output. Message data and command results go to stdout;
//! status chrome goes to stderr so piped output stays clean.

use colored::{ColoredString, Colorize};
use serde::Serialize;

/// Selected by the global --json flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(data: &T) {
    if let Ok(json) = serde_json::to_string_pretty(data) {
        println!("{json}");
    }
}

fn status(prefix: ColoredString, message: &str) {
    eprintln!("{prefix} {message}");
}

pub fn print_error(message: &str) {
    status("Error:".red().bold(), message);
}

pub fn print_success(message: &str) {
    status("✓".green().bold(), message);
}

pub fn print_warning(message: &str) {
    status("⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    status("ℹ".blue().bold(), message);
}
