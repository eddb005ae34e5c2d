//! Shared output formatting for CLI commands

use owo_colors::OwoColorize;
use settle_core::Trigger;

/// Format milliseconds for display ("950ms", "1.25s")
pub fn format_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}

/// Short label for a notification trigger
pub fn trigger_label(trigger: Trigger) -> &'static str {
    match trigger {
        Trigger::Edit => "edit",
        Trigger::Deadline => "deadline",
        Trigger::Enter => "enter",
        Trigger::Blur => "blur",
        Trigger::Teardown => "teardown",
    }
}

/// Quote a value so empty and whitespace values stay visible
pub fn quote(value: &str) -> String {
    format!("{:?}", value)
}

/// One delivered notification as a line of output
pub fn format_delivery(at_ms: u64, trigger: Trigger, value: &str) -> String {
    format!(
        "{:>8}  {:<8}  {}",
        format_ms(at_ms).dimmed().to_string(),
        trigger_label(trigger).cyan().to_string(),
        quote(value)
    )
}
