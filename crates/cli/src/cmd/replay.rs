//! Replay a scripted timeline

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use settle_cli::{settings, OptionOverrides, Script};
use std::path::Path;

pub fn run(script_path: &Path, json: bool, overrides: &OptionOverrides) -> Result<()> {
    let script = Script::load(script_path)
        .with_context(|| format!("Failed to load script {}", script_path.display()))?;

    let (mut options, _) = settings::load_options(overrides.config.as_deref())?;
    if let Some(script_options) = &script.options {
        script_options.apply(&mut options);
    }
    overrides.apply(&mut options);

    let report = settle_cli::replay(options, &script);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.deliveries.is_empty() {
        println!("{}", "No notifications delivered".dimmed());
    }
    for delivery in &report.deliveries {
        println!("{}", util::format_delivery(delivery.at_ms, delivery.trigger, &delivery.value));
    }

    println!(
        "\n{} {} {}",
        "Final value:".bold(),
        util::quote(&report.final_value),
        format!("(torn down at {})", util::format_ms(report.teardown_at_ms)).dimmed()
    );
    if report.ignored_external > 0 {
        println!(
            "{}",
            format!(
                "{} external value(s) ignored while an edit was pending",
                report.ignored_external
            )
            .yellow()
        );
    }

    Ok(())
}
