//! Live line-by-line input

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use settle_cli::{settings, OptionOverrides};
use settle_core::Notification;
use std::time::Instant;
use tokio::io::BufReader;

pub async fn run(initial: &str, overrides: &OptionOverrides) -> Result<()> {
    let (mut options, source) = settings::load_options(overrides.config.as_deref())?;
    overrides.apply(&mut options);

    if let Some(path) = &source {
        eprintln!("{} {}", "Config:".dimmed(), path.display().dimmed());
    }
    eprintln!(
        "{}",
        "Type a value per line. :enter, :blur, :set <value>, :quit. EOF tears down.".dimmed()
    );

    let start = Instant::now();
    let sink = move |notification: Notification| {
        let at_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        println!("{}", util::format_delivery(at_ms, notification.trigger, &notification.value));
    };

    let reader = BufReader::new(tokio::io::stdin());
    settle_cli::live::run(options, initial, reader, sink).await
}
