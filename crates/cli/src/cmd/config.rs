//! Configuration inspection commands

use anyhow::Result;
use owo_colors::OwoColorize;
use settle_cli::{settings, OptionOverrides};

/// Show the effective options after config file and overrides
pub fn run_show(overrides: &OptionOverrides) -> Result<()> {
    let (mut options, source) = settings::load_options(overrides.config.as_deref())?;
    overrides.apply(&mut options);

    match &source {
        Some(path) => println!("{}: {}\n", "Source".dimmed(), path.display().dimmed()),
        None => println!("{}\n", "Source: built-in defaults".dimmed()),
    }

    print!("{}", options.to_toml_string()?);

    let mode = options.notifier_config().mode();
    println!("\n{} {:?}", "Mode:".bold(), mode);

    Ok(())
}

/// Show example configuration
pub fn run_example() -> Result<()> {
    print!("{}", settings::example_config());
    Ok(())
}

/// Show where config files are looked up
pub fn run_path() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let local = cwd.join(settings::LOCAL_CONFIG_FILE);

    print_candidate(&local.display().to_string(), local.is_file());
    match settings::user_config_path() {
        Some(path) => print_candidate(&path.display().to_string(), path.is_file()),
        None => println!("{}", "No user config directory on this platform".yellow()),
    }

    Ok(())
}

fn print_candidate(path: &str, exists: bool) {
    if exists {
        println!("{} {}", "✓".green(), path);
    } else {
        println!("{} {}", "-".dimmed(), path.dimmed());
    }
}
