//! Config command handler

use crate::args::ConfigSubcommand;
use course_mean::config::Config;
use course_mean::info;
use std::io::{self, Write};

/// Dispatch config subcommands, exiting with status 1 on failure
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    let outcome = match subcommand {
        None => {
            show(config, None);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key }) => {
            show(config, key.as_deref());
            Ok(())
        }
        Some(ConfigSubcommand::Set { key, value }) => set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset(),
    };

    if let Err(e) = outcome {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Print one value, or the whole configuration
fn show(config: &Config, key: Option<&str>) {
    match key {
        Some(k) => match config.get(k) {
            Some(value) => println!("{value}"),
            None => eprintln!("Unknown config key: '{k}'"),
        },
        None => {
            println!("\n=== Configuration ===\n");
            print!("{config}");
        }
    }
}

fn set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value)?;
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))?;

    info!("Config key '{key}' set to '{value}'");
    println!("✓ Set {key} = {value}");
    Ok(())
}

fn unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults)?;
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))?;

    println!("✓ Reset {key} to default");
    Ok(())
}

fn reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();

    if response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}
