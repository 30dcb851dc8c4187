//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use recibo_core::ReciboConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "extraction.default_currency")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    // The global --config flag overrides the platform config dir.
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, &config_path),
        ConfigCommand::Get { key } => get_config(&config_path, &key),
        ConfigCommand::Set { key, value } => set_config(&config_path, &key, &value),
        ConfigCommand::Path => show_path(&config_path),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recibo")
        .join("config.json")
}

fn load_or_default(config_path: &Path) -> anyhow::Result<ReciboConfig> {
    if config_path.exists() {
        Ok(ReciboConfig::from_file(config_path)?)
    } else {
        Ok(ReciboConfig::default())
    }
}

/// Rejects values that would put the engine into a nonsensical state.
fn validate(config: &ReciboConfig) -> anyhow::Result<()> {
    let threshold = config.escalation.threshold;
    if !(0.0..=1.0).contains(&threshold) {
        anyhow::bail!(
            "escalation.threshold must be between 0.0 and 1.0, got {}",
            threshold
        );
    }

    let weights = config.escalation.weights;
    for (name, weight) in [
        ("amount", weights.amount),
        ("date", weights.date),
        ("provider", weights.provider),
        ("description", weights.description),
    ] {
        if weight < 0.0 {
            anyhow::bail!("escalation.weights.{} must not be negative, got {}", name, weight);
        }
    }

    if config.extraction.default_currency.trim().is_empty() {
        anyhow::bail!("extraction.default_currency must not be empty");
    }

    Ok(())
}

fn show_config(config_path: &Path) -> anyhow::Result<()> {
    if !config_path.exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(config_path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| config_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = ReciboConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;

    // Convert config to JSON for key lookup
    let json = serde_json::to_value(&config)?;

    let mut current = &json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }

    println!("{}", serde_json::to_string_pretty(current)?);

    Ok(())
}

fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;

    // Unquoted values are taken as strings
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    // Modify the JSON form, then parse it back so unknown keys and bad
    // types are rejected before anything touches the disk.
    let mut json = serde_json::to_value(&config)?;

    let parts: Vec<&str> = key.split('.').collect();
    let mut current = &mut json;

    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            let Some(obj) = current.as_object_mut() else {
                anyhow::bail!("Cannot set value at non-object path");
            };
            if !obj.contains_key(*part) {
                anyhow::bail!("Unknown configuration key: {}", key);
            }
            obj.insert((*part).to_string(), parsed_value.clone());
        } else {
            current = current
                .get_mut(*part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    let config: ReciboConfig = serde_json::from_value(json)?;
    validate(&config)?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(config_path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'recibo config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = ReciboConfig::default();
        config.escalation.threshold = 1.5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut config = ReciboConfig::default();
        config.escalation.weights.date = -0.1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate(&ReciboConfig::default()).is_ok());
    }
}
