//! Config command - View and validate configuration
//!
//! Provides subcommands:
//! - `drivemirror config show` - Display the effective configuration
//! - `drivemirror config validate` - Check the configuration file for errors
//! - `drivemirror config path` - Print where the configuration is read from

use anyhow::{Context, Result};
use clap::Subcommand;
use drivemirror_core::config::Config;
use tracing::info;

use super::{load_config, GlobalArgs};
use crate::output::{get_formatter, plural};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(globals),
            ConfigCommand::Validate => self.execute_validate(globals),
            ConfigCommand::Path => self.execute_path(globals),
        }
    }

    fn execute_show(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let config = load_config(&globals.config_path)?;

        if globals.format.is_json() {
            let json = serde_json::to_value(&config).context("Failed to encode configuration")?;
            formatter.print_json(&json);
        } else {
            let yaml = serde_yaml::to_string(&config).context("Failed to encode configuration")?;
            formatter.info(&format!("# {}", globals.config_path.display()));
            for line in yaml.lines() {
                formatter.info(line);
            }
        }
        Ok(())
    }

    fn execute_validate(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let config_path = &globals.config_path;

        if !config_path.exists() {
            if globals.format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": ["Configuration file not found. Using defaults."],
                }));
            } else {
                formatter.info(&format!(
                    "Configuration file not found at {}",
                    config_path.display()
                ));
                formatter.info("Using default configuration.");
            }
            return Ok(());
        }

        let config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                if globals.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [format!("Failed to parse configuration: {e:#}")],
                    }));
                } else {
                    formatter.error(&format!("Failed to parse configuration: {e:#}"));
                    formatter.info(&format!("File: {}", config_path.display()));
                }
                anyhow::bail!("Invalid configuration");
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");
        let errors = config.validate();

        if globals.format.is_json() {
            let error_strings: Vec<String> = errors.iter().map(ToString::to_string).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!("Configuration has {}:", plural(errors.len(), "error")));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if !errors.is_empty() {
            anyhow::bail!("Invalid configuration");
        }
        Ok(())
    }

    fn execute_path(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let path = globals.config_path.display().to_string();
        if globals.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "config_path": path,
                "exists": globals.config_path.exists(),
            }));
        } else {
            println!("{path}");
        }
        Ok(())
    }
}
