use clap::{Args, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use super::{print_json, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# fitquest configuration

# Path to SQLite database (default: platform data dir, e.g. ~/.local/share/fitquest/fitquest.db)
# database_path: fitquest.db

# Whose logs to read and write
user_id: local

# Generative-AI service for food photos and briefings
ai:
  # api_key: your-key-here
  model: gemini-1.5-flash
  timeout_secs: 30
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => print_json(config)?,
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);
                init_config(&config_path)
            }
        }
    }
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        ),
    }
    println!();

    println!("database_path: {}", config.database_path.value.display());
    println!("  source: {}", config.database_path.source);
    println!();

    println!("user_id: {}", config.user_id.value);
    println!("  source: {}", config.user_id.source);
    println!();

    println!("ai.base_url: {}", config.ai.base_url);
    println!("ai.model: {}", config.ai.model);
    println!("ai.timeout_secs: {}", config.ai.timeout_secs);
    println!(
        "ai.api_key: {}",
        if config.ai.is_configured() {
            "(set)"
        } else {
            "(not set)"
        }
    );
}

fn init_config(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if config_path.exists() {
        println!("Config file already exists: {}", config_path.display());
        println!("Use 'fitquest config show' to view current configuration.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created config file: {}", config_path.display());
    println!("\nEdit this file to customize your settings.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, DEFAULT_USER_ID};
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.yaml");

        init_config(&config_path).unwrap();
        assert!(config_path.exists());

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.user_id.value, DEFAULT_USER_ID);
        assert_eq!(config.user_id.source, ConfigSource::File);
        assert!(!config.ai.is_configured());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "user_id: ari\n").unwrap();

        init_config(&config_path).unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "user_id: ari\n");
    }
}
