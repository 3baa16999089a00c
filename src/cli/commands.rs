//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap,
//! including all commands and their arguments.

use crate::config::{FieldRegistry, Settings};
use crate::error::{PropwizardError, Result};
use crate::session::options::display_value;
use crate::session::{ConsoleTerminal, DefaultInteractiveMode, InteractionSession, InteractiveMode};
use crate::utils::format::{OutputFormat, TableFormatter};
use crate::utils::properties::read_properties;
use clap::{CommandFactory, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "propwizard")]
#[command(about = "Collect configuration values interactively and save them as a properties file")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory the properties file is saved to (defaults to the working directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML field registry layered over the builtin fields
    #[arg(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Option name printed to activate a saved profile
    #[arg(long, global = true, value_name = "FLAG")]
    pub profile_flag: Option<String>,

    /// Disable colored table headers
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer the configuration questions and optionally save the answers
    Run {
        /// Pre-answer a field, skipping its question (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_val::<String, String>)]
        presets: Vec<(String, String)>,
    },
    /// List the fields that can be asked and their configuration keys
    Fields {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show a saved properties file with password values masked
    Show {
        /// Profile whose file to show
        #[arg(short, long)]
        profile: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show the effective settings
    Settings {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Print the settings file location
    SettingsPath,
    /// Generate a shell completion script
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Configuration Key")]
    key: String,
}

#[derive(Debug, Tabled, Serialize)]
struct PropertyRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.output_dir {
            settings.output_dir = Some(dir.clone());
        }
        if let Some(path) = &self.registry {
            settings.registry_path = Some(path.clone());
        }
        if let Some(flag) = &self.profile_flag {
            settings.profile_flag = flag.clone();
        }
    }

    pub fn execute(self, settings: Settings) -> Result<()> {
        let no_color = self.no_color;

        match self.command {
            Commands::Run { presets } => execute_run(presets, settings),
            Commands::Fields { format } => execute_fields(&settings, format, no_color),
            Commands::Show { profile, format } => {
                execute_show(profile.as_deref(), &settings, format, no_color)
            }
            Commands::Settings { format } => {
                let formatter = TableFormatter::new(format, no_color);
                println!("{}", formatter.format_table(&[settings])?);
                Ok(())
            }
            Commands::SettingsPath => {
                println!("{}", Settings::get_config_path()?.display());
                Ok(())
            }
            Commands::Completion { shell } => {
                clap_complete::generate(
                    shell,
                    &mut Cli::command(),
                    "propwizard",
                    &mut std::io::stdout(),
                );
                Ok(())
            }
        }
    }
}

/// Builtin registry, or the configured registry file layered over it
pub fn load_registry(settings: &Settings) -> Result<FieldRegistry> {
    match &settings.registry_path {
        Some(path) => FieldRegistry::load(path),
        None => Ok(FieldRegistry::builtin()),
    }
}

fn execute_run(presets: Vec<(String, String)>, settings: Settings) -> Result<()> {
    let registry = load_registry(&settings)?;
    let output_dir = settings.resolve_output_dir()?;
    info!("Starting interactive mode, saving to {}", output_dir.display());

    let mode = presets
        .into_iter()
        .fold(DefaultInteractiveMode::new(output_dir), |mode, (field, value)| {
            mode.with_preset(field, value)
        });

    let mut session = InteractionSession::with_settings(ConsoleTerminal::new(), registry, settings);
    mode.interact(&mut session)
}

fn execute_fields(settings: &Settings, format: OutputFormat, no_color: bool) -> Result<()> {
    let registry = load_registry(settings)?;
    let rows: Vec<FieldRow> = registry
        .iter()
        .map(|(field, key)| FieldRow {
            field: field.to_string(),
            key: key.to_string(),
        })
        .collect();

    let formatter = TableFormatter::new(format, no_color);
    println!("{}", formatter.format_table(&rows)?);
    Ok(())
}

fn execute_show(
    profile: Option<&str>,
    settings: &Settings,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    if profile.is_some_and(|p| p.is_empty()) {
        return Err(PropwizardError::invalid_argument("Profile name cannot be empty"));
    }

    let path = settings
        .resolve_output_dir()?
        .join(settings.file_name(profile));
    if !path.exists() {
        return Err(PropwizardError::config(format!(
            "No saved settings found at '{}'",
            path.display()
        )));
    }

    debug!("Reading saved settings from {}", path.display());
    let rows: Vec<PropertyRow> = read_properties(&path)?
        .into_iter()
        .map(|(key, value)| PropertyRow {
            value: display_value(&key, &value),
            key,
        })
        .collect();

    let formatter = TableFormatter::new(format, no_color);
    println!("{}", formatter.format_table(&rows)?);
    Ok(())
}

/// Parse a single key-value pair
fn parse_key_val<T, U>(
    s: &str,
) -> std::result::Result<(T, U), Box<dyn std::error::Error + Send + Sync + 'static>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    U: std::str::FromStr,
    U::Err: std::error::Error + Send + Sync + 'static,
{
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid FIELD=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].parse()?, s[pos + 1..].parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_val() {
        let (field, value): (String, String) = parse_key_val("hubUrl=https://a=b").unwrap();
        assert_eq!(field, "hubUrl");
        assert_eq!(value, "https://a=b");

        assert!(parse_key_val::<String, String>("no-separator").is_err());
    }

    #[test]
    fn test_run_presets_parse() {
        let cli = Cli::try_parse_from([
            "propwizard",
            "run",
            "--set",
            "hubUrl=https://hub",
            "--set",
            "projectName=demo",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { presets } => assert_eq!(
                presets,
                vec![
                    ("hubUrl".to_string(), "https://hub".to_string()),
                    ("projectName".to_string(), "demo".to_string()),
                ]
            ),
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_overrides_replace_settings() {
        let cli = Cli::try_parse_from([
            "propwizard",
            "--output-dir",
            "/srv/out",
            "--profile-flag",
            "profile",
            "fields",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.output_dir, Some(PathBuf::from("/srv/out")));
        assert_eq!(settings.profile_flag, "profile");
        assert!(settings.registry_path.is_none());
    }

    #[test]
    fn test_show_rejects_empty_profile() {
        let result = execute_show(Some(""), &Settings::default(), OutputFormat::Table, true);
        assert!(matches!(result, Err(PropwizardError::InvalidArgument(_))));
    }
}
