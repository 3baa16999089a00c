//! Application settings
//!
//! Settings are layered from defaults, an optional settings file and
//! `PROPWIZARD_*` environment variables. Command-line flags are applied last
//! by the CLI layer.

use crate::error::{PropwizardError, Result};
use config::{Config as ConfigSource, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabled::Tabled;
use tracing::debug;

/// Prefix for environment variable overrides (`PROPWIZARD_FILE_STEM`, ...)
const ENV_PREFIX: &str = "PROPWIZARD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
#[serde(default)]
pub struct Settings {
    /// Directory the properties file is written to; the working directory when unset
    #[tabled(rename = "Output Directory", display_with = "display_optional_path")]
    pub output_dir: Option<PathBuf>,
    /// Base name of the properties file
    #[tabled(rename = "File Stem")]
    pub file_stem: String,
    /// Option name printed when telling the user how to activate a saved profile
    #[tabled(rename = "Profile Flag")]
    pub profile_flag: String,
    /// First comment line of every saved file
    #[tabled(skip)]
    pub header_comment: String,
    /// Optional TOML field registry layered over the builtin one
    #[tabled(rename = "Registry", display_with = "display_optional_path")]
    pub registry_path: Option<PathBuf>,
}

fn display_optional_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_stem: "application".to_string(),
            profile_flag: "spring.profiles.active".to_string(),
            header_comment: "Automatically generated during interactive mode.".to_string(),
            registry_path: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.file_stem.trim().is_empty() {
            return Err(PropwizardError::config("File stem cannot be empty"));
        }

        if self.file_stem.contains(['/', '\\']) {
            return Err(PropwizardError::config(
                "File stem cannot contain path separators",
            ));
        }

        if self.profile_flag.trim().is_empty() {
            return Err(PropwizardError::config("Profile flag cannot be empty"));
        }

        Ok(())
    }

    /// Name of the properties file for an optional profile
    pub fn file_name(&self, profile: Option<&str>) -> String {
        match profile {
            Some(profile) => format!("{}-{}.properties", self.file_stem, profile),
            None => format!("{}.properties", self.file_stem),
        }
    }

    /// Option that activates `profile` on a later run
    pub fn profile_activation(&self, profile: &str) -> String {
        format!("--{}={}", self.profile_flag, profile)
    }

    /// Directory to save into, falling back to the process working directory
    pub fn resolve_output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        // Use XDG Base Directory specification on Linux and macOS
        // On Windows, use the platform-appropriate config directory
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| PropwizardError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("propwizard").join("propwizard.toml"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| PropwizardError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("propwizard").join("propwizard.toml"))
        }
    }
}

/// Load settings with priority order:
/// 1. Environment variables
/// 2. Settings file
/// 3. Default values
pub fn load_settings() -> Result<Settings> {
    let path = Settings::get_config_path()?;
    load_settings_from(&path)
}

/// Load settings using `path` as the settings file, which may be absent
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let mut builder = ConfigSource::builder();

    if path.exists() {
        debug!("Loading settings from {}", path.display());
        builder = builder.add_source(File::from(path).format(FileFormat::Toml));
    }

    let settings: Settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(false))
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.file_stem, "application");
        assert_eq!(settings.profile_flag, "spring.profiles.active");
        assert!(settings.output_dir.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_name() {
        let settings = Settings::default();
        assert_eq!(settings.file_name(None), "application.properties");
        assert_eq!(settings.file_name(Some("ci")), "application-ci.properties");
    }

    #[test]
    fn test_profile_activation_echoes_profile() {
        let settings = Settings::default();
        assert_eq!(
            settings.profile_activation("Team QA"),
            "--spring.profiles.active=Team QA"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            file_stem: "nested/app".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            profile_flag: " ".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("propwizard.toml");
        std::fs::write(
            &path,
            "file_stem = \"detect\"\nprofile_flag = \"profile\"\noutput_dir = \"/tmp/out\"\n",
        )
        .unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.file_stem, "detect");
        assert_eq!(settings.profile_flag, "profile");
        assert_eq!(settings.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(
            settings.header_comment,
            Settings::default().header_comment
        );
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = load_settings_from(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(settings.file_stem, Settings::default().file_stem);
    }

    #[test]
    fn test_explicit_output_dir_wins() {
        let settings = Settings {
            output_dir: Some(PathBuf::from("/srv/config")),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve_output_dir().unwrap(),
            PathBuf::from("/srv/config")
        );
    }
}
