use std::path::PathBuf;

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use stilus::SelectionStyle;
use thiserror::Error;

pub mod theme;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    pub theme: theme::Theme,
    pub placeholders: Placeholders,
    /// Preselected quiz style in the menu
    pub default_style: Option<SelectionStyle>,
    /// Default location of the written quiz record
    pub output_path: Option<PathBuf>,
}

/// Prompt text shown while substitute text is being entered
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Placeholders {
    pub underline: String,
    pub square: String,
}

impl Placeholders {
    pub fn for_style(&self, style: SelectionStyle) -> &str {
        match style {
            SelectionStyle::Underline => &self.underline,
            SelectionStyle::Square => &self.square,
        }
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            underline: "Enter the altered text".to_string(),
            square: "Enter the contrasting text".to_string(),
        }
    }
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),
}

#[derive(Debug, Default)]
pub struct Config {
    pub settings: Settings,
}

impl Config {
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Grab default configuration
        let mut settings = Figment::from(Serialized::defaults(Settings::default()));

        // Check for toml file location
        let config_dir = override_path
            .or_else(|| {
                ProjectDirs::from("com", "Passmark", "Passmark")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let mut settings_toml = config_dir.clone();
        settings_toml.push("settings.toml");

        if settings_toml.exists() {
            settings = settings.merge(Toml::file(settings_toml));
        }

        let settings: Settings = settings.extract().map_err(Box::new)?;

        Ok(Self { settings })
    }
}
