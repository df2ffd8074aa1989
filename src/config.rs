use crate::log_debug;
use crate::log_warn;

use anyhow::{Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable that overrides the persisted API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "anc";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Preferred way of producing a commit message, as persisted in the config
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultMode {
    /// Ask every time
    #[default]
    Interactive,
    /// One message for the whole staged diff
    All,
    /// One line per staged file
    ByFile,
}

impl DefaultMode {
    pub const ALL: &'static [DefaultMode] =
        &[DefaultMode::Interactive, DefaultMode::All, DefaultMode::ByFile];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::All => "all",
            Self::ByFile => "by-file",
        }
    }
}

impl fmt::Display for DefaultMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DefaultMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|m| m.name() == normalized)
            .copied()
            .ok_or_else(|| anyhow!("invalid default mode: must be 'interactive', 'all', or 'by-file'"))
    }
}

/// Persisted settings for `anc`
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// API key for the completion service
    #[serde(default)]
    pub api_key: String,
    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Mode preselected in the mode list
    #[serde(default)]
    pub default_mode: DefaultMode,
    /// Preselect every changed file on the first listing
    #[serde(default)]
    pub auto_stage_all: bool,
    /// Sampling temperature, passed through as-is
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// System prompt for all-in-one and custom-prompt generation
    #[serde(default = "default_system_prompt_all")]
    pub system_prompt_all: String,
    /// System prompt for file-by-file generation
    #[serde(default = "default_system_prompt_file")]
    pub system_prompt_file: String,
}

fn default_model() -> String {
    "o4-mini".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_system_prompt_all() -> String {
    "You are a helpful AI that writes clear and concise Git commit messages based on diffs."
        .to_string()
}

fn default_system_prompt_file() -> String {
    "You are a helpful AI that writes concise Git commit messages per file.".to_string()
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// Only fails when the config directory itself cannot be determined;
    /// a missing or broken file falls back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Ok(Self::load_from(&config_path))
    }

    /// Load from an explicit path, defaulting on any read or parse problem,
    /// then apply the environment API key override.
    pub fn load_from(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(config) => config,
                Err(e) => {
                    log_warn!(
                        "Invalid configuration at {}: {}; using defaults",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                log_debug!("No configuration at {} ({}); using defaults", path.display(), e);
                Self::default()
            }
        };

        config.apply_env_override();
        log_debug!("Configuration loaded: {:?}", config);
        config
    }

    /// Environment API key wins over the persisted one
    pub fn apply_env_override(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            log_debug!("Using API key from {}", API_KEY_ENV);
            self.api_key = key;
        }
    }

    /// Save the full record to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the full record to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_content = toml::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        Ok(path)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            default_mode: DefaultMode::default(),
            auto_stage_all: false,
            temperature: default_temperature(),
            system_prompt_all: default_system_prompt_all(),
            system_prompt_file: default_system_prompt_file(),
        }
    }
}

// Keep the key out of debug logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &crate::ui::mask_api_key(&self.api_key))
            .field("model", &self.model)
            .field("default_mode", &self.default_mode)
            .field("auto_stage_all", &self.auto_stage_all)
            .field("temperature", &self.temperature)
            .field("system_prompt_all", &self.system_prompt_all)
            .field("system_prompt_file", &self.system_prompt_file)
            .finish()
    }
}
