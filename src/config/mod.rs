use crate::models::{Preset, UserConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::sync::LazyLock;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `FRONTMATTER__SETTINGS__DEBUG_MODE=true`
pub const ENV_PREFIX: &str = "FRONTMATTER";

static PRESET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("preset name pattern is valid"));

/// Errors specific to preset storage
#[derive(Error, Debug)]
pub enum PresetError {
    #[error("Invalid preset name {0:?} (use letters, digits, '-' and '_')")]
    InvalidName(String),

    #[error("Preset {0} not found")]
    NotFound(String),
}

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages:
/// - User settings (`frontmatter.yaml`), layered with environment overrides
/// - Named presets (`presets/<name>.yaml`): saved partial forms
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    user_config_path: Utf8PathBuf,
    presets_dir: Utf8PathBuf,
    /// Environment to read overrides from; `None` reads the process environment
    env_vars: Option<HashMap<String, String>>,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// Nothing is created on disk until something is saved.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();
        if config_dir.exists() && !config_dir.is_dir() {
            anyhow::bail!("Config path is not a directory: {}", config_dir);
        }

        Ok(Self {
            user_config_path: config_dir.join("frontmatter.yaml"),
            presets_dir: config_dir.join("presets"),
            config_dir,
            env_vars: None,
        })
    }

    /// Read `FRONTMATTER__*` overrides from `vars` instead of the process environment.
    pub fn with_environment(mut self, vars: HashMap<String, String>) -> Self {
        self.env_vars = Some(vars);
        self
    }

    /// Load the user configuration.
    ///
    /// Layers the YAML file (optional) under `FRONTMATTER__*` environment
    /// variables. A missing file yields defaults.
    pub fn load_user_config(&self) -> Result<UserConfig> {
        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(self.user_config_path.as_std_path())
                    .format(::config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("settings.clipboard_commands")
                    .try_parsing(true)
                    .source(self.env_vars.clone()),
            )
            .build()
            .with_context(|| format!("Failed to read user config: {}", self.user_config_path))?;

        let config: UserConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse user config: {}", self.user_config_path))?;

        tracing::debug!("Loaded user config from {}", self.user_config_path);
        Ok(config)
    }

    /// Save the user configuration file.
    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("Failed to create config directory: {}", self.config_dir))?;

        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize user config to YAML")?;

        fs::write(&self.user_config_path, yaml_string)
            .with_context(|| format!("Failed to write user config: {}", self.user_config_path))?;

        tracing::info!("Saved user config to {}", self.user_config_path);
        Ok(())
    }

    fn preset_path(&self, name: &str) -> Result<Utf8PathBuf> {
        if !PRESET_NAME.is_match(name) {
            return Err(PresetError::InvalidName(name.to_string()).into());
        }
        Ok(self.presets_dir.join(format!("{}.yaml", name)))
    }

    /// Load a named preset.
    pub fn load_preset(&self, name: &str) -> Result<Preset> {
        let path = self.preset_path(name)?;
        if !path.exists() {
            return Err(PresetError::NotFound(name.to_string()).into());
        }

        let file_contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read preset: {}", path))?;

        let preset: Preset = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse preset: {}", path))?;

        tracing::info!("Loaded preset {} from {}", name, path);
        Ok(preset)
    }

    /// Save a named preset, replacing any existing one.
    pub fn save_preset(&self, name: &str, preset: &Preset) -> Result<Utf8PathBuf> {
        let path = self.preset_path(name)?;

        fs::create_dir_all(&self.presets_dir)
            .with_context(|| format!("Failed to create presets directory: {}", self.presets_dir))?;

        let yaml_string =
            serde_yaml_ng::to_string(preset).context("Failed to serialize preset to YAML")?;

        fs::write(&path, yaml_string)
            .with_context(|| format!("Failed to write preset: {}", path))?;

        tracing::info!("Saved preset {} to {}", name, path);
        Ok(path)
    }

    /// Names of all saved presets, sorted.
    pub fn list_presets(&self) -> Result<Vec<String>> {
        if !self.presets_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in self
            .presets_dir
            .read_dir_utf8()
            .with_context(|| format!("Failed to list presets in {}", self.presets_dir))?
        {
            let entry = entry.context("Failed to read presets directory entry")?;
            let path = entry.path();
            if path.extension() == Some("yaml") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn user_config_path(&self) -> &Utf8Path {
        &self.user_config_path
    }
}
