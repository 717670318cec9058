use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::fields::FieldValue;

/// User configuration from `frontmatter.yaml`
///
/// Contains user-specific settings. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub debug_mode: bool,

    /// How long a copy status message stays visible
    #[serde(default = "default_status_display_ms")]
    pub status_display_ms: u64,

    /// Clipboard commands to try in order, e.g. `["wl-copy", "xclip -selection clipboard"]`.
    /// Empty means use the platform defaults.
    #[serde(default)]
    pub clipboard_commands: Vec<String>,

    /// Preset applied before any command-line overrides
    #[serde(default)]
    pub default_preset: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            debug_mode: false,
            status_display_ms: default_status_display_ms(),
            clipboard_commands: Vec::new(),
            default_preset: None,
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_status_display_ms() -> u64 {
    2500
}

/// A saved partial form.
///
/// Only fields that differ from their registry defaults need to be listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
}
