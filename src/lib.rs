// frontmatter-builder - Pandoc YAML front matter for LaTeX documents
//
// This is the library crate containing the form model, the emitter and the supporting
// registries. The binary crate (main.rs) provides the command-line front end.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{FormState, Preset, Snapshot, UserConfig};
pub use services::emit;
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
