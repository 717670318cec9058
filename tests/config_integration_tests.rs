//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - User settings loading, saving and defaults
//! - Environment overrides
//! - Preset storage, listing and name validation
//! - Integration with StateManager

use camino::Utf8PathBuf;
use frontmatter_builder::config::PresetError;
use frontmatter_builder::models::{FieldValue, Preset};
use frontmatter_builder::{ConfigManager, StateManager, UserConfig};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

/// A manager that sees no `FRONTMATTER__*` variables from the test process
fn isolated_manager(config_path: &Utf8PathBuf) -> ConfigManager {
    ConfigManager::new(config_path)
        .unwrap()
        .with_environment(HashMap::new())
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("nested").join("config");
    let manager = isolated_manager(&nested);

    assert_eq!(manager.config_dir(), &nested);
    // Read-only use leaves the disk alone
    manager.load_user_config().unwrap();
    assert!(manager.list_presets().unwrap().is_empty());
    assert!(!nested.exists());

    manager.save_preset("first", &Preset::default()).unwrap();
    assert!(nested.join("presets").join("first.yaml").exists());
}

#[test]
fn test_load_default_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = isolated_manager(&config_path);

    // User config file doesn't exist, should return defaults
    let settings = manager.load_user_config().unwrap().settings;
    assert_eq!(settings.log_dir, "logs");
    assert_eq!(settings.status_display_ms, 2500);
    assert!(!settings.debug_mode);
    assert_eq!(settings.default_preset, None);
}

#[test]
fn test_partial_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("frontmatter.yaml"),
        "settings:\n  debug_mode: true\n  default_preset: thesis\n",
    )
    .unwrap();

    let manager = isolated_manager(&config_path);
    let settings = manager.load_user_config().unwrap().settings;

    assert!(settings.debug_mode);
    assert_eq!(settings.default_preset.as_deref(), Some("thesis"));
    // Missing keys keep their defaults
    assert_eq!(settings.log_dir, "logs");
    assert_eq!(settings.status_display_ms, 2500);
}

#[test]
fn test_save_and_reload_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = isolated_manager(&config_path);

    let mut config = UserConfig::default();
    config.settings.log_dir = "/var/log/frontmatter".into();
    config.settings.status_display_ms = 4000;
    manager.save_user_config(&config).unwrap();

    let loaded = manager.load_user_config().unwrap();
    assert_eq!(loaded.settings.log_dir, "/var/log/frontmatter");
    assert_eq!(loaded.settings.status_display_ms, 4000);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("frontmatter.yaml"),
        "settings:\n  clipboard_commands: [pbcopy]\n",
    )
    .unwrap();

    let manager = ConfigManager::new(&config_path)
        .unwrap()
        .with_environment(HashMap::from([(
            "FRONTMATTER__SETTINGS__CLIPBOARD_COMMANDS".to_string(),
            "wl-copy,xclip -selection clipboard".to_string(),
        )]));
    let settings = manager.load_user_config().unwrap().settings;
    assert_eq!(
        settings.clipboard_commands,
        ["wl-copy", "xclip -selection clipboard"]
    );
}

#[test]
fn test_malformed_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    fs::write(
        config_path.join("frontmatter.yaml"),
        "settings:\n  status_display_ms: soon\n",
    )
    .unwrap();

    let manager = isolated_manager(&config_path);
    assert!(manager.load_user_config().is_err());
}

#[test]
fn test_preset_written_as_yaml() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = isolated_manager(&config_path);

    let mut preset = Preset::default();
    preset
        .fields
        .insert("documentclass".into(), FieldValue::Text("book".into()));
    preset.fields.insert("toc".into(), FieldValue::Checked(false));
    preset.authors = vec!["Jane Doe".into()];

    let path = manager.save_preset("thesis", &preset).unwrap();
    assert_eq!(path, config_path.join("presets").join("thesis.yaml"));

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("documentclass: book"));
    assert!(contents.contains("toc: false"));
    assert!(contents.contains("- Jane Doe"));
}

#[test]
fn test_hand_written_preset() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = isolated_manager(&config_path);

    fs::create_dir_all(config_path.join("presets")).unwrap();
    fs::write(
        config_path.join("presets").join("notes.yaml"),
        "fields:\n  toc-depth: 2\n  twocolumn: true\n  margin: 2cm\n",
    )
    .unwrap();

    let preset = manager.load_preset("notes").unwrap();
    // Unquoted numbers are kept as text
    assert_eq!(preset.fields["toc-depth"], FieldValue::Text("2".into()));
    assert_eq!(preset.fields["twocolumn"], FieldValue::Checked(true));
    assert!(preset.authors.is_empty());
}

#[test]
fn test_list_presets() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = isolated_manager(&config_path);
    assert!(manager.list_presets().unwrap().is_empty());

    for name in ["report", "article-a5", "book_draft"] {
        manager.save_preset(name, &Preset::default()).unwrap();
    }
    // Non-preset files are ignored
    fs::write(config_path.join("presets").join("README.txt"), "notes").unwrap();

    assert_eq!(
        manager.list_presets().unwrap(),
        ["article-a5", "book_draft", "report"]
    );
}

#[test]
fn test_invalid_preset_names() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = isolated_manager(&config_path);

    for name in ["", "../up", "with space", "dots.yaml"] {
        let err = manager.load_preset(name).unwrap_err();
        assert!(
            matches!(err.downcast_ref::<PresetError>(), Some(PresetError::InvalidName(_))),
            "{:?} should be rejected",
            name
        );
    }
}

#[test]
fn test_preset_drives_state_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = isolated_manager(&config_path);

    // Build a form, save it, and load it into a fresh state
    let original = StateManager::new();
    original.set_text("documentclass", "report").unwrap();
    original.set_checked("booktabs", true).unwrap();
    original.edit_author(0, "B").unwrap();
    original.edit_author(1, "A").unwrap();
    manager
        .save_preset("lab-report", &original.read(|form| form.to_preset()))
        .unwrap();

    let restored = StateManager::new();
    restored
        .apply_preset(&manager.load_preset("lab-report").unwrap())
        .unwrap();

    assert_eq!(restored.snapshot(), original.snapshot());
    assert_eq!(restored.output(), original.output());
}
