//! frontmatter - Pandoc YAML front matter for LaTeX documents
//!
//! Main entry point for the command-line front end.
//!
//! # Overview
//!
//! The binary plays the part of the form: it fills a [`StateManager`] from a
//! preset and command-line flags, then prints, saves or copies the emitted
//! front matter. It initializes:
//! - Configuration loading ([`ConfigManager`]): settings file + environment
//! - Logging infrastructure (rotating file, optional stderr output)
//! - A current-thread tokio runtime (status timers, interactive input)
//!
//! # Execution Flow
//!
//! 1. Parse arguments
//! 2. Load `frontmatter.yaml` from the config directory (defaults if missing)
//! 3. Initialize logging → <log_dir>/frontmatter.<date> (stderr only while no
//!    config directory exists and the command writes none)
//! 4. Build the form: default preset or --preset, then --set, --author, --today
//! 5. Run the subcommand
//!
//! # Configuration Files
//!
//! Expected in the config directory (`.frontmatter/` by default):
//! - `frontmatter.yaml`: Settings (log directory, debug mode, clipboard commands)
//! - `presets/<name>.yaml`: Saved forms

mod cli;

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use frontmatter_builder::models::{FIELDS, FieldDefault, FieldKind, FormState, Settings};
use frontmatter_builder::services::visibility;
use frontmatter_builder::ui::{EditSession, StatusLine, SystemClipboard, copy_text};
use frontmatter_builder::{APP_NAME, ConfigManager, StateManager, VERSION};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{Cli, Command, FormArgs, PresetCommand, parse_assignment};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager.load_user_config()?.settings;

    let log_dir = log_dir_for(&cli, &settings);
    let _guard = frontmatter_builder::logging::setup_logging(
        log_dir.as_ref().map(|dir| dir.as_str()),
        "frontmatter",
        cli.debug || settings.debug_mode,
        cli.verbose,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    let settings_path = config_manager.user_config_path();
    if settings_path.exists() {
        tracing::info!("Loaded settings from {}", settings_path);
    } else {
        tracing::info!("No settings file at {}, using defaults", settings_path);
    }

    // Single-threaded: the form is edited and emitted synchronously
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run(cli.command, &config_manager, &settings));
    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }
    result
}

/// Log to a file only where a config directory already exists or is about
/// to be written, so read-only runs leave the working directory untouched.
fn log_dir_for(cli: &Cli, settings: &Settings) -> Option<Utf8PathBuf> {
    (cli.config_dir.is_dir() || cli.command.writes_config())
        .then(|| resolve_log_dir(&cli.config_dir, &settings.log_dir))
}

/// Relative log directories live inside the config directory.
fn resolve_log_dir(config_dir: &Utf8PathBuf, log_dir: &str) -> Utf8PathBuf {
    let log_dir = Utf8PathBuf::from(log_dir);
    if log_dir.is_absolute() {
        log_dir
    } else {
        config_dir.join(log_dir)
    }
}

async fn run(command: Command, config_manager: &ConfigManager, settings: &Settings) -> Result<()> {
    match command {
        Command::Emit(args) => {
            let state = build_form(&args.form, config_manager, settings)?;
            let yaml = state.output();

            match &args.output {
                Some(path) => {
                    fs::write(path, &yaml)
                        .with_context(|| format!("Failed to write front matter: {}", path))?;
                    tracing::info!("Wrote front matter to {}", path);
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(yaml.as_bytes())?;
                    stdout.flush()?;
                }
            }

            if args.copy {
                let clipboard = SystemClipboard::from_settings(&settings.clipboard_commands);
                eprintln!("{}", copy_text(&clipboard, &yaml));
            }
            Ok(())
        }
        Command::Fields => {
            print_fields();
            Ok(())
        }
        Command::Visibility(form) => {
            let state = build_form(&form, config_manager, settings)?;
            for (element, visible) in visibility(&state.snapshot()) {
                println!("{:<16}{}", element, if visible { "shown" } else { "hidden" });
            }
            Ok(())
        }
        Command::Preset(PresetCommand::Save { name, form }) => {
            let state = build_form(&form, config_manager, settings)?;
            let preset = state.read(FormState::to_preset);
            let path = config_manager.save_preset(&name, &preset)?;
            eprintln!("Saved preset {} to {}", name, path);
            Ok(())
        }
        Command::Preset(PresetCommand::List) => {
            for name in config_manager.list_presets()? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Edit(form) => {
            let state = Arc::new(build_form(&form, config_manager, settings)?);
            let clipboard = SystemClipboard::from_settings(&settings.clipboard_commands);
            let status = StatusLine::new(Duration::from_millis(settings.status_display_ms));
            let mut session = EditSession::new(state, clipboard, status);

            let input = tokio::io::BufReader::new(tokio::io::stdin());
            session.run(input, &mut io::stdout()).await
        }
    }
}

/// Fill a form from the preset, `--set`, `--author` and `--today` flags, in that order.
fn build_form(args: &FormArgs, config_manager: &ConfigManager, settings: &Settings) -> Result<StateManager> {
    let state = StateManager::new();

    if let Some(name) = args.preset.as_ref().or(settings.default_preset.as_ref()) {
        let preset = config_manager.load_preset(name)?;
        state
            .apply_preset(&preset)
            .with_context(|| format!("Preset {} does not fit the form", name))?;
    }

    for raw in &args.sets {
        let Some((id, value)) = parse_assignment(raw) else {
            bail!("Expected ID=VALUE, got {:?}", raw);
        };
        state.set_from_str(id, value)?;
    }

    for author in &args.authors {
        // Always type into the trailing blank slot, like the form does
        let last = state.read(|form| form.authors().last_index());
        state.edit_author(last, author.as_str())?;
    }

    if args.today {
        state.set_date_today();
    }

    Ok(state)
}

fn print_fields() {
    for spec in FIELDS {
        let default = match spec.default {
            FieldDefault::Text(value) => format!("{:?}", value),
            FieldDefault::Checked(value) => value.to_string(),
        };
        let options = match spec.kind {
            FieldKind::Select(options) => format!("  [{}]", options.join(", ")),
            FieldKind::Text | FieldKind::Checkbox => String::new(),
        };
        println!("{:<18}{:<9}{}{}", spec.id, spec.kind.name(), default, options);
    }
}
