//! CLI argument definitions for the front-matter builder.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "frontmatter",
    version,
    about = "Build Pandoc YAML front matter for LaTeX documents",
    long_about = "Build a Pandoc YAML front-matter block for LaTeX output.\n\n\
                  Fields are set with --set ID=VALUE (see `frontmatter fields`),\n\
                  authors with repeated --author flags, and whole forms can be\n\
                  saved and reused as presets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding frontmatter.yaml and presets/.
    #[arg(long = "config-dir", value_name = "DIR", default_value = ".frontmatter", global = true)]
    pub config_dir: Utf8PathBuf,

    /// Also log to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log at debug level (overrides the settings file).
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the front matter for the given fields.
    Emit(EmitArgs),

    /// List every field with its kind and default.
    Fields,

    /// Show which conditional fields are visible for the given fields.
    Visibility(FormArgs),

    /// Save or list presets.
    #[command(subcommand)]
    Preset(PresetCommand),

    /// Edit the form interactively, one command per line.
    Edit(FormArgs),
}

/// Inputs that fill the form, shared by every command that builds one.
#[derive(Args, Clone, Default)]
pub struct FormArgs {
    /// Start from a saved preset.
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Set a field, e.g. --set documentclass=book --set toc=false.
    #[arg(long = "set", value_name = "ID=VALUE")]
    pub sets: Vec<String>,

    /// Add an author (repeat for several, order is kept).
    #[arg(long = "author", value_name = "NAME")]
    pub authors: Vec<String>,

    /// Set the date to today.
    #[arg(long)]
    pub today: bool,
}

#[derive(Args)]
pub struct EmitArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Write the front matter to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Copy the front matter to the clipboard.
    #[arg(long)]
    pub copy: bool,
}

#[derive(Subcommand)]
pub enum PresetCommand {
    /// Save the given fields as a named preset.
    Save {
        /// Preset name (letters, digits, '-' and '_').
        name: String,

        #[command(flatten)]
        form: FormArgs,
    },

    /// List saved presets.
    List,
}

impl Command {
    /// Whether the command saves into the config directory
    pub fn writes_config(&self) -> bool {
        matches!(self, Command::Preset(PresetCommand::Save { .. }))
    }
}

/// Split `ID=VALUE`. The value may be empty and may contain '='.
pub fn parse_assignment(raw: &str) -> Option<(&str, &str)> {
    let (id, value) = raw.split_once('=')?;
    let id = id.trim();
    if id.is_empty() { None } else { Some((id, value)) }
}
