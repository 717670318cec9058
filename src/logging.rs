use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup logging with an optional rotating file appender and optional console output.
///
/// Logs are written to the specified directory with daily rotation. Console
/// output goes to stderr, never stdout: stdout carries the emitted YAML.
///
/// # Arguments
/// * `log_dir` - Directory for log files (e.g., "logs"), or `None` for no log file
/// * `log_prefix` - Prefix for log files (e.g., "frontmatter")
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `console_output` - If true, also log to stderr
///
/// # Returns
/// A guard that must be held for the duration of the program to keep file logging
/// active, when a log directory was given
pub fn setup_logging(
    log_dir: Option<&str>,
    log_prefix: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(log_dir) => {
            ensure_log_dir(log_dir)?;

            // Create daily rotating file appender
            let file_appender = rolling::daily(log_dir, log_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI codes in log files
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter(debug_mode))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        log_dir.unwrap_or("-"),
        log_prefix,
        debug_mode,
        console_output
    );

    Ok(guard)
}

/// `RUST_LOG` wins when set; otherwise debug or info depending on `debug_mode`.
fn env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

fn ensure_log_dir(log_dir: &str) -> Result<()> {
    let log_path = Utf8PathBuf::from(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(&log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}
