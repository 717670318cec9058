// Clipboard sink - hands emitted front matter to the system clipboard
//
// Copying goes through external clipboard programs (wl-copy, xclip, pbcopy, ...)
// fed on stdin. The first candidate is the primary method; the rest are fallbacks.
// Failures never propagate to the caller: they turn into a status message.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use thiserror::Error;

pub const COPIED: &str = "Copied to clipboard.";
pub const COPIED_FALLBACK: &str = "Copied to clipboard (fallback).";
pub const COPY_MANUALLY: &str = "Select the text and copy manually.";
pub const COPY_FAILED: &str = "Could not copy. Select the text and copy manually.";

/// Which candidate ended up doing the copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Primary,
    Fallback,
}

/// Errors that can occur while copying
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("No clipboard program available")]
    Unavailable,

    #[error("Clipboard program {program} rejected the copy: {reason}")]
    Rejected { program: String, reason: String },

    #[error("Clipboard I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Destination for copied text
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> Result<CopyMethod, ClipboardError>;
}

/// User-facing status text for a copy attempt.
pub fn copy_status_message(result: &Result<CopyMethod, ClipboardError>) -> &'static str {
    match result {
        Ok(CopyMethod::Primary) => COPIED,
        Ok(CopyMethod::Fallback) => COPIED_FALLBACK,
        Err(ClipboardError::Unavailable) => COPY_MANUALLY,
        Err(_) => COPY_FAILED,
    }
}

/// Copy `text` and return the status message to show.
pub fn copy_text(sink: &dyn ClipboardSink, text: &str) -> &'static str {
    let result = sink.write_text(text);
    match &result {
        Ok(method) => tracing::info!("Copied {} bytes to clipboard ({:?})", text.len(), method),
        Err(e) => tracing::warn!("Copy failed: {}", e),
    }
    copy_status_message(&result)
}

/// A clipboard program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ClipboardCommand {
    /// Parse a whitespace-separated command line such as `xclip -selection clipboard`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Clipboard backed by external programs
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: Vec<ClipboardCommand>,
}

impl SystemClipboard {
    pub fn new(candidates: Vec<ClipboardCommand>) -> Self {
        Self { candidates }
    }

    /// Build from configured command lines, or the platform defaults if none.
    pub fn from_settings(commands: &[String]) -> Self {
        let candidates: Vec<_> = commands
            .iter()
            .filter_map(|line| ClipboardCommand::parse(line))
            .collect();
        if candidates.is_empty() {
            Self::platform_default()
        } else {
            Self::new(candidates)
        }
    }

    pub fn platform_default() -> Self {
        let lines: &[&str] = if cfg!(target_os = "windows") {
            &["clip"]
        } else if cfg!(target_os = "macos") {
            &["pbcopy"]
        } else {
            &["wl-copy", "xclip -selection clipboard", "xsel --clipboard --input"]
        };
        Self::new(lines.iter().filter_map(|line| ClipboardCommand::parse(line)).collect())
    }

    pub fn candidates(&self) -> &[ClipboardCommand] {
        &self.candidates
    }

    fn run(command: &ClipboardCommand, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // The child is waited on even when it stops reading early
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ClipboardError::Rejected {
                program: command.program.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;
        Ok(())
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<CopyMethod, ClipboardError> {
        for (index, command) in self.candidates.iter().enumerate() {
            match Self::run(command, text) {
                Ok(()) => {
                    return Ok(if index == 0 {
                        CopyMethod::Primary
                    } else {
                        CopyMethod::Fallback
                    });
                }
                Err(ClipboardError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("Clipboard program {} not found", command.program);
                }
                Err(e) => return Err(e),
            }
        }
        Err(ClipboardError::Unavailable)
    }
}
