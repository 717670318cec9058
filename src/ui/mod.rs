// UI module - front-end plumbing around the form
//
// This module contains:
// - ClipboardSink / SystemClipboard: Hands the emitted front matter to the system clipboard
// - StatusLine: Self-clearing status message shown after a copy attempt
// - EditSession: Line-oriented editing session driving the StateManager

pub mod clipboard;
pub mod session;
pub mod status;

pub use clipboard::{ClipboardError, ClipboardSink, CopyMethod, SystemClipboard, copy_text};
pub use session::{EditSession, Reply};
pub use status::StatusLine;
