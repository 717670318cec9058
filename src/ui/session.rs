// EditSession - line-oriented front end for the form
//
// Each input line is one form action (type into a field, toggle a checkbox, edit an
// author slot, copy, ...). Edits go through the StateManager, which re-emits the front
// matter; the session drains the change events it broadcasts and reports them back.

use crate::models::FIELDS;
use crate::services::visibility;
use crate::state::{StateChange, StateManager};
use crate::ui::clipboard::{ClipboardSink, copy_text};
use crate::ui::status::StatusLine;
use anyhow::{Result, anyhow, bail};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::{self, error::TryRecvError};

pub const HELP: &str = "\
commands:
  set <field> [value]     type into a text field or pick a select value
  toggle <field>          flip a checkbox
  author <n> [name]       type into author slot n (1-based)
  blur <n>                leave author slot n
  today                   set the date to today
  reset                   restore all defaults
  show                    print the front matter
  fields                  list fields and current values
  authors                 list author slots
  visible                 list conditional fields and whether they are shown
  copy                    copy the front matter to the clipboard
  status                  show the current status message
  quit                    leave the session";

/// Result of handling one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Interactive editing session over a shared [`StateManager`]
pub struct EditSession<C: ClipboardSink> {
    state: Arc<StateManager>,
    clipboard: C,
    status: StatusLine,
    events: broadcast::Receiver<StateChange>,
}

impl<C: ClipboardSink> EditSession<C> {
    pub fn new(state: Arc<StateManager>, clipboard: C, status: StatusLine) -> Self {
        let events = state.subscribe();
        Self {
            state,
            clipboard,
            status,
            events,
        }
    }

    /// Read commands until end of input or `quit`.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        tracing::info!("Edit session started");
        writeln!(out, "{}", self.state.output().trim_end())?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match self.handle(&line) {
                Ok(Reply::Quit) => break,
                Ok(Reply::Text(text)) if text.is_empty() => {}
                Ok(Reply::Text(text)) => writeln!(out, "{}", text)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            }
            out.flush()?;
        }

        tracing::info!("Edit session finished");
        Ok(())
    }

    /// Handle a single command line.
    pub fn handle(&mut self, line: &str) -> Result<Reply> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => Ok(Reply::Text(String::new())),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    bail!("usage: set <field> [value]");
                }
                self.state.set_from_str(field, value.trim())?;
                Ok(self.drain_events())
            }
            "toggle" => {
                if rest.is_empty() {
                    bail!("usage: toggle <field>");
                }
                self.state.toggle(rest)?;
                Ok(self.drain_events())
            }
            "author" => {
                let (slot, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let index = parse_slot(slot)?;
                self.state.edit_author(index, name.trim())?;
                Ok(self.drain_events())
            }
            "blur" => {
                let index = parse_slot(rest)?;
                self.state.blur_author(index)?;
                Ok(self.drain_events())
            }
            "today" => {
                self.state.set_date_today();
                Ok(self.drain_events())
            }
            "reset" => {
                self.state.reset_to_defaults();
                Ok(self.drain_events())
            }
            "show" => Ok(Reply::Text(self.state.output().trim_end().to_string())),
            "fields" => Ok(Reply::Text(self.describe_fields())),
            "authors" => Ok(Reply::Text(self.describe_authors())),
            "visible" => {
                let snapshot = self.state.snapshot();
                let lines: Vec<String> = visibility(&snapshot)
                    .into_iter()
                    .map(|(element, visible)| {
                        format!("{:<16}{}", element, if visible { "shown" } else { "hidden" })
                    })
                    .collect();
                Ok(Reply::Text(lines.join("\n")))
            }
            "copy" => {
                let message = copy_text(&self.clipboard, &self.state.output());
                self.status.show(message);
                Ok(Reply::Text(message.to_string()))
            }
            "status" => Ok(Reply::Text(self.status.current())),
            "help" | "?" => Ok(Reply::Text(HELP.to_string())),
            "quit" | "exit" => Ok(Reply::Quit),
            other => Err(anyhow!("unknown command {:?} (try 'help')", other)),
        }
    }

    /// Summarize the events broadcast since the last call.
    fn drain_events(&mut self) -> Reply {
        let mut lines = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(change) => {
                    if let Some(line) = describe_change(&change) {
                        lines.push(line);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Edit session missed {} state events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if lines.is_empty() {
            lines.push("no change".to_string());
        }
        Reply::Text(lines.join("\n"))
    }

    fn describe_fields(&self) -> String {
        self.state.read(|form| {
            FIELDS
                .iter()
                .map(|spec| {
                    let value = form
                        .value(spec.id)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    format!("{:<18}{:<9}{}", spec.id, spec.kind.name(), value)
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    fn describe_authors(&self) -> String {
        self.state.read(|form| {
            form.authors()
                .slots()
                .iter()
                .enumerate()
                .map(|(index, slot)| format!("{}: {}", index + 1, slot))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }
}

fn parse_slot(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(slot) if slot > 0 => Ok(slot - 1),
        _ => Err(anyhow!("author slots are numbered from 1, got {:?}", raw)),
    }
}

fn describe_change(change: &StateChange) -> Option<String> {
    match change {
        StateChange::FieldChanged { field, value } => Some(format!("{} = {}", field, value)),
        StateChange::AuthorsChanged { authors, slots } => Some(format!(
            "authors: [{}] ({} slots)",
            authors.join(", "),
            slots
        )),
        StateChange::VisibilityChanged { element, visible } => Some(format!(
            "{} {}",
            if *visible { "showing" } else { "hiding" },
            element
        )),
        StateChange::StateReset => Some("form reset to defaults".to_string()),
        StateChange::OutputRegenerated { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::clipboard::{COPIED, CopyMethod, MockClipboardSink};
    use std::time::Duration;

    fn session(sink: MockClipboardSink) -> EditSession<MockClipboardSink> {
        EditSession::new(
            Arc::new(StateManager::new()),
            sink,
            StatusLine::new(Duration::from_millis(50)),
        )
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_set_reports_change() {
        let mut session = session(MockClipboardSink::new());
        let reply = text(session.handle("set title My Thesis").unwrap());
        assert_eq!(reply, "title = \"My Thesis\"");
    }

    #[test]
    fn test_toggle_and_visibility() {
        let mut session = session(MockClipboardSink::new());
        let reply = text(session.handle("toggle toc").unwrap());
        assert!(reply.contains("toc = false"));
        assert!(reply.contains("hiding toc-depth"));
    }

    #[test]
    fn test_author_slots() {
        let mut session = session(MockClipboardSink::new());
        text(session.handle("author 1 B").unwrap());
        text(session.handle("author 2 A").unwrap());
        assert_eq!(text(session.handle("authors").unwrap()), "1: B\n2: A\n3: ");

        text(session.handle("author 1").unwrap());
        text(session.handle("blur 1").unwrap());
        assert_eq!(text(session.handle("authors").unwrap()), "1: A\n2: ");
    }

    #[test]
    fn test_errors_are_reported() {
        let mut session = session(MockClipboardSink::new());
        assert!(session.handle("set colour red").is_err());
        assert!(session.handle("author 0 X").is_err());
        assert!(session.handle("frobnicate").is_err());
    }

    #[test]
    fn test_unchanged_value() {
        let mut session = session(MockClipboardSink::new());
        assert_eq!(
            text(session.handle("set papersize a4").unwrap()),
            "no change"
        );
    }

    #[tokio::test]
    async fn test_copy_sets_status() {
        let mut sink = MockClipboardSink::new();
        sink.expect_write_text()
            .times(1)
            .returning(|_| Ok(CopyMethod::Primary));
        let mut session = session(sink);

        assert_eq!(text(session.handle("copy").unwrap()), COPIED);
        assert_eq!(text(session.handle("status").unwrap()), COPIED);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(text(session.handle("status").unwrap()), "");
    }

    #[tokio::test]
    async fn test_run_until_quit() {
        let mut session = session(MockClipboardSink::new());
        let input: &[u8] = b"set title Run\nquit\nset title Ignored\n";
        let mut out = Vec::new();
        session.run(input, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("---\n"));
        assert!(out.contains("title = \"Run\""));
        assert!(!out.contains("Ignored"));
    }
}
