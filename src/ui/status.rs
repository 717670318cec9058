// StatusLine - transient message shown after a copy attempt
//
// A message stays visible for a fixed window and then clears itself. Showing a new
// message restarts the window: the previous timer is aborted, and a generation counter
// makes sure a timer that already woke up can never clear a newer message.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long a status message stays visible by default
pub const DEFAULT_STATUS_DISPLAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Default)]
struct StatusText {
    message: String,
    generation: u64,
}

/// Self-clearing status message
///
/// Must be used from within a tokio runtime: [`show`](Self::show) spawns the
/// clear timer as a task.
pub struct StatusLine {
    text: Arc<Mutex<StatusText>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    display_for: Duration,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_DISPLAY)
    }
}

impl StatusLine {
    pub fn new(display_for: Duration) -> Self {
        Self {
            text: Arc::new(Mutex::new(StatusText::default())),
            timer: Mutex::new(None),
            display_for,
        }
    }

    /// Show `message` and restart the clear timer.
    pub fn show(&self, message: impl Into<String>) {
        let generation = {
            let mut text = self.text.lock().unwrap_or_else(PoisonError::into_inner);
            text.message = message.into();
            text.generation += 1;
            text.generation
        };

        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let text = Arc::clone(&self.text);
        let display_for = self.display_for;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(display_for).await;
            let mut text = text.lock().unwrap_or_else(PoisonError::into_inner);
            if text.generation == generation {
                text.message.clear();
            }
        }));
    }

    /// The message currently shown, empty once cleared
    pub fn current(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .message
            .clone()
    }

    pub fn display_for(&self) -> Duration {
        self.display_for
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_message_clears_after_window() {
        let status = StatusLine::new(Duration::from_millis(30));
        status.show("Copied to clipboard.");
        assert_eq!(status.current(), "Copied to clipboard.");

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(status.current(), "");
    }

    #[tokio::test]
    async fn test_new_message_resets_timer() {
        let status = StatusLine::new(Duration::from_millis(150));
        status.show("first");
        tokio::time::sleep(Duration::from_millis(100)).await;

        status.show("second");
        // The first timer would have fired by now
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(status.current(), "second");

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(status.current(), "");
    }

    #[test]
    fn test_default_window() {
        assert_eq!(StatusLine::default().display_for(), Duration::from_millis(2500));
    }
}
