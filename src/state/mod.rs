// State management module
//
// This module provides the StateManager which wraps FormState with thread-safe access
// using Arc<RwLock<T>>, re-emits the front matter after every change, and broadcasts
// change events to listeners.

use crate::models::{FieldValue, FormError, FormState, Preset, Snapshot, field_spec};
use crate::services::{emit, visibility};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when the form is modified
///
/// These events let a front end redraw only what changed instead of polling
/// the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A registry field took a new value
    FieldChanged { field: String, value: FieldValue },

    /// Author slots were edited, added or removed
    AuthorsChanged { authors: Vec<String>, slots: usize },

    /// A conditional control was shown or hidden
    VisibilityChanged { element: &'static str, visible: bool },

    /// The front matter was recomputed
    OutputRegenerated { yaml: String },

    /// Every field was restored to its default
    StateReset,
}

/// Thread-safe form state manager with event emission
///
/// This is the central state component that:
/// - Provides thread-safe access to [`FormState`] via `Arc<RwLock<T>>`
/// - Detects changes and emits [`StateChange`] events
/// - Recomputes the YAML output from scratch after every change
/// - Supports subscribing to changes via tokio broadcast channels
///
/// # Usage
///
/// Always edit through `StateManager` so the output stays in sync:
/// - [`read()`](Self::read) / [`snapshot()`](Self::snapshot) for reading
/// - [`set_field()`](Self::set_field) and friends for edits
/// - [`output()`](Self::output) for the current front matter
/// - [`subscribe()`](Self::subscribe) for listening to changes
pub struct StateManager {
    /// The form protected by RwLock for thread-safe access
    state: Arc<RwLock<FormState>>,

    /// Front matter for the current state
    output: RwLock<String>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    /// Create a new StateManager holding registry defaults
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        Self::with_state(FormState::default())
    }

    /// Create a StateManager around an existing form
    pub fn with_state(form: FormState) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        let output = emit(&form.snapshot());
        Self {
            state: Arc::new(RwLock::new(form)),
            output: RwLock::new(output),
            state_tx,
        }
    }

    /// Execute a function with read access to the form
    ///
    /// # Example
    /// ```ignore
    /// let title = state_manager.read(|form| form.text("title").to_string());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&FormState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Freeze the current form for emission
    pub fn snapshot(&self) -> Snapshot {
        self.read(FormState::snapshot)
    }

    /// The most recently emitted front matter
    pub fn output(&self) -> String {
        self.output
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Apply an edit and emit change events
    ///
    /// This is the primary way to modify the form. It:
    /// 1. Captures the old state
    /// 2. Applies the edit; on error the old state is restored
    /// 3. Detects what changed
    /// 4. Re-emits the front matter if anything changed
    /// 5. Broadcasts the events
    ///
    /// # Returns
    /// The StateChange events that were emitted
    pub fn try_update<F>(&self, update_fn: F) -> Result<Vec<StateChange>, FormError>
    where
        F: FnOnce(&mut FormState) -> Result<(), FormError>,
    {
        self.apply(false, update_fn)
    }

    /// Infallible variant of [`try_update`](Self::try_update)
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut FormState),
    {
        self.apply(false, |form| {
            update_fn(form);
            Ok(())
        })
        .unwrap_or_default()
    }

    fn apply<F>(&self, reset: bool, update_fn: F) -> Result<Vec<StateChange>, FormError>
    where
        F: FnOnce(&mut FormState) -> Result<(), FormError>,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let old_state = state.clone();

        if let Err(e) = update_fn(&mut state) {
            *state = old_state;
            return Err(e);
        }

        let mut changes = Vec::new();
        if reset {
            changes.push(StateChange::StateReset);
        }
        changes.extend(Self::detect_changes(&old_state, &state));

        if !changes.is_empty() {
            // Always recompute from scratch; there is no incremental path
            let yaml = emit(&state.snapshot());
            *self.output.write().unwrap_or_else(PoisonError::into_inner) = yaml.clone();
            changes.push(StateChange::OutputRegenerated { yaml });
        }
        drop(state);

        tracing::debug!("Form updated with {} change events", changes.len());
        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        Ok(changes)
    }

    /// Detect what changed between two forms and generate events
    fn detect_changes(old: &FormState, new: &FormState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        for (id, value) in new.values() {
            if old.value(id) != Some(value) {
                changes.push(StateChange::FieldChanged {
                    field: id.to_string(),
                    value: value.clone(),
                });
            }
        }

        if old.authors() != new.authors() {
            changes.push(StateChange::AuthorsChanged {
                authors: new.authors().authors(),
                slots: new.authors().slot_count(),
            });
        }

        let before = visibility(&old.snapshot());
        let after = visibility(&new.snapshot());
        for ((element, was_visible), (_, visible)) in before.into_iter().zip(after) {
            if was_visible != visible {
                changes.push(StateChange::VisibilityChanged { element, visible });
            }
        }

        changes
    }

    // Convenience methods for common edits

    pub fn set_field(&self, id: &str, value: FieldValue) -> Result<Vec<StateChange>, FormError> {
        self.try_update(|form| form.set_field(id, value).map(|_| ()))
    }

    pub fn set_text(&self, id: &str, value: impl Into<String>) -> Result<Vec<StateChange>, FormError> {
        self.set_field(id, FieldValue::Text(value.into()))
    }

    pub fn set_checked(&self, id: &str, checked: bool) -> Result<Vec<StateChange>, FormError> {
        self.set_field(id, FieldValue::Checked(checked))
    }

    /// Parse `raw` according to the field's kind and set it
    pub fn set_from_str(&self, id: &str, raw: &str) -> Result<Vec<StateChange>, FormError> {
        let spec = field_spec(id).ok_or_else(|| FormError::UnknownField(id.to_string()))?;
        self.set_field(id, FieldValue::parse_for(spec, raw)?)
    }

    pub fn toggle(&self, id: &str) -> Result<Vec<StateChange>, FormError> {
        self.try_update(|form| form.toggle(id).map(|_| ()))
    }

    /// Type into author slot `index`
    pub fn edit_author(&self, index: usize, value: impl Into<String>) -> Result<Vec<StateChange>, FormError> {
        let value = value.into();
        self.try_update(|form| form.authors_mut().edit(index, value))
    }

    /// Author slot `index` lost focus
    pub fn blur_author(&self, index: usize) -> Result<Vec<StateChange>, FormError> {
        self.try_update(|form| form.authors_mut().blur(index).map(|_| ()))
    }

    /// Set the date field to today's date
    pub fn set_date_today(&self) -> Vec<StateChange> {
        self.update(|form| {
            form.set_date_today();
        })
    }

    /// Restore every field to its registry default and re-emit
    pub fn reset_to_defaults(&self) -> Vec<StateChange> {
        tracing::info!("Resetting form to defaults");
        self.apply(true, |form| {
            form.reset_to_defaults();
            Ok(())
        })
        .unwrap_or_default()
    }

    /// Apply a saved preset on top of the current form
    pub fn apply_preset(&self, preset: &Preset) -> Result<Vec<StateChange>, FormError> {
        self.try_update(|form| form.apply_preset(preset))
    }
}
