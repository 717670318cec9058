//! Data models for the front-matter form.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`FIELDS`]: The field registry, the single source of truth for which controls exist
//! - [`FormState`]: The mutable bag of field values plus the author slots
//! - [`Snapshot`]: An immutable view of the form, consumed by the emitter
//! - [`AuthorSlots`]: The growing/shrinking list of author inputs
//! - [`Condition`]: Cross-field rules (book-only, TOC-dependent, two-column)
//! - [`UserConfig`] and [`Preset`]: YAML-persisted settings and saved forms
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Table-driven**: Defaults and validation come from [`FIELDS`], not from per-field code
//! - **Serializable**: Config and preset structs derive `Serialize`/`Deserialize` for YAML persistence
//! - **Snapshot-based**: The emitter only ever sees a [`Snapshot`], never live form state

pub mod authors;
pub mod condition;
pub mod config;
pub mod fields;
pub mod form_state;
pub mod snapshot;

pub use authors::AuthorSlots;
pub use condition::Condition;
pub use config::{Preset, Settings, UserConfig};
pub use fields::{FIELDS, FieldDefault, FieldKind, FieldSpec, FieldValue, FormError, field_spec};
pub use form_state::FormState;
pub use snapshot::{FontSelection, Snapshot, StyleFlag};
