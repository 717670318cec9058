use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::models::authors::AuthorSlots;
use crate::models::config::Preset;
use crate::models::fields::{FIELDS, FieldSpec, FieldValue, FormError, field_spec, validate};
use crate::models::snapshot::{FontSelection, Snapshot, StyleFlag};

/// Single source of truth for the form's current values.
///
/// Values are keyed by field registry id and kept in registry order. The
/// emitter never reads this directly; it gets a [`Snapshot`] instead.
///
/// # Thread Safety
///
/// `FormState` is wrapped in a lock by [`crate::state::StateManager`]. Edits
/// that should trigger re-emission go through the manager.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    values: IndexMap<&'static str, FieldValue>,
    authors: AuthorSlots,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: FIELDS
                .iter()
                .map(|spec| (spec.id, FieldValue::from(spec.default)))
                .collect(),
            authors: AuthorSlots::default(),
        }
    }
}

impl FormState {
    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Text value of a text/select field, or "" for anything else
    pub fn text(&self, id: &str) -> &str {
        self.values
            .get(id)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
    }

    /// State of a checkbox field, `false` for anything else
    pub fn checked(&self, id: &str) -> bool {
        self.values
            .get(id)
            .and_then(FieldValue::as_checked)
            .unwrap_or(false)
    }

    /// All values in registry order
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(id, value)| (*id, value))
    }

    pub fn authors(&self) -> &AuthorSlots {
        &self.authors
    }

    pub fn authors_mut(&mut self) -> &mut AuthorSlots {
        &mut self.authors
    }

    /// Set a field after validating it against the registry.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_field(&mut self, id: &str, value: FieldValue) -> Result<bool, FormError> {
        let spec = lookup(id)?;
        validate(spec, &value)?;

        let slot = self
            .values
            .entry(spec.id)
            .or_insert_with(|| FieldValue::from(spec.default));
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    pub fn set_text(&mut self, id: &str, value: impl Into<String>) -> Result<bool, FormError> {
        self.set_field(id, FieldValue::Text(value.into()))
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<bool, FormError> {
        self.set_field(id, FieldValue::Checked(checked))
    }

    /// Flip a checkbox, returning its new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, FormError> {
        let next = !self.checked(lookup(id)?.id);
        self.set_checked(id, next)?;
        Ok(next)
    }

    /// Set the date field to `date` in ISO format.
    pub fn set_date(&mut self, date: NaiveDate) -> bool {
        let formatted = date.format("%Y-%m-%d").to_string();
        self.values.insert("date", FieldValue::Text(formatted.clone())) != Some(FieldValue::Text(formatted))
    }

    /// Set the date field to today's local date.
    pub fn set_date_today(&mut self) -> bool {
        self.set_date(chrono::Local::now().date_naive())
    }

    /// Restore every registry default and collapse the author list.
    pub fn reset_to_defaults(&mut self) {
        for spec in FIELDS {
            self.values.insert(spec.id, FieldValue::from(spec.default));
        }
        self.authors.reset();
    }

    /// Apply a preset on top of the current values.
    ///
    /// Every entry is validated before anything is written, so a bad preset
    /// leaves the form untouched. A non-empty author list replaces the
    /// current authors.
    pub fn apply_preset(&mut self, preset: &Preset) -> Result<(), FormError> {
        for (id, value) in &preset.fields {
            validate(lookup(id)?, value)?;
        }
        for (id, value) in &preset.fields {
            self.set_field(id, value.clone())?;
        }
        if !preset.authors.is_empty() {
            self.authors = AuthorSlots::from_names(preset.authors.iter().cloned());
        }
        Ok(())
    }

    /// Fields that differ from their defaults, plus the author list.
    pub fn to_preset(&self) -> Preset {
        let fields = FIELDS
            .iter()
            .filter_map(|spec| {
                let value = self.values.get(spec.id)?;
                (*value != FieldValue::from(spec.default))
                    .then(|| (spec.id.to_string(), value.clone()))
            })
            .collect();
        Preset {
            fields,
            authors: self.authors.authors(),
        }
    }

    /// Freeze the current values into a snapshot for emission.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            title: self.text("title").to_string(),
            subtitle: self.text("subtitle").to_string(),
            date: self.text("date").to_string(),
            authors: self.authors.authors(),

            documentclass: self.text("documentclass").to_string(),
            landscape: self.checked("landscape"),
            twocolumn: self.checked("twocolumn"),
            oneside: self.checked("oneside"),
            openany: self.checked("openany"),

            toc: self.checked("toc"),
            toc_title: self.text("toc-title").to_string(),
            toc_depth: self.text("toc-depth").to_string(),

            papersize: self.text("papersize").to_string(),
            fontsize: self.text("fontsize").to_string(),
            margin: self.text("margin").to_string(),

            links_as_notes: self.checked("links-as-notes"),
            style: StyleFlag::ALL
                .into_iter()
                .filter(|flag| self.checked(flag.field_id()))
                .collect(),

            fonts: FontSelection {
                main: self.text("mainfont").to_string(),
                sans: self.text("sansfont").to_string(),
                mono: self.text("monofont").to_string(),
            },
            fallback_standard: self.checked("fallback-standard"),
            fallback_cjk: self.checked("fallback-cjk"),
        }
    }
}

fn lookup(id: &str) -> Result<&'static FieldSpec, FormError> {
    field_spec(id).ok_or_else(|| FormError::UnknownField(id.to_string()))
}
