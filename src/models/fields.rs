use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// What kind of control a field is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text input
    Text,
    /// Drop-down with a fixed list of allowed values
    Select(&'static [&'static str]),
    /// On/off toggle
    Checkbox,
}

impl FieldKind {
    /// Short name used in listings and error messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Select(_) => "select",
            FieldKind::Checkbox => "checkbox",
        }
    }
}

/// Declared default for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Text(&'static str),
    Checked(bool),
}

/// One row of the field registry.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    /// LaTeX class option this checkbox contributes, if any
    pub class_option: Option<&'static str>,
}

const fn text(id: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Text,
        default: FieldDefault::Text(default),
        class_option: None,
    }
}

const fn select(
    id: &'static str,
    options: &'static [&'static str],
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Select(options),
        default: FieldDefault::Text(default),
        class_option: None,
    }
}

const fn checkbox(id: &'static str, default: bool) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Checkbox,
        default: FieldDefault::Checked(default),
        class_option: None,
    }
}

const fn class_option(id: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Checkbox,
        default: FieldDefault::Checked(false),
        class_option: Some(id),
    }
}

pub const DOCUMENT_CLASSES: &[&str] = &["article", "report", "book"];
pub const PAPER_SIZES: &[&str] = &["a4", "a5", "b5", "letter", "legal"];
pub const FONT_SIZES: &[&str] = &["10pt", "11pt", "12pt"];

/// Every control on the form, in display order.
///
/// This table is the single source of truth for which fields exist and what
/// they reset to. Authors are not listed here; they live in
/// [`AuthorSlots`](crate::models::AuthorSlots).
pub const FIELDS: &[FieldSpec] = &[
    // Metadata
    text("title", ""),
    text("subtitle", ""),
    text("date", ""),
    // Document class
    select("documentclass", DOCUMENT_CLASSES, "article"),
    class_option("landscape"),
    class_option("twocolumn"),
    class_option("oneside"),
    class_option("openany"),
    // Table of contents
    checkbox("toc", true),
    text("toc-title", ""),
    text("toc-depth", ""),
    // Page geometry
    select("papersize", PAPER_SIZES, "a4"),
    select("fontsize", FONT_SIZES, "12pt"),
    text("margin", "1.5cm"),
    // Links
    checkbox("links-as-notes", false),
    // Header-include style flags
    checkbox("microtype", false),
    checkbox("parskip", false),
    checkbox("ragged-right", false),
    checkbox("fancy-headers", false),
    checkbox("sans-headings", false),
    checkbox("line-numbers", false),
    checkbox("booktabs", false),
    checkbox("float-here", false),
    checkbox("no-page-numbers", false),
    checkbox("toc-newpage", false),
    checkbox("toc-twocolumn", false),
    checkbox("column-rule", false),
    // Fonts
    text("mainfont", ""),
    text("sansfont", ""),
    text("monofont", ""),
    checkbox("fallback-standard", false),
    checkbox("fallback-cjk", false),
];

/// Look up a field by id.
pub fn field_spec(id: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.id == id)
}

/// Current value of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Checked(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::Checked(_) => None,
        }
    }

    pub fn as_checked(&self) -> Option<bool> {
        match self {
            FieldValue::Checked(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    /// Parse a raw command-line value according to the field's kind.
    pub fn parse_for(spec: &FieldSpec, raw: &str) -> Result<Self, FormError> {
        match spec.kind {
            FieldKind::Checkbox => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(FieldValue::Checked(true)),
                "false" | "off" | "no" | "0" => Ok(FieldValue::Checked(false)),
                _ => Err(FormError::InvalidCheckbox {
                    field: spec.id.to_string(),
                    value: raw.to_string(),
                }),
            },
            FieldKind::Text | FieldKind::Select(_) => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

// Preset files are hand-edited, so `toc-depth: 3` must load as text too.
impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldValueVisitor;

        impl Visitor<'_> for FieldValueVisitor {
            type Value = FieldValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean, string or number")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<FieldValue, E> {
                Ok(FieldValue::Checked(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }
        }

        deserializer.deserialize_any(FieldValueVisitor)
    }
}

impl From<FieldDefault> for FieldValue {
    fn from(default: FieldDefault) -> Self {
        match default {
            FieldDefault::Text(value) => FieldValue::Text(value.to_string()),
            FieldDefault::Checked(value) => FieldValue::Checked(value),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Checked(value) => write!(f, "{}", value),
            FieldValue::Text(value) => write!(f, "{:?}", value),
        }
    }
}

/// Errors raised when editing the form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} is a {expected} field")]
    KindMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("Invalid value {value:?} for {field} (allowed: {allowed})")]
    InvalidOption {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("Invalid checkbox value {value:?} for {field} (use true/false)")]
    InvalidCheckbox { field: String, value: String },

    #[error("Author slot {index} does not exist ({len} slots)")]
    AuthorSlotOutOfRange { index: usize, len: usize },
}

/// Check that `value` is acceptable for `spec`.
///
/// An empty select value is allowed: it stands for "unset" and falls back to
/// the default at emission time.
pub fn validate(spec: &FieldSpec, value: &FieldValue) -> Result<(), FormError> {
    match (spec.kind, value) {
        (FieldKind::Checkbox, FieldValue::Checked(_)) => Ok(()),
        (FieldKind::Text, FieldValue::Text(_)) => Ok(()),
        (FieldKind::Select(options), FieldValue::Text(choice)) => {
            if choice.is_empty() || options.contains(&choice.as_str()) {
                Ok(())
            } else {
                Err(FormError::InvalidOption {
                    field: spec.id.to_string(),
                    value: choice.clone(),
                    allowed: options.join(", "),
                })
            }
        }
        (kind, _) => Err(FormError::KindMismatch {
            field: spec.id.to_string(),
            expected: kind.name(),
        }),
    }
}
