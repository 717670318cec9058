use std::collections::BTreeSet;

use crate::models::form_state::FormState;

/// Independent style toggles that map to header-include fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleFlag {
    Microtype,
    Parskip,
    RaggedRight,
    FancyHeaders,
    SansHeadings,
    LineNumbers,
    Booktabs,
    FloatHere,
    NoPageNumbers,
    TocNewpage,
    TocTwocolumn,
    ColumnRule,
}

impl StyleFlag {
    pub const ALL: [StyleFlag; 12] = [
        StyleFlag::Microtype,
        StyleFlag::Parskip,
        StyleFlag::RaggedRight,
        StyleFlag::FancyHeaders,
        StyleFlag::SansHeadings,
        StyleFlag::LineNumbers,
        StyleFlag::Booktabs,
        StyleFlag::FloatHere,
        StyleFlag::NoPageNumbers,
        StyleFlag::TocNewpage,
        StyleFlag::TocTwocolumn,
        StyleFlag::ColumnRule,
    ];

    /// Checkbox id in the field registry
    pub fn field_id(self) -> &'static str {
        match self {
            StyleFlag::Microtype => "microtype",
            StyleFlag::Parskip => "parskip",
            StyleFlag::RaggedRight => "ragged-right",
            StyleFlag::FancyHeaders => "fancy-headers",
            StyleFlag::SansHeadings => "sans-headings",
            StyleFlag::LineNumbers => "line-numbers",
            StyleFlag::Booktabs => "booktabs",
            StyleFlag::FloatHere => "float-here",
            StyleFlag::NoPageNumbers => "no-page-numbers",
            StyleFlag::TocNewpage => "toc-newpage",
            StyleFlag::TocTwocolumn => "toc-twocolumn",
            StyleFlag::ColumnRule => "column-rule",
        }
    }
}

/// Selected font names, empty when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSelection {
    pub main: String,
    pub sans: String,
    pub mono: String,
}

/// Immutable view of every field value, as consumed by the emitter.
///
/// `Snapshot::default()` is built from the field registry defaults, so a
/// default snapshot and a freshly reset form always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    // Metadata
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub authors: Vec<String>,

    // Document class
    pub documentclass: String,
    pub landscape: bool,
    pub twocolumn: bool,
    pub oneside: bool,
    pub openany: bool,

    // Table of contents
    pub toc: bool,
    pub toc_title: String,
    pub toc_depth: String,

    // Page geometry
    pub papersize: String,
    pub fontsize: String,
    pub margin: String,

    pub links_as_notes: bool,
    pub style: BTreeSet<StyleFlag>,

    // Fonts
    pub fonts: FontSelection,
    pub fallback_standard: bool,
    pub fallback_cjk: bool,
}

pub const DEFAULT_DOCUMENTCLASS: &str = "article";
pub const DEFAULT_PAPERSIZE: &str = "a4";
pub const DEFAULT_FONTSIZE: &str = "12pt";

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

impl Default for Snapshot {
    fn default() -> Self {
        FormState::default().snapshot()
    }
}

impl Snapshot {
    /// Document class with the "article" fallback applied
    pub fn documentclass(&self) -> &str {
        or_default(self.documentclass.trim(), DEFAULT_DOCUMENTCLASS)
    }

    pub fn papersize(&self) -> &str {
        or_default(self.papersize.trim(), DEFAULT_PAPERSIZE)
    }

    pub fn fontsize(&self) -> &str {
        or_default(self.fontsize.trim(), DEFAULT_FONTSIZE)
    }

    pub fn is_book(&self) -> bool {
        self.documentclass() == "book"
    }

    pub fn has_style(&self, flag: StyleFlag) -> bool {
        self.style.contains(&flag)
    }
}
