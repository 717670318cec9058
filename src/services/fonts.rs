use crate::models::Snapshot;

/// Which Pandoc font variable a font is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSlot {
    Main,
    Sans,
    Mono,
}

impl FontSlot {
    pub const ALL: [FontSlot; 3] = [FontSlot::Main, FontSlot::Sans, FontSlot::Mono];

    /// Prefix of the Pandoc variables (`mainfont`, `mainfontfallback`, ...)
    pub fn key(self) -> &'static str {
        match self {
            FontSlot::Main => "main",
            FontSlot::Sans => "sans",
            FontSlot::Mono => "mono",
        }
    }

    fn selected(self, snapshot: &Snapshot) -> &str {
        match self {
            FontSlot::Main => &snapshot.fonts.main,
            FontSlot::Sans => &snapshot.fonts.sans,
            FontSlot::Mono => &snapshot.fonts.mono,
        }
    }
}

/// Symbol, math and emoji coverage, always in this order.
pub const STANDARD_FALLBACKS: [&str; 4] = [
    "Noto Sans Symbols:mode=harf",
    "Noto Sans Symbols 2:mode=harf",
    "Noto Sans Math:mode=harf",
    "Noto Color Emoji:mode=harf",
];

pub const CJK_SERIF_FALLBACK: &str = "Noto Serif CJK SC:mode=harf";
pub const CJK_SANS_FALLBACK: &str = "Noto Sans CJK SC:mode=harf";

/// Fonts that get the serif CJK fallback; everything else gets the sans one.
pub const SERIF_FONTS: &[&str] = &[
    "Crimson Pro",
    "DejaVu Serif",
    "EB Garamond",
    "Latin Modern Roman",
    "Libertinus Serif",
    "Linux Libertine O",
    "Noto Serif",
    "Source Serif 4",
    "TeX Gyre Pagella",
    "TeX Gyre Termes",
];

/// Monospace font that needs extra fontspec features wherever it is used.
pub const MONO_FALLBACK_FONT: &str = "DejaVu Sans Mono";
pub const MONO_FONT_OPTION: &str = "Scale=MatchLowercase";

pub fn is_serif(font: &str) -> bool {
    SERIF_FONTS.contains(&font)
}

/// A selected font with its computed fallbacks and options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    pub slot: FontSlot,
    pub name: String,
    pub fallbacks: Vec<&'static str>,
    pub options: Vec<&'static str>,
}

impl FontEntry {
    pub fn resolve(slot: FontSlot, name: &str, standard: bool, cjk: bool) -> Self {
        let name = name.trim().to_string();

        let mut fallbacks = Vec::new();
        if standard {
            fallbacks.extend(STANDARD_FALLBACKS);
        }
        if cjk {
            fallbacks.push(if is_serif(&name) {
                CJK_SERIF_FALLBACK
            } else {
                CJK_SANS_FALLBACK
            });
        }

        // Keyed on the font name, not the slot it was picked for
        let options = if name == MONO_FALLBACK_FONT {
            vec![MONO_FONT_OPTION]
        } else {
            Vec::new()
        };

        Self {
            slot,
            name,
            fallbacks,
            options,
        }
    }
}

/// Entries for every slot with a selected font, in main/sans/mono order.
pub fn font_entries(snapshot: &Snapshot) -> Vec<FontEntry> {
    FontSlot::ALL
        .into_iter()
        .filter(|slot| !slot.selected(snapshot).trim().is_empty())
        .map(|slot| {
            FontEntry::resolve(
                slot,
                slot.selected(snapshot),
                snapshot.fallback_standard,
                snapshot.fallback_cjk,
            )
        })
        .collect()
}
