use regex::Regex;
use std::sync::LazyLock;

use crate::models::Snapshot;
use crate::services::fonts::font_entries;
use crate::services::header_includes::active_fragments;

/// Document separator that opens and closes the front matter
pub const SEPARATOR: &str = "---";

/// Appended after the closing separator: two blank lines follow it.
pub const TRAILER: &str = "\n\n\n";

/// Class options that only apply to the book class
const BOOK_ONLY_OPTIONS: [&str; 2] = ["oneside", "openany"];

static TOC_DEPTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("toc-depth pattern is valid"));

/// Geometry items that can stay unquoted
static PLAIN_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9.,=+-]+$").expect("plain scalar pattern is valid"));

/// Escape a value for a YAML single-quoted scalar.
pub fn escape_single_quoted(value: &str) -> String {
    value.replace('\'', "''")
}

/// Characters a single-quoted scalar cannot carry: line breaks fold into
/// spaces and the rest are not printable YAML.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{FEFF}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Escape a value for a YAML double-quoted scalar.
pub fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if needs_escape(c) => escaped.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Quote a value so it reads back unchanged. Single quotes unless the value
/// holds a line break or another non-printable character.
fn quoted(value: &str) -> String {
    if value.chars().any(needs_escape) {
        format!("\"{}\"", escape_double_quoted(value))
    } else {
        format!("'{}'", escape_single_quoted(value))
    }
}

fn plain_or_quoted(value: &str) -> String {
    if PLAIN_SAFE.is_match(value) {
        value.to_string()
    } else {
        quoted(value)
    }
}

fn push_sequence<I, S>(lines: &mut Vec<String>, key: &str, items: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.push(format!("{}:", key));
    for item in items {
        lines.push(format!("- {}", item.as_ref()));
    }
}

/// Class option tokens in sorted order, with book-only options dropped for
/// any other class.
pub fn class_options(snapshot: &Snapshot) -> Vec<&'static str> {
    let flags = [
        ("landscape", snapshot.landscape),
        ("twocolumn", snapshot.twocolumn),
        ("oneside", snapshot.oneside),
        ("openany", snapshot.openany),
    ];
    let is_book = snapshot.is_book();

    let mut options: Vec<&'static str> = flags
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(token, _)| token)
        .filter(|token| is_book || !BOOK_ONLY_OPTIONS.contains(token))
        .collect();
    options.sort_unstable();
    options
}

/// Geometry flags in sorted order.
pub fn geometry(snapshot: &Snapshot) -> Vec<String> {
    let mut flags = Vec::with_capacity(2);
    let margin = snapshot.margin.trim();
    if !margin.is_empty() {
        flags.push(format!("margin={}", margin));
    }
    flags.push(if snapshot.is_book() {
        "includeheadfoot".to_string()
    } else {
        "includefoot".to_string()
    });
    flags.sort();
    flags
}

fn emit_metadata(snapshot: &Snapshot, lines: &mut Vec<String>) {
    for (key, value) in [
        ("title", &snapshot.title),
        ("subtitle", &snapshot.subtitle),
        ("date", &snapshot.date),
    ] {
        let value = value.trim();
        if !value.is_empty() {
            lines.push(format!("{}: {}", key, quoted(value)));
        }
    }

    let authors: Vec<&str> = snapshot
        .authors
        .iter()
        .map(|author| author.trim())
        .filter(|author| !author.is_empty())
        .collect();
    match authors.as_slice() {
        [] => {}
        [single] => lines.push(format!("author: {}", quoted(single))),
        many => push_sequence(lines, "author", many.iter().map(|author| quoted(author))),
    }
}

fn emit_toc(snapshot: &Snapshot, lines: &mut Vec<String>) {
    if !snapshot.toc {
        return;
    }
    lines.push("toc: true".to_string());

    let title = snapshot.toc_title.trim();
    if !title.is_empty() {
        lines.push(format!("toc-title: {}", quoted(title)));
    }

    let depth = snapshot.toc_depth.trim();
    if TOC_DEPTH.is_match(depth) {
        lines.push(format!("toc-depth: {}", depth));
    }
}

fn emit_fonts(snapshot: &Snapshot, lines: &mut Vec<String>) {
    for entry in font_entries(snapshot) {
        let key = entry.slot.key();
        lines.push(format!("{}font: {}", key, quoted(&entry.name)));
        if !entry.fallbacks.is_empty() {
            push_sequence(
                lines,
                &format!("{}fontfallback", key),
                entry.fallbacks.iter().map(|font| quoted(font)),
            );
        }
        if !entry.options.is_empty() {
            push_sequence(
                lines,
                &format!("{}fontoptions", key),
                entry.options.iter().map(|option| quoted(option)),
            );
        }
    }
}

/// Render a snapshot as a YAML front-matter block.
///
/// The output is a pure function of `snapshot`: the same snapshot always
/// produces byte-identical text. Bad input is dropped rather than rejected
/// (blank text is omitted, non-numeric TOC depth is skipped, blank selects
/// fall back to their defaults). The result always ends with the closing
/// separator followed by exactly three newlines.
pub fn emit(snapshot: &Snapshot) -> String {
    let mut lines: Vec<String> = vec![SEPARATOR.to_string()];

    emit_metadata(snapshot, &mut lines);

    lines.push(format!("documentclass: {}", snapshot.documentclass()));
    let options = class_options(snapshot);
    if !options.is_empty() {
        push_sequence(&mut lines, "classoption", options);
    }

    emit_toc(snapshot, &mut lines);

    lines.push(format!("papersize: {}", snapshot.papersize()));
    lines.push(format!("fontsize: {}", snapshot.fontsize()));
    push_sequence(
        &mut lines,
        "geometry",
        geometry(snapshot).iter().map(|flag| plain_or_quoted(flag)),
    );

    if snapshot.links_as_notes {
        lines.push("links-as-notes: true".to_string());
    }

    let fragments = active_fragments(snapshot);
    if !fragments.is_empty() {
        lines.push("header-includes:".to_string());
        lines.extend(fragments.into_iter().map(str::to_string));
    }

    emit_fonts(snapshot, &mut lines);

    lines.push(SEPARATOR.to_string());

    let mut yaml = lines.join("\n");
    yaml.push_str(TRAILER);
    yaml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StyleFlag;

    #[test]
    fn test_default_output() {
        let yaml = emit(&Snapshot::default());
        assert_eq!(
            yaml,
            "---\n\
             documentclass: article\n\
             toc: true\n\
             papersize: a4\n\
             fontsize: 12pt\n\
             geometry:\n\
             - includefoot\n\
             - margin=1.5cm\n\
             ---\n\n\n"
        );
    }

    #[test]
    fn test_escape_single_quoted() {
        assert_eq!(escape_single_quoted("O'Brien's"), "O''Brien''s");
        assert_eq!(escape_single_quoted("plain"), "plain");
    }

    #[test]
    fn test_escape_double_quoted() {
        assert_eq!(escape_double_quoted("a\nb\r\tc"), "a\\nb\\r\\tc");
        assert_eq!(escape_double_quoted(r#"say "\o/""#), r#"say \"\\o/\""#);
        assert_eq!(escape_double_quoted("x\u{2028}y\u{7}"), "x\\u2028y\\u0007");
    }

    #[test]
    fn test_line_breaks_switch_to_double_quotes() {
        let snapshot = Snapshot {
            title: "Part one\n---\nabstract: x".into(),
            authors: vec!["Ann\r\nLee".into(), "Bo".into()],
            ..Snapshot::default()
        };
        let yaml = emit(&snapshot);
        assert!(yaml.contains("\ntitle: \"Part one\\n---\\nabstract: x\"\n"));
        assert!(yaml.contains("\n- \"Ann\\r\\nLee\"\n- 'Bo'\n"));
        assert_eq!(yaml.lines().filter(|line| *line == SEPARATOR).count(), 2);
    }

    #[test]
    fn test_unusual_margin_is_quoted() {
        let snapshot = Snapshot {
            margin: "1cm # note".into(),
            ..Snapshot::default()
        };
        assert!(emit(&snapshot).contains("geometry:\n- includefoot\n- 'margin=1cm # note'\n"));

        let broken = Snapshot {
            margin: "1cm\n---".into(),
            ..Snapshot::default()
        };
        assert!(emit(&broken).contains("- \"margin=1cm\\n---\"\n"));
    }

    #[test]
    fn test_metadata_is_trimmed_and_quoted() {
        let snapshot = Snapshot {
            title: "  A Study  ".into(),
            subtitle: "   ".into(),
            date: "2024-01-31".into(),
            ..Snapshot::default()
        };
        let yaml = emit(&snapshot);
        assert!(yaml.contains("\ntitle: 'A Study'\n"));
        assert!(yaml.contains("\ndate: '2024-01-31'\n"));
        assert!(!yaml.contains("subtitle"));
    }

    #[test]
    fn test_class_options_sorted() {
        let snapshot = Snapshot {
            twocolumn: true,
            landscape: true,
            ..Snapshot::default()
        };
        assert_eq!(class_options(&snapshot), vec!["landscape", "twocolumn"]);
    }

    #[test]
    fn test_geometry_without_margin() {
        let snapshot = Snapshot {
            margin: " ".into(),
            documentclass: "book".into(),
            ..Snapshot::default()
        };
        assert_eq!(geometry(&snapshot), vec!["includeheadfoot"]);
    }

    #[test]
    fn test_toc_title_and_depth() {
        let snapshot = Snapshot {
            toc_title: "Contents".into(),
            toc_depth: " 2 ".into(),
            ..Snapshot::default()
        };
        let yaml = emit(&snapshot);
        assert!(yaml.contains("toc: true\ntoc-title: 'Contents'\ntoc-depth: 2\npapersize"));
    }

    #[test]
    fn test_header_includes_block() {
        let mut snapshot = Snapshot {
            links_as_notes: true,
            ..Snapshot::default()
        };
        snapshot.style.insert(StyleFlag::Microtype);
        snapshot.style.insert(StyleFlag::Booktabs);
        let yaml = emit(&snapshot);
        assert!(yaml.contains(
            "links-as-notes: true\nheader-includes:\n- \\usepackage{booktabs}\n- \\usepackage{microtype}\n---"
        ));
    }

    #[test]
    fn test_font_block() {
        let mut snapshot = Snapshot {
            fallback_cjk: true,
            ..Snapshot::default()
        };
        snapshot.fonts.main = "EB Garamond".into();
        snapshot.fonts.mono = "DejaVu Sans Mono".into();
        let yaml = emit(&snapshot);
        assert!(yaml.ends_with(
            "mainfont: 'EB Garamond'\n\
             mainfontfallback:\n\
             - 'Noto Serif CJK SC:mode=harf'\n\
             monofont: 'DejaVu Sans Mono'\n\
             monofontfallback:\n\
             - 'Noto Sans CJK SC:mode=harf'\n\
             monofontoptions:\n\
             - 'Scale=MatchLowercase'\n\
             ---\n\n\n"
        ));
    }
}
