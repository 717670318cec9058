use crate::models::{Condition, Snapshot, StyleFlag};

/// A style flag and the literal YAML sequence item it contributes.
#[derive(Debug, Clone, Copy)]
pub struct HeaderInclude {
    pub flag: StyleFlag,
    /// Pre-baked `header-includes` item, emitted verbatim
    pub fragment: &'static str,
    /// Extra requirement on top of the flag being set
    pub condition: Option<Condition>,
}

impl HeaderInclude {
    pub fn is_active(&self, snapshot: &Snapshot) -> bool {
        snapshot.has_style(self.flag)
            && self
                .condition
                .is_none_or(|condition| condition.holds(snapshot))
    }
}

const fn always(flag: StyleFlag, fragment: &'static str) -> HeaderInclude {
    HeaderInclude {
        flag,
        fragment,
        condition: None,
    }
}

const fn when(flag: StyleFlag, condition: Condition, fragment: &'static str) -> HeaderInclude {
    HeaderInclude {
        flag,
        fragment,
        condition: Some(condition),
    }
}

pub const HEADER_INCLUDES: &[HeaderInclude] = &[
    always(StyleFlag::Microtype, "- \\usepackage{microtype}"),
    always(StyleFlag::Parskip, "- \\usepackage{parskip}"),
    always(
        StyleFlag::RaggedRight,
        "- |\n  \\usepackage{ragged2e}\n  \\RaggedRight",
    ),
    always(
        StyleFlag::FancyHeaders,
        "- |\n  \\usepackage{fancyhdr}\n  \\pagestyle{fancy}\n  \\fancyhf{}\n  \\fancyhead[R]{\\thepage}\n  \\fancyhead[L]{\\leftmark}",
    ),
    always(
        StyleFlag::SansHeadings,
        "- |\n  \\usepackage{sectsty}\n  \\allsectionsfont{\\sffamily}",
    ),
    always(
        StyleFlag::LineNumbers,
        "- |\n  \\usepackage{lineno}\n  \\linenumbers",
    ),
    always(StyleFlag::Booktabs, "- \\usepackage{booktabs}"),
    always(
        StyleFlag::FloatHere,
        "- |\n  \\usepackage{float}\n  \\floatplacement{figure}{H}",
    ),
    always(StyleFlag::NoPageNumbers, "- \\pagenumbering{gobble}"),
    when(
        StyleFlag::TocNewpage,
        Condition::TocEnabled,
        "- |\n  \\let\\oldtableofcontents\\tableofcontents\n  \\renewcommand{\\tableofcontents}{\\oldtableofcontents\\clearpage}",
    ),
    when(
        StyleFlag::TocTwocolumn,
        Condition::TwoColumn,
        "- |\n  \\usepackage{multicol}\n  \\let\\origtableofcontents\\tableofcontents\n  \\renewcommand{\\tableofcontents}{\\onecolumn\\begin{multicols}{2}\\origtableofcontents\\end{multicols}\\twocolumn}",
    ),
    when(
        StyleFlag::ColumnRule,
        Condition::TwoColumn,
        "- \\setlength{\\columnseprule}{0.4pt}",
    ),
];

/// Fragments for every active entry, sorted by fragment text.
pub fn active_fragments(snapshot: &Snapshot) -> Vec<&'static str> {
    let mut fragments: Vec<&'static str> = HEADER_INCLUDES
        .iter()
        .filter(|entry| entry.is_active(snapshot))
        .map(|entry| entry.fragment)
        .collect();
    fragments.sort_unstable();
    fragments
}
