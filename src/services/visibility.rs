use crate::models::{Condition, Snapshot};

/// Controls that are only shown while their condition holds.
///
/// Hidden controls keep their values; the emitter applies the same
/// conditions on its own so a hidden value never leaks into the output.
pub const VISIBILITY_RULES: &[(&str, Condition)] = &[
    ("oneside", Condition::BookClass),
    ("openany", Condition::BookClass),
    ("toc-title", Condition::TocEnabled),
    ("toc-depth", Condition::TocEnabled),
    ("toc-newpage", Condition::TocEnabled),
    ("toc-twocolumn", Condition::TwoColumn),
    ("column-rule", Condition::TwoColumn),
];

/// Visibility of every conditional control, in table order.
pub fn visibility(snapshot: &Snapshot) -> Vec<(&'static str, bool)> {
    VISIBILITY_RULES
        .iter()
        .map(|(element, condition)| (*element, condition.holds(snapshot)))
        .collect()
}

/// Whether a control is shown. Controls without a rule are always shown.
pub fn is_visible(element: &str, snapshot: &Snapshot) -> bool {
    VISIBILITY_RULES
        .iter()
        .find(|(id, _)| *id == element)
        .is_none_or(|(_, condition)| condition.holds(snapshot))
}
