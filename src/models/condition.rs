use crate::models::snapshot::Snapshot;

/// Cross-field rule evaluated against a snapshot.
///
/// Used both for extra activation conditions on header-includes and for
/// deciding which controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Document class is "book"
    BookClass,
    /// Table of contents is enabled
    TocEnabled,
    /// The twocolumn class option is set
    TwoColumn,
}

impl Condition {
    pub fn holds(self, snapshot: &Snapshot) -> bool {
        match self {
            Condition::BookClass => snapshot.is_book(),
            Condition::TocEnabled => snapshot.toc,
            Condition::TwoColumn => snapshot.twocolumn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions() {
        let mut snapshot = Snapshot::default();
        snapshot.toc = false;
        assert!(!Condition::BookClass.holds(&snapshot));
        assert!(!Condition::TocEnabled.holds(&snapshot));
        assert!(!Condition::TwoColumn.holds(&snapshot));

        snapshot.documentclass = "book".into();
        snapshot.toc = true;
        snapshot.twocolumn = true;
        assert!(Condition::BookClass.holds(&snapshot));
        assert!(Condition::TocEnabled.holds(&snapshot));
        assert!(Condition::TwoColumn.holds(&snapshot));
    }
}
