use crate::models::fields::FormError;

/// Editable author inputs.
///
/// There is always at least one slot. Typing into the last slot appends a new
/// blank slot, and a blank slot that is not the last one disappears when it
/// loses focus. The emitter only ever sees [`authors()`](Self::authors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSlots {
    slots: Vec<String>,
}

impl Default for AuthorSlots {
    fn default() -> Self {
        Self {
            slots: vec![String::new()],
        }
    }
}

impl AuthorSlots {
    /// Build slots from a list of names, followed by the trailing blank slot.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty())
            .collect();
        slots.push(String::new());
        Self { slots }
    }

    /// Raw slot contents, including blanks
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Number of input slots, blanks included. Never zero.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Index of the trailing slot that new names are typed into
    pub fn last_index(&self) -> usize {
        self.slots.len() - 1
    }

    /// True when every slot is blank.
    pub fn has_no_authors(&self) -> bool {
        self.authors().is_empty()
    }

    /// Non-empty trimmed names in input order.
    pub fn authors(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.trim())
            .filter(|slot| !slot.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Replace the contents of slot `index`.
    pub fn edit(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FormError::AuthorSlotOutOfRange { index, len })?;
        *slot = value.into();

        let is_last = index + 1 == len;
        if is_last && !self.slots[index].trim().is_empty() {
            self.slots.push(String::new());
        }
        Ok(())
    }

    /// Slot `index` lost focus.
    ///
    /// Returns `true` if the slot was removed.
    pub fn blur(&mut self, index: usize) -> Result<bool, FormError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(FormError::AuthorSlotOutOfRange { index, len })?;

        if index + 1 < len && slot.trim().is_empty() {
            self.slots.remove(index);
            return Ok(true);
        }
        Ok(false)
    }

    /// Collapse to a single empty slot.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.slots.push(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_one_blank_slot() {
        let slots = AuthorSlots::default();
        assert_eq!(slots.slots(), &[String::new()]);
        assert!(slots.authors().is_empty());
        assert!(slots.has_no_authors());
        assert_eq!(slots.slot_count(), 1);
        assert_eq!(slots.last_index(), 0);
    }

    #[test]
    fn test_blank_slots_are_not_authors() {
        let mut slots = AuthorSlots::default();
        slots.edit(0, "   ").unwrap();
        assert!(slots.has_no_authors());
        assert_eq!(slots.slot_count(), 1);

        slots.edit(0, "Ann").unwrap();
        assert!(!slots.has_no_authors());
        assert_eq!(slots.last_index(), 1);
    }

    #[test]
    fn test_typing_in_last_slot_grows_list() {
        let mut slots = AuthorSlots::default();
        slots.edit(0, "J").unwrap();
        assert_eq!(slots.slot_count(), 2);

        // Further typing in the same slot does not add more slots
        slots.edit(0, "Jane Doe").unwrap();
        assert_eq!(slots.slot_count(), 2);
        assert_eq!(slots.authors(), vec!["Jane Doe"]);
    }

    #[test]
    fn test_whitespace_does_not_grow_list() {
        let mut slots = AuthorSlots::default();
        slots.edit(0, "   ").unwrap();
        assert_eq!(slots.slot_count(), 1);
    }

    #[test]
    fn test_blank_middle_slot_removed_on_blur() {
        let mut slots = AuthorSlots::from_names(["B", "A"]);
        slots.edit(0, "").unwrap();
        assert_eq!(slots.slot_count(), 3);

        assert!(slots.blur(0).unwrap());
        assert_eq!(slots.slots(), &["A".to_string(), String::new()]);
    }

    #[test]
    fn test_last_blank_slot_survives_blur() {
        let mut slots = AuthorSlots::from_names(["A"]);
        assert!(!slots.blur(1).unwrap());
        assert_eq!(slots.slot_count(), 2);
    }

    #[test]
    fn test_authors_trimmed_in_order_with_duplicates() {
        let slots = AuthorSlots::from_names([" B ", "A", "B"]);
        assert_eq!(slots.authors(), vec!["B", "A", "B"]);
    }

    #[test]
    fn test_out_of_range() {
        let mut slots = AuthorSlots::default();
        assert_eq!(
            slots.edit(3, "x"),
            Err(FormError::AuthorSlotOutOfRange { index: 3, len: 1 })
        );
        assert!(slots.blur(1).is_err());
    }

    #[test]
    fn test_reset() {
        let mut slots = AuthorSlots::from_names(["A", "B"]);
        slots.reset();
        assert_eq!(slots, AuthorSlots::default());
    }
}
