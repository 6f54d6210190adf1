//! Ordered selection of row ids.

/// Checked rows in the order they were clicked.
///
/// Toggling removes an id in place (keeping the others' order) or appends
/// it, so select-then-deselect restores the previous selection exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    ids: Vec<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { ids: Vec::new() }
    }
}

impl<T: Clone + PartialEq> Selection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &T) -> bool {
        self.ids.contains(id)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.ids
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.ids.clone()
    }

    /// Flip `id`. Returns true when it is selected afterwards.
    pub fn toggle(&mut self, id: T) -> bool {
        match self.ids.iter().position(|s| *s == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        }
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set_all(&mut self, ids: impl IntoIterator<Item = T>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.ids.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_appends_and_removes() {
        let mut selection = Selection::new();
        assert!(selection.toggle(3));
        assert!(selection.toggle(1));
        assert_eq!(selection.as_slice(), &[3, 1]);

        assert!(!selection.toggle(3));
        assert_eq!(selection.as_slice(), &[1]);
    }

    #[test]
    fn test_select_then_deselect_restores_prior_value() {
        let mut selection = Selection::new();
        selection.set_all([4, 8, 15]);
        let before = selection.clone();

        selection.toggle(16);
        selection.toggle(16);
        assert_eq!(selection, before);

        // Removing from the middle keeps the neighbours in order
        selection.toggle(8);
        assert_eq!(selection.as_slice(), &[4, 15]);
        selection.toggle(8);
        assert_eq!(selection.as_slice(), &[4, 15, 8]);
    }

    #[test]
    fn test_set_all_drops_duplicates() {
        let mut selection = Selection::new();
        selection.set_all([2, 2, 5]);
        assert_eq!(selection.len(), 2);
        assert!(selection.contains(&5));
    }
}
