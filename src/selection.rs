//! Per-label selection flags.

/// One flag per stored label, set by double clicking.
///
/// The mask always has the same length as the store it shadows. Structural
/// changes reset it; sorting permutes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMask {
    flags: Vec<bool>,
}

impl SelectionMask {
    /// All-false mask of the given length.
    pub fn cleared(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Reset to all-false with a new length.
    pub fn reset(&mut self, len: usize) {
        self.flags.clear();
        self.flags.resize(len, false);
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check whether the mask has no flags.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag at `index`; out-of-range indices read as unselected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Flip the flag at `index`. Returns the new value.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                *flag
            }
            None => false,
        }
    }

    /// Check whether any label is selected.
    pub fn any(&self) -> bool {
        self.flags.iter().any(|flag| *flag)
    }

    /// Number of selected labels.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|flag| **flag).count()
    }

    /// Indices of selected labels.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(index, flag)| flag.then_some(index))
    }

    /// Raw flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    /// Reorder so that new position `i` holds the flag previously at `order[i]`.
    pub fn permute(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.flags.len());
        self.flags = order.iter().map(|&index| self.is_selected(index)).collect();
    }
}
