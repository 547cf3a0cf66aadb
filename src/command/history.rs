use crate::buffer::Image;
use crate::state::ActiveTarget;

/// A snapshot taken immediately before a mutating operation.
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    /// Taken before a crop: the source it was cut from and the selection it replaced
    Crop {
        source: Image,
        replaced_selection: Option<Image>,
    },
    /// Taken before a filter: the buffer the filter overwrote
    Filter {
        target: ActiveTarget,
        snapshot: Image,
    },
}

impl HistoryEntry {
    /// The buffer that was active when the entry was pushed
    pub fn target(&self) -> ActiveTarget {
        match self {
            HistoryEntry::Crop { .. } => ActiveTarget::Source,
            HistoryEntry::Filter { target, .. } => *target,
        }
    }

    pub fn into_snapshot(self) -> Image {
        match self {
            HistoryEntry::Crop { source, .. } => source,
            HistoryEntry::Filter { snapshot, .. } => snapshot,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryEntry::Crop { .. } => "Crop",
            HistoryEntry::Filter { target: ActiveTarget::Selection, .. } => "Filter crop",
            HistoryEntry::Filter { .. } => "Filter image",
        }
    }
}

/// Unbounded stack of snapshots for undo
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self { undo_stack: Vec::new() }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
    }

    /// Removes and returns the most recent entry
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.undo_stack.pop()
    }

    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.undo_stack.last()
    }

    /// Returns true if there are entries that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.undo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn blank(width: u32) -> Image {
        Image::new(RgbImage::new(width, 1))
    }

    #[test]
    fn test_lifo_order() {
        let mut history = History::new();
        history.push(HistoryEntry::Filter { target: ActiveTarget::Source, snapshot: blank(1) });
        history.push(HistoryEntry::Crop { source: blank(2), replaced_selection: None });

        assert_eq!(history.len(), 2);
        assert_eq!(history.peek().map(|e| e.label()), Some("Crop"));
        assert_eq!(history.pop().map(|e| e.into_snapshot().width()), Some(2));
        assert_eq!(history.pop().map(|e| e.into_snapshot().width()), Some(1));
        assert!(history.pop().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_entry_targets() {
        let crop = HistoryEntry::Crop { source: blank(3), replaced_selection: Some(blank(1)) };
        assert_eq!(crop.target(), ActiveTarget::Source);
        assert_eq!(crop.into_snapshot().width(), 3);

        let filter = HistoryEntry::Filter { target: ActiveTarget::Selection, snapshot: blank(4) };
        assert_eq!(filter.target(), ActiveTarget::Selection);
        assert_eq!(filter.label(), "Filter crop");
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.push(HistoryEntry::Filter { target: ActiveTarget::Source, snapshot: blank(1) });
        history.clear();
        assert!(history.is_empty());
        assert!(history.entries().is_empty());
    }
}
