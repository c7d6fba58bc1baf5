//! Multi-select state for sharing several documents at once.

use crate::model::document::{Document, DocumentId};

/// Selection mode flag plus selected ids in tap order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    active: bool,
    selected: Vec<DocumentId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enter(&mut self) {
        self.active = true;
    }

    /// Leaves selection mode and drops every selected id.
    pub fn exit(&mut self) {
        self.active = false;
        self.selected.clear();
    }

    /// Flips selection of `id`. Ignored outside selection mode.
    pub fn toggle(&mut self, id: DocumentId) {
        if !self.active {
            return;
        }
        if let Some(position) = self.selected.iter().position(|current| *current == id) {
            self.selected.remove(position);
        } else {
            self.selected.push(id);
        }
    }

    pub fn is_selected(&self, id: DocumentId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> &[DocumentId] {
        &self.selected
    }

    /// File paths of selected documents, in display order, flattened.
    pub fn share_paths(&self, documents: &[Document]) -> Vec<String> {
        documents
            .iter()
            .filter(|document| self.is_selected(document.id))
            .flat_map(|document| document.file_paths.iter().cloned())
            .collect()
    }

    /// Collects share paths and leaves selection mode.
    pub fn finish_share(&mut self, documents: &[Document]) -> Vec<String> {
        let paths = self.share_paths(documents);
        self.exit();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionState;
    use crate::model::document::Document;
    use uuid::Uuid;

    #[test]
    fn toggle_is_ignored_until_selection_mode() {
        let mut selection = SelectionState::new();
        let id = Uuid::new_v4();

        selection.toggle(id);
        assert!(!selection.is_selected(id));

        selection.enter();
        selection.toggle(id);
        assert!(selection.is_selected(id));
        selection.toggle(id);
        assert!(!selection.is_selected(id));
    }

    #[test]
    fn share_paths_follow_display_order_and_exit_clears() {
        let category = Uuid::new_v4();
        let first = Document::new(
            "first",
            category,
            vec!["/1a.jpg".to_string(), "/1b.pdf".to_string()],
        );
        let second = Document::new("second", category, vec!["/2.jpg".to_string()]);
        let skipped = Document::new("skipped", category, vec!["/3.jpg".to_string()]);
        let documents = vec![first.clone(), second.clone(), skipped];

        let mut selection = SelectionState::new();
        selection.enter();
        selection.toggle(second.id);
        selection.toggle(first.id);

        let paths = selection.finish_share(&documents);
        assert_eq!(paths, vec!["/1a.jpg", "/1b.pdf", "/2.jpg"]);
        assert!(!selection.is_active());
        assert!(selection.selected().is_empty());
    }
}
