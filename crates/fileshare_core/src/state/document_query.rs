//! Filtered, searchable projection over the document collection.
//!
//! # Responsibility
//! - Own the main screen's filter inputs: selected category and search text.
//! - Recompute the visible document sequence whenever an input changes.
//!
//! # Invariants
//! - Results keep the source collection order.
//! - Category filter and search are applied conjunctively.
//! - Search is a case-insensitive substring match on title or memo; an empty
//!   search matches everything.

use crate::model::category::CategoryId;
use crate::model::document::Document;
use crate::state::signal::{Signal, SubscriptionId};
use log::debug;

/// Filter inputs for the document list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    /// `None` means all categories.
    pub category_id: Option<CategoryId>,
    pub search: String,
}

impl DocumentQuery {
    pub fn new(category_id: Option<CategoryId>, search: impl Into<String>) -> Self {
        Self {
            category_id,
            search: search.into(),
        }
    }

    /// Returns whether `document` passes both predicates.
    pub fn matches(&self, document: &Document) -> bool {
        self.matches_category(document) && matches_search(document, &self.search.to_lowercase())
    }

    fn matches_category(&self, document: &Document) -> bool {
        self.category_id
            .map_or(true, |category_id| document.category_id == category_id)
    }
}

fn matches_search(document: &Document, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    document.title.to_lowercase().contains(needle_lower)
        || document
            .memo
            .as_deref()
            .is_some_and(|memo| memo.to_lowercase().contains(needle_lower))
}

/// Applies `query` to `documents`, preserving order.
pub fn filter_documents(documents: &[Document], query: &DocumentQuery) -> Vec<Document> {
    let needle = query.search.to_lowercase();
    documents
        .iter()
        .filter(|document| query.matches_category(document) && matches_search(document, &needle))
        .cloned()
        .collect()
}

/// Live document list view for the main screen.
#[derive(Debug)]
pub struct DocumentQueryView {
    source: Vec<Document>,
    query: DocumentQuery,
    results: Signal<Vec<Document>>,
}

impl DocumentQueryView {
    /// Creates a view showing every document.
    pub fn new(documents: Vec<Document>) -> Self {
        let query = DocumentQuery::default();
        let results = Signal::new(filter_documents(&documents, &query));
        Self {
            source: documents,
            query,
            results,
        }
    }

    /// Current filter inputs.
    pub fn query(&self) -> &DocumentQuery {
        &self.query
    }

    /// Documents currently visible.
    pub fn results(&self) -> &[Document] {
        self.results.get()
    }

    /// Full unfiltered snapshot.
    pub fn source(&self) -> &[Document] {
        &self.source
    }

    /// Registers a listener notified after every recomputation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Vec<Document>) + 'static) -> SubscriptionId {
        self.results.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.results.unsubscribe(id)
    }

    /// Replaces the source snapshot, e.g. after a store change.
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.source = documents;
        self.recompute();
    }

    /// Selects one category, or all with `None`.
    pub fn select_category(&mut self, category_id: Option<CategoryId>) {
        self.query.category_id = category_id;
        self.recompute();
    }

    pub fn update_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.recompute();
    }

    pub fn clear_search(&mut self) {
        self.update_search(String::new());
    }

    fn recompute(&mut self) {
        let filtered = filter_documents(&self.source, &self.query);
        debug!(
            "event=document_query module=state status=ok total={} visible={} category_filter={} search_len={}",
            self.source.len(),
            filtered.len(),
            self.query.category_id.is_some(),
            self.query.search.chars().count()
        );
        self.results.set(filtered);
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_documents, DocumentQuery, DocumentQueryView};
    use crate::model::document::Document;
    use std::cell::RefCell;
    use std::rc::Rc;
    use uuid::Uuid;

    fn document(title: &str, memo: Option<&str>, category: Uuid) -> Document {
        let mut document = Document::new(title, category, vec![format!("/files/{title}.jpg")]);
        document.memo = memo.map(str::to_string);
        document
    }

    #[test]
    fn memo_absent_only_matches_on_title() {
        let category = Uuid::new_v4();
        let documents = vec![document("Lease", None, category)];
        assert_eq!(
            filter_documents(&documents, &DocumentQuery::new(None, "LEA")).len(),
            1
        );
        assert!(filter_documents(&documents, &DocumentQuery::new(None, "renew")).is_empty());
    }

    #[test]
    fn non_ascii_search_is_case_insensitive() {
        let category = Uuid::new_v4();
        let documents = vec![document("Ärztebrief", Some("Über"), category)];
        assert_eq!(
            filter_documents(&documents, &DocumentQuery::new(None, "ärzte")).len(),
            1
        );
        assert_eq!(
            filter_documents(&documents, &DocumentQuery::new(None, "über")).len(),
            1
        );
    }

    #[test]
    fn every_input_change_publishes_once() {
        let category = Uuid::new_v4();
        let mut view = DocumentQueryView::new(vec![document("Passport", None, category)]);
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&published);
        view.subscribe(move |results| sink.borrow_mut().push(results.len()));

        view.update_search("visa");
        view.clear_search();
        view.select_category(Some(Uuid::new_v4()));
        view.set_documents(Vec::new());

        assert_eq!(*published.borrow(), vec![0, 1, 0, 0]);
    }
}
