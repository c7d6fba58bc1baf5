use fileshare_core::db::migrations::DEFAULT_CATEGORY_IDS;
use fileshare_core::db::open_db_in_memory;
use fileshare_core::{
    filter_documents, Document, DocumentDraft, DocumentQuery, DocumentQueryView,
    DocumentService, SqliteDocumentRepository,
};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

fn identity() -> Uuid {
    Uuid::parse_str(DEFAULT_CATEGORY_IDS[0]).unwrap()
}

fn finance() -> Uuid {
    Uuid::parse_str(DEFAULT_CATEGORY_IDS[1]).unwrap()
}

fn document(title: &str, memo: Option<&str>, category_id: Uuid) -> Document {
    let mut document = Document::new(title, category_id, vec![format!("/docs/{title}.jpg")]);
    document.memo = memo.map(str::to_string);
    document
}

fn titles(documents: &[Document]) -> Vec<&str> {
    documents
        .iter()
        .map(|document| document.title.as_str())
        .collect()
}

fn sample() -> Vec<Document> {
    vec![
        document("Passport", Some("renew 2025"), identity()),
        document("Driver license", None, identity()),
        document("Bank statement", Some("passport copy attached"), finance()),
        document("Tax return", Some("2024"), finance()),
    ]
}

#[test]
fn memo_match_is_case_insensitive() {
    let documents = sample();

    let results = filter_documents(&documents, &DocumentQuery::new(None, "RENEW"));

    assert_eq!(titles(&results), vec!["Passport"]);
    let results = filter_documents(&documents, &DocumentQuery::new(None, "visa"));
    assert!(results.is_empty());
}

#[test]
fn title_and_memo_matches_keep_source_order() {
    let documents = sample();

    let results = filter_documents(&documents, &DocumentQuery::new(None, "passport"));

    assert_eq!(titles(&results), vec!["Passport", "Bank statement"]);
}

#[test]
fn category_and_search_are_conjunctive() {
    let documents = sample();

    let results = filter_documents(
        &documents,
        &DocumentQuery::new(Some(finance()), "passport"),
    );
    assert_eq!(titles(&results), vec!["Bank statement"]);

    let results = filter_documents(&documents, &DocumentQuery::new(Some(identity()), "2024"));
    assert!(results.is_empty());
}

#[test]
fn empty_search_and_no_category_returns_everything() {
    let documents = sample();

    let results = filter_documents(&documents, &DocumentQuery::default());

    assert_eq!(results, documents);
}

#[test]
fn view_recomputes_on_each_input_change() {
    let mut view = DocumentQueryView::new(sample());
    let published = Rc::new(RefCell::new(Vec::<usize>::new()));
    let sink = Rc::clone(&published);
    view.subscribe(move |results| sink.borrow_mut().push(results.len()));

    view.select_category(Some(identity()));
    view.update_search("license");
    view.clear_search();
    view.select_category(None);

    assert_eq!(*published.borrow(), vec![2, 1, 2, 4]);
    assert_eq!(view.query(), &DocumentQuery::default());
    assert_eq!(view.results().len(), view.source().len());
}

#[test]
fn view_follows_replaced_source_collection() {
    let mut view = DocumentQueryView::new(Vec::new());
    view.update_search("tax");
    assert!(view.results().is_empty());

    view.set_documents(sample());

    assert_eq!(titles(view.results()), vec!["Tax return"]);
}

#[test]
fn service_query_filters_stored_documents() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    for (title, memo, category_id) in [
        ("Passport", "renew 2025", identity()),
        ("Pay slip", "", finance()),
    ] {
        let mut draft = DocumentDraft::new();
        draft.title = title.to_string();
        draft.memo = memo.to_string();
        draft.category_id = Some(category_id);
        draft.add_file(format!("/docs/{title}.jpg"));
        service.save_draft(&draft).unwrap();
    }

    let results = service
        .query_documents(&DocumentQuery::new(Some(identity()), "Renew"))
        .unwrap();

    assert_eq!(titles(&results), vec!["Passport"]);
    let everything = service
        .query_documents(&DocumentQuery::default())
        .unwrap();
    assert_eq!(everything.len(), 2);
}
