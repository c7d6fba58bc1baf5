use fileshare_core::db::migrations::DEFAULT_CATEGORY_IDS;
use fileshare_core::db::open_db_in_memory;
use fileshare_core::service::document_service::attachment_size_bytes;
use fileshare_core::{
    DocumentDraft, DocumentService, DocumentServiceError, DraftNotReady,
    SqliteDocumentRepository, MIME_IMAGE_JPEG, MIME_PDF,
};
use std::io::Write;
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn other() -> Uuid {
    Uuid::parse_str(DEFAULT_CATEGORY_IDS[2]).unwrap()
}

fn ready_draft(title: &str) -> DocumentDraft {
    let mut draft = DocumentDraft::new();
    draft.title = title.to_string();
    draft.category_id = Some(other());
    draft.add_file(format!("/docs/{title}.jpg"));
    draft
}

#[test]
fn save_new_draft_creates_document_with_derived_fields() {
    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let mut draft = ready_draft("  Lease  ");
    draft.memo = "   ".to_string();

    let saved = service.save_draft(&draft).unwrap();

    assert_eq!(saved.title, "Lease");
    assert_eq!(saved.memo, None);
    assert_eq!(saved.category_id, other());
    assert_eq!(saved.mime_type, MIME_IMAGE_JPEG);
    assert_eq!(saved.share_count, 0);
    assert_eq!(saved.size_bytes, 0);
    assert!(saved.created_at > 0);
    assert_eq!(service.get_document(saved.id).unwrap(), Some(saved));
}

#[test]
fn size_is_summed_from_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("scan-1.pdf");
    let second = dir.path().join("scan-2.pdf");
    std::fs::File::create(&first)
        .unwrap()
        .write_all(&[0_u8; 10])
        .unwrap();
    std::fs::File::create(&second)
        .unwrap()
        .write_all(&[0_u8; 32])
        .unwrap();
    let paths = vec![
        first.to_string_lossy().into_owned(),
        second.to_string_lossy().into_owned(),
    ];
    assert_eq!(attachment_size_bytes(&paths), 42);

    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let mut draft = ready_draft("Contract");
    draft.file_paths = paths;

    let saved = service.save_draft(&draft).unwrap();

    assert_eq!(saved.size_bytes, 42);
    assert_eq!(saved.mime_type, MIME_PDF);
    assert_eq!(saved.file_paths.len(), 2);
}

#[test]
fn unready_draft_is_rejected_before_storage() {
    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let mut draft = ready_draft("Receipt");
    draft.file_paths.clear();

    let err = service.save_draft(&draft).unwrap_err();

    assert!(matches!(
        err,
        DocumentServiceError::NotReady(DraftNotReady::NoFiles)
    ));
    assert!(service.list_documents().unwrap().is_empty());
}

#[test]
fn unknown_category_is_rejected() {
    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let mut draft = ready_draft("Receipt");
    let missing = Uuid::new_v4();
    draft.category_id = Some(missing);

    let err = service.save_draft(&draft).unwrap_err();

    assert!(matches!(err, DocumentServiceError::CategoryNotFound(id) if id == missing));
}

#[test]
fn edit_replaces_fields_but_keeps_history() {
    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let saved = service.save_draft(&ready_draft("Lease")).unwrap();
    service.record_share(saved.id).unwrap();

    let stored = service.get_document(saved.id).unwrap().unwrap();
    let mut draft = DocumentDraft::from_document(&stored);
    draft.title = "Lease 2026".to_string();
    draft.memo = "signed".to_string();
    draft.category_id = Some(Uuid::parse_str(DEFAULT_CATEGORY_IDS[1]).unwrap());
    draft.add_file("/docs/lease-page-2.jpg");
    let updated = service.save_draft(&draft).unwrap();

    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.title, "Lease 2026");
    assert_eq!(updated.memo.as_deref(), Some("signed"));
    assert_eq!(
        updated.file_paths,
        vec!["/docs/Lease.jpg", "/docs/lease-page-2.jpg"]
    );
    assert_eq!(updated.created_at, saved.created_at);
    assert_eq!(updated.share_count, 1);
    assert_eq!(service.list_documents().unwrap().len(), 1);
}

#[test]
fn editing_missing_document_reports_not_found() {
    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let mut draft = ready_draft("Ghost");
    let missing = Uuid::new_v4();
    draft.document_id = Some(missing);

    let err = service.save_draft(&draft).unwrap_err();

    assert!(matches!(err, DocumentServiceError::DocumentNotFound(id) if id == missing));
}

#[test]
fn record_share_increments_by_exactly_one() {
    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let saved = service.save_draft(&ready_draft("Passport")).unwrap();

    assert_eq!(service.record_share(saved.id).unwrap().share_count, 1);
    assert_eq!(service.record_share(saved.id).unwrap().share_count, 2);
    assert!(matches!(
        service.record_share(Uuid::new_v4()),
        Err(DocumentServiceError::DocumentNotFound(_))
    ));
}

#[test]
fn delete_removes_document_and_its_files() {
    let conn = setup();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let saved = service.save_draft(&ready_draft("Receipt")).unwrap();

    service.delete_document(saved.id).unwrap();

    assert_eq!(service.get_document(saved.id).unwrap(), None);
    let file_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM document_files;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(file_rows, 0);
    assert!(matches!(
        service.delete_document(saved.id),
        Err(DocumentServiceError::DocumentNotFound(_))
    ));
}
