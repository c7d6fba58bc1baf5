use fileshare_core::{AttachmentKind, Category, Document};
use uuid::Uuid;

#[test]
fn document_serializes_with_ordered_files() {
    let mut document = Document::new(
        "Passport",
        Uuid::new_v4(),
        vec!["/docs/a.jpg".to_string(), "/docs/b.PDF".to_string()],
    );
    document.memo = Some("renew 2025".to_string());

    let json = serde_json::to_value(&document).unwrap();

    assert_eq!(json["title"], "Passport");
    assert_eq!(json["file_paths"][1], "/docs/b.PDF");
    assert_eq!(json["memo"], "renew 2025");
    assert_eq!(json["share_count"], 0);
    let decoded: Document = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, document);
    assert_eq!(
        decoded.attachment_kinds(),
        vec![AttachmentKind::Image, AttachmentKind::Pdf]
    );
}

#[test]
fn category_serializes_default_flag() {
    let category = Category::new("Medical", 3);

    let json = serde_json::to_value(&category).unwrap();

    assert_eq!(json["name"], "Medical");
    assert_eq!(json["sort_order"], 3);
    assert_eq!(json["is_default"], false);
}

#[test]
fn attachment_kind_uses_snake_case() {
    assert_eq!(
        serde_json::to_string(&AttachmentKind::Pdf).unwrap(),
        "\"pdf\""
    );
}
