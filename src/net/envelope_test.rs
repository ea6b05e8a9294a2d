use super::*;
use serde_json::json;

// =============================================================
// page
// =============================================================

#[test]
fn page_accepts_raw_array() {
    let page = page(json!([{"id": 1}, {"id": 2}])).unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 2);
}

#[test]
fn page_unwraps_data_and_items() {
    let from_data = page(json!({"data": [{"id": 1}], "total": 40})).unwrap();
    assert_eq!(from_data.items.len(), 1);
    assert_eq!(from_data.total, 40);

    let from_items = page(json!({"items": [{"id": 1}, {"id": 2}], "totalRows": 7})).unwrap();
    assert_eq!(from_items.items.len(), 2);
    assert_eq!(from_items.total, 7);
}

#[test]
fn page_unwraps_paginated_results() {
    let page = page(json!({"count": 120, "next": null, "results": [{"id": 1}]})).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 120);
}

#[test]
fn page_defaults_total_to_item_count() {
    let page = page(json!({"data": [{"id": 1}, {"id": 2}, {"id": 3}]})).unwrap();
    assert_eq!(page.total, 3);
}

#[test]
fn page_treats_null_as_empty() {
    assert_eq!(page(Value::Null).unwrap(), Page::default());
}

#[test]
fn page_rejects_shapes_without_a_list() {
    assert!(matches!(page(json!({"message": "ok"})), Err(RegistryError::Decode(_))));
    assert!(matches!(page(json!({"data": {"id": 1}})), Err(RegistryError::Decode(_))));
    assert!(matches!(page(json!("nope")), Err(RegistryError::Decode(_))));
}

// =============================================================
// single
// =============================================================

#[test]
fn single_returns_raw_record() {
    let record = json!({"id": 3, "name": "Goa"});
    assert_eq!(single(record.clone()), Some(record));
}

#[test]
fn single_unwraps_data_record() {
    let body = json!({"message": "created", "data": {"pk": 9, "name": "Goa"}});
    assert_eq!(single(body), Some(json!({"pk": 9, "name": "Goa"})));
}

#[test]
fn single_returns_none_without_record() {
    assert_eq!(single(json!({"message": "created"})), None);
    assert_eq!(single(Value::Null), None);
    assert_eq!(single(json!([{"id": 1}])), None);
}

// =============================================================
// rejections
// =============================================================

#[test]
fn field_rejection_takes_first_message_of_first_field() {
    let body = json!({
        "name": ["branch location with this name already exists.", "second"],
        "branch_state": ["Invalid pk"]
    });
    assert_eq!(
        field_rejection(&body).as_deref(),
        Some("branch location with this name already exists.")
    );
}

#[test]
fn field_rejection_ignores_detail_keys() {
    assert_eq!(field_rejection(&json!({"detail": "Not found."})), None);
    assert_eq!(field_rejection(&json!("plain")), None);
}

#[test]
fn field_rejection_accepts_non_field_errors() {
    let body = json!({"non_field_errors": ["The fields name, department must make a unique set."]});
    assert_eq!(
        field_rejection(&body).as_deref(),
        Some("The fields name, department must make a unique set.")
    );
}

#[test]
fn detail_message_reads_detail_error_or_message() {
    assert_eq!(detail_message(&json!({"detail": "Not found."})).as_deref(), Some("Not found."));
    assert_eq!(detail_message(&json!({"error": "Invalid credentials"})).as_deref(), Some("Invalid credentials"));
    assert_eq!(detail_message(&json!(["first", "second"])).as_deref(), Some("first"));
}

#[test]
fn rejection_message_falls_back_to_generic() {
    assert_eq!(rejection_message(&json!({"code": 17})), GENERIC_REJECTION);
    assert_eq!(rejection_message(&Value::Null), GENERIC_REJECTION);
}
