use super::*;
use serde_json::json;

// =============================================================
// EntityId
// =============================================================

#[test]
fn entity_id_reads_numbers_and_numeric_strings() {
    assert_eq!(EntityId::from_value(&json!(4)), Some(EntityId(4)));
    assert_eq!(EntityId::from_value(&json!("12")), Some(EntityId(12)));
    assert_eq!(EntityId::from_value(&json!(" 3 ")), Some(EntityId(3)));
}

#[test]
fn entity_id_reads_nested_foreign_key_objects() {
    assert_eq!(EntityId::from_value(&json!({"id": 9, "name": "Goa"})), Some(EntityId(9)));
    assert_eq!(EntityId::from_value(&json!({"pk": "5"})), Some(EntityId(5)));
}

#[test]
fn entity_id_rejects_non_ids() {
    assert_eq!(EntityId::from_value(&json!("abc")), None);
    assert_eq!(EntityId::from_value(&json!(1.5)), None);
    assert_eq!(EntityId::from_value(&Value::Null), None);
    assert!(serde_json::from_value::<EntityId>(json!(true)).is_err());
}

#[test]
fn entity_id_parses_from_cli_text() {
    assert_eq!("42".parse::<EntityId>().unwrap(), EntityId(42));
    assert!("x".parse::<EntityId>().is_err());
}

// =============================================================
// Status normalization
// =============================================================

#[test]
fn status_normalizes_booleans_and_numbers() {
    assert_eq!(normalize_status(&json!(true)), Some(true));
    assert_eq!(normalize_status(&json!(false)), Some(false));
    assert_eq!(normalize_status(&json!(1)), Some(true));
    assert_eq!(normalize_status(&json!(0)), Some(false));
}

#[test]
fn status_normalizes_string_spellings() {
    assert_eq!(normalize_status(&json!("1")), Some(true));
    assert_eq!(normalize_status(&json!("false")), Some(false));
    assert_eq!(normalize_status(&json!("Active")), Some(true));
    assert_eq!(normalize_status(&json!("inactive")), Some(false));
}

#[test]
fn status_rejects_unknown_values() {
    assert_eq!(normalize_status(&json!(2)), None);
    assert_eq!(normalize_status(&json!("maybe")), None);
    assert_eq!(normalize_status(&Value::Null), None);
}

#[test]
fn status_badge_text() {
    assert_eq!(status_badge(true), "Active");
    assert_eq!(status_badge(false), "Inactive");
}

// =============================================================
// Entity / Fields
// =============================================================

#[test]
fn entity_to_fields_prefills_edit_form() {
    let entity = Entity::new(EntityId(2), "Mysore").under(EntityId(1)).with_status(false);
    let fields = entity.to_fields();
    assert_eq!(fields.label, "Mysore");
    assert_eq!(fields.status, Some(false));
    assert_eq!(fields.parent, Some(EntityId(1)));
}

#[test]
fn entity_serializes_without_empty_optionals() {
    let entity = Entity::new(EntityId(1), "ABC Bank");
    let value = serde_json::to_value(&entity).unwrap();
    assert_eq!(value, json!({"id": 1, "label": "ABC Bank", "status": true}));
}

#[test]
fn fields_builder_collects_extra_values() {
    let fields = Fields::labeled("Retail").with("code", json!("RT")).with_status(true);
    assert_eq!(fields.extra.get("code"), Some(&json!("RT")));
    assert_eq!(fields.status, Some(true));
    assert!(fields.parent.is_none());
}
