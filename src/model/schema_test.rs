use super::*;
use serde_json::json;

fn locations() -> ResourceSchema {
    ResourceSchema::new("locations", "location", "branch-locations").child_of("states", "branch_state", "State")
}

// =============================================================
// Validation
// =============================================================

#[test]
fn validate_trims_label() {
    let fields = locations()
        .validate(Fields::labeled("  Mysore ").under(EntityId(2)))
        .unwrap();
    assert_eq!(fields.label, "Mysore");
}

#[test]
fn validate_rejects_blank_label() {
    let schema = ResourceSchema::new("departments", "department", "departments");
    let err = schema.validate(Fields::labeled("   ")).unwrap_err();
    assert_eq!(err, RegistryError::validation("name", "Department name is required"));
}

#[test]
fn validate_requires_parent_for_scoped_resource() {
    let err = locations().validate(Fields::labeled("Mysore")).unwrap_err();
    assert_eq!(err, RegistryError::validation("branch_state", "State is required"));
}

#[test]
fn validate_rejects_parent_on_root_resource() {
    let schema = ResourceSchema::new("banks", "bank", "banks").label("bank_name", "Bank name");
    let err = schema
        .validate(Fields::labeled("ABC Bank").under(EntityId(1)))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation { .. }));
}

#[test]
fn validate_checks_required_extra_fields() {
    let schema = ResourceSchema::new("payout_categories", "payout category", "payout-categories")
        .label("category_name", "Category name")
        .requires("category_code", "Category code");

    let err = schema
        .validate(Fields::labeled("Retail").with("category_code", json!("  ")))
        .unwrap_err();
    assert_eq!(err, RegistryError::validation("category_code", "Category code is required"));

    let ok = schema
        .validate(Fields::labeled("Retail").with("category_code", json!(" RT ")))
        .unwrap();
    assert_eq!(ok.extra.get("category_code"), Some(&json!("RT")));
}

// =============================================================
// Decode
// =============================================================

#[test]
fn decode_maps_backend_fields() {
    let entity = locations()
        .decode(&json!({"id": 4, "name": "Mysore", "branch_state": 2, "status": true, "code": "MYS"}))
        .unwrap();
    assert_eq!(entity.id, EntityId(4));
    assert_eq!(entity.label, "Mysore");
    assert_eq!(entity.parent, Some(EntityId(2)));
    assert!(entity.status);
    assert_eq!(entity.extra.get("code"), Some(&json!("MYS")));
    assert!(!entity.extra.contains_key("branch_state"));
}

#[test]
fn decode_normalizes_numeric_status() {
    let schema = ResourceSchema::new("dsa_names", "DSA name", "dsa-names").label("bsa_name", "DSA name");
    let active = schema.decode(&json!({"id": 1, "bsa_name": "John", "status": 1})).unwrap();
    let inactive = schema.decode(&json!({"id": 2, "bsa_name": "Sara", "status": 0})).unwrap();
    assert!(active.status);
    assert!(!inactive.status);
}

#[test]
fn decode_defaults_missing_status_to_active() {
    let entity = ResourceSchema::new("states", "state", "branch-states")
        .decode(&json!({"pk": "3", "name": "Goa"}))
        .unwrap();
    assert_eq!(entity.id, EntityId(3));
    assert!(entity.status);
}

#[test]
fn decode_accepts_numeric_labels() {
    let schema = ResourceSchema::new("pincodes", "pincode", "pincodes").label("pincode", "Pincode");
    let entity = schema.decode(&json!({"id": 1, "pincode": 570001})).unwrap();
    assert_eq!(entity.label, "570001");
}

#[test]
fn decode_rejects_records_without_id_or_label() {
    let schema = ResourceSchema::new("states", "state", "branch-states");
    assert!(matches!(schema.decode(&json!({"name": "Goa"})), Err(RegistryError::Decode(_))));
    assert!(matches!(schema.decode(&json!({"id": 1})), Err(RegistryError::Decode(_))));
    assert!(matches!(schema.decode(&json!([1, 2])), Err(RegistryError::Decode(_))));
    assert!(matches!(
        schema.decode(&json!({"id": 1, "name": "Goa", "status": "unknown"})),
        Err(RegistryError::Decode(_))
    ));
}

// =============================================================
// Encode
// =============================================================

#[test]
fn encode_writes_label_parent_and_status() {
    let body = locations().encode(&Fields::labeled("Mysore").under(EntityId(2)), &[]);
    assert_eq!(body, json!({"name": "Mysore", "status": true, "branch_state": 2}));
}

#[test]
fn encode_uses_numeric_status_when_configured() {
    let schema = ResourceSchema::new("dsa_names", "DSA name", "dsa-names")
        .label("bsa_name", "DSA name")
        .numeric_status();
    let body = schema.encode(&Fields::labeled("John").with_status(false), &[]);
    assert_eq!(body, json!({"bsa_name": "John", "status": 0}));
    assert_eq!(schema.status_patch(true), json!({"status": 1}));
}

#[test]
fn encode_fills_ancestor_fields_from_lineage() {
    let schema = ResourceSchema::new("sublocations", "sub-location", "sublocations")
        .child_of("locations", "branch_location", "Location")
        .carries("states", "branch_state");
    let body = schema.encode(
        &Fields::labeled("Gokulam").under(EntityId(4)),
        &[("states".to_owned(), EntityId(2))],
    );
    assert_eq!(body["branch_location"], json!(4));
    assert_eq!(body["branch_state"], json!(2));
}

// =============================================================
// Catalog
// =============================================================

#[test]
fn masters_catalog_is_valid() {
    let masters = Catalog::masters();
    let schemas: Vec<ResourceSchema> = masters.iter().cloned().collect();
    assert!(Catalog::new(schemas).is_ok());
}

#[test]
fn masters_lineage_follows_location_chain() {
    let masters = Catalog::masters();
    assert_eq!(masters.lineage("pincodes").unwrap(), vec!["sublocations", "locations", "states"]);
    assert!(masters.lineage("banks").unwrap().is_empty());
}

#[test]
fn children_of_lists_direct_children() {
    let masters = Catalog::masters();
    let children: Vec<&str> = masters.children_of("departments").map(|s| s.key.as_str()).collect();
    assert_eq!(children, vec!["designations"]);
}

#[test]
fn catalog_rejects_duplicate_keys() {
    let err = Catalog::new(vec![
        ResourceSchema::new("banks", "bank", "banks"),
        ResourceSchema::new("banks", "bank", "banks-v2"),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("duplicate collection key"));
}

#[test]
fn catalog_rejects_unknown_parent() {
    let err = Catalog::new(vec![locations()]).unwrap_err();
    assert!(err.to_string().contains("unknown parent"));
}

#[test]
fn catalog_rejects_cycles() {
    let err = Catalog::new(vec![
        ResourceSchema::new("a", "a", "a").child_of("b", "b_id", "B"),
        ResourceSchema::new("b", "b", "b").child_of("a", "a_id", "A"),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn catalog_rejects_ancestor_outside_lineage() {
    let err = Catalog::new(vec![
        ResourceSchema::new("states", "state", "branch-states"),
        ResourceSchema::new("banks", "bank", "banks"),
        locations().carries("banks", "bank"),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("not above its parent"));
}

#[test]
fn get_unknown_collection_errors() {
    let err = Catalog::masters().get("planets").unwrap_err();
    assert_eq!(err, RegistryError::UnknownCollection("planets".into()));
}
