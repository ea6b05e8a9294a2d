use super::*;
use serde_json::json;

fn pincodes() -> Vec<Entity> {
    let mut rows = Vec::new();
    for n in 1..=120_i64 {
        let mut entity = Entity::new(EntityId(n), format!("5600{n:02}")).under(EntityId(if n % 2 == 0 { 1 } else { 2 }));
        entity.status = n % 10 != 0;
        entity.extra.insert("branch_state".into(), json!(7));
        rows.push(entity);
    }
    rows
}

fn banks() -> Vec<Entity> {
    vec![
        Entity::new(EntityId(1), "HDFC Bank"),
        Entity::new(EntityId(2), "ABC Bank").with_status(false),
        Entity::new(EntityId(3), "axis bank"),
    ]
}

fn labels(view: &PageView) -> Vec<&str> {
    view.items.iter().map(|e| e.label.as_str()).collect()
}

#[test]
fn default_query_pages_by_fifty() {
    let view = ListQuery::default().apply(&pincodes());
    assert_eq!(view.total, 120);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.items.len(), 50);
    assert_eq!((view.first, view.last), (1, 50));
}

#[test]
fn last_page_is_partial_and_out_of_range_pages_clamp() {
    let query = ListQuery { page: 9, ..ListQuery::default() };
    let view = query.apply(&pincodes());
    assert_eq!(view.page, 3);
    assert_eq!(view.items.len(), 20);
    assert_eq!((view.first, view.last), (101, 120));

    let first = ListQuery { page: 0, ..ListQuery::default() }.apply(&pincodes());
    assert_eq!(first.page, 1);
}

#[test]
fn empty_result_has_one_page_and_zero_range() {
    let query = ListQuery { search: Some("nothing".into()), ..ListQuery::default() };
    let view = query.apply(&banks());
    assert_eq!(view.total, 0);
    assert_eq!(view.total_pages, 1);
    assert_eq!((view.first, view.last), (0, 0));
}

#[test]
fn search_is_case_insensitive_and_trimmed() {
    let query = ListQuery { search: Some("  BANK ".into()), ..ListQuery::default() };
    assert_eq!(labels(&query.apply(&banks())), vec!["HDFC Bank", "ABC Bank", "axis bank"]);

    let query = ListQuery { search: Some("hdfc".into()), ..ListQuery::default() };
    assert_eq!(labels(&query.apply(&banks())), vec!["HDFC Bank"]);
}

#[test]
fn status_filter_selects_active_or_inactive() {
    let active = ListQuery { status: StatusFilter::Active, ..ListQuery::default() };
    assert_eq!(labels(&active.apply(&banks())), vec!["HDFC Bank", "axis bank"]);

    let inactive = ListQuery { status: StatusFilter::Inactive, ..ListQuery::default() };
    assert_eq!(labels(&inactive.apply(&banks())), vec!["ABC Bank"]);
}

#[test]
fn parent_and_field_filters_combine() {
    let query = ListQuery {
        parent: Some(EntityId(1)),
        status: StatusFilter::Inactive,
        fields: vec![("branch_state".into(), json!("7"))],
        ..ListQuery::default()
    };
    let view = query.apply(&pincodes());
    assert_eq!(view.total, 12);
    assert!(view.items.iter().all(|e| e.parent == Some(EntityId(1)) && !e.status));

    let mismatch = ListQuery { fields: vec![("branch_state".into(), json!(8))], ..ListQuery::default() };
    assert_eq!(mismatch.apply(&pincodes()).total, 0);
}

#[test]
fn label_sorts_ignore_case() {
    let asc = ListQuery { sort: Sort::LabelAsc, ..ListQuery::default() };
    assert_eq!(labels(&asc.apply(&banks())), vec!["ABC Bank", "axis bank", "HDFC Bank"]);

    let desc = ListQuery { sort: Sort::LabelDesc, ..ListQuery::default() };
    assert_eq!(labels(&desc.apply(&banks())), vec!["HDFC Bank", "axis bank", "ABC Bank"]);
}
