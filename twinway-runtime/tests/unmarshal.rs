use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use twinway_runtime::{
    populate_field_from_path, populate_query_field, transform_unmarshaler_error, Marshaler,
    UnmarshalError,
};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Item {
    sku: String,
    price: f64,
    tags: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct UpdateItemRequest {
    id: i64,
    note: String,
    active: bool,
    item: Option<Item>,
    limit: Option<u32>,
    codes: Vec<u32>,
}

// ── populate_field_from_path ────────────────────────────────────────────

#[test]
fn scalars_are_coerced_by_field_kind() {
    let mut req = UpdateItemRequest::default();
    populate_field_from_path(&mut req, "id", "42").unwrap();
    populate_field_from_path(&mut req, "note", "17").unwrap();
    populate_field_from_path(&mut req, "active", "true").unwrap();
    assert_eq!(req.id, 42);
    assert_eq!(req.note, "17");
    assert!(req.active);
}

#[test]
fn nested_messages_are_created_on_demand() {
    let mut req = UpdateItemRequest::default();
    populate_field_from_path(&mut req, "item.sku", "abc").unwrap();
    populate_field_from_path(&mut req, "item.price", "9.5").unwrap();
    let item = req.item.unwrap();
    assert_eq!(item.sku, "abc");
    assert_eq!(item.price, 9.5);
}

#[test]
fn repeated_fields_append() {
    let mut req = UpdateItemRequest::default();
    populate_field_from_path(&mut req, "item.tags", "a").unwrap();
    populate_field_from_path(&mut req, "item.tags", "1").unwrap();
    populate_field_from_path(&mut req, "codes", "3").unwrap();
    populate_field_from_path(&mut req, "codes", "4").unwrap();
    assert_eq!(req.item.unwrap().tags, vec!["a", "1"]);
    assert_eq!(req.codes, vec![3, 4]);
}

#[test]
fn optional_scalars_take_the_matching_type() {
    let mut req = UpdateItemRequest::default();
    populate_field_from_path(&mut req, "limit", "7").unwrap();
    assert_eq!(req.limit, Some(7));
}

#[test]
fn field_names_fall_back_to_case_insensitive_match() {
    let mut req = UpdateItemRequest::default();
    populate_field_from_path(&mut req, "NOTE", "hi").unwrap();
    populate_field_from_path(&mut req, "Item.SKU", "x").unwrap();
    assert_eq!(req.note, "hi");
    assert_eq!(req.item.unwrap().sku, "x");
}

#[test]
fn coercion_failures_are_classified() {
    let mut req = UpdateItemRequest::default();
    let err = populate_field_from_path(&mut req, "id", "abc").unwrap_err();
    assert!(matches!(err, UnmarshalError::InvalidValue { ref field, .. } if field == "id"));

    let err = populate_field_from_path(&mut req, "missing", "1").unwrap_err();
    assert!(matches!(err, UnmarshalError::UnknownField(_)));

    let err = populate_field_from_path(&mut req, "id.deeper", "1").unwrap_err();
    assert!(matches!(err, UnmarshalError::NotAMessage(ref f) if f == "id"));

    let err = populate_field_from_path(&mut req, "item", "1").unwrap_err();
    assert!(matches!(err, UnmarshalError::InvalidValue { .. }));
    assert_eq!(req, UpdateItemRequest::default());
}

#[test]
fn query_fields_skip_unknown_keys_only() {
    let mut req = UpdateItemRequest::default();
    populate_query_field(&mut req, "utm_source", "mail").unwrap();
    populate_query_field(&mut req, "item.nope", "1").unwrap();
    populate_query_field(&mut req, "note", "hi").unwrap();
    assert_eq!(req.note, "hi");

    let err = populate_query_field(&mut req, "id", "abc").unwrap_err();
    assert!(matches!(err, UnmarshalError::InvalidValue { .. }));
    let err = populate_query_field(&mut req, "id.deeper", "1").unwrap_err();
    assert!(matches!(err, UnmarshalError::NotAMessage(_)));
}

#[test]
fn query_errors_become_bad_requests() {
    let mut req = UpdateItemRequest::default();
    let err = populate_query_field(&mut req, "active", "maybe")
        .map_err(|err| err.context("couldn't populate field from query"))
        .map_err(transform_unmarshaler_error)
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(err.message().starts_with("couldn't populate field from query: "));
}

// ── Marshalers ──────────────────────────────────────────────────────────

#[test]
fn json_payload_merges_into_existing_values() {
    let mut req = UpdateItemRequest {
        id: 5,
        note: "query".into(),
        ..Default::default()
    };
    Marshaler::Json
        .unmarshal_into(br#"{"note": "body", "item": {"sku": "s"}}"#, &mut req)
        .unwrap();
    assert_eq!(req.id, 5);
    assert_eq!(req.note, "body");
    assert_eq!(req.item.unwrap().sku, "s");
}

#[test]
fn empty_payload_is_a_no_op() {
    let mut req = UpdateItemRequest {
        id: 5,
        ..Default::default()
    };
    Marshaler::Json.unmarshal_into(b"  ", &mut req).unwrap();
    assert_eq!(req.id, 5);
}

#[test]
fn malformed_payload_is_rejected() {
    let mut req = UpdateItemRequest::default();
    let err = Marshaler::Json.unmarshal_into(b"{not json", &mut req).unwrap_err();
    assert!(matches!(err, UnmarshalError::Payload(_)));
}

#[test]
fn form_payload_coerces_each_pair() {
    let mut item = Item::default();
    Marshaler::Form
        .unmarshal_into(b"sku=a%20b&price=2.5&tags=x&tags=y", &mut item)
        .unwrap();
    assert_eq!(item.sku, "a b");
    assert_eq!(item.price, 2.5);
    assert_eq!(item.tags, vec!["x", "y"]);
}

