//! Literals of every supported type against nullable fields.

use model::schema::{EntitySchema, FieldSchema};
use mql::renderer::json::{JsonMode, to_json};
use serde_json::{Value as JsonValue, json};
use tracing_test::traced_test;
use translate::{TranslateError, translate_query};

fn book() -> EntitySchema {
    EntitySchema::new("Book", "books")
        .with_field(FieldSchema::id("id"))
        .with_field(FieldSchema::new("discount"))
        .with_field(FieldSchema::new("isbn13"))
        .with_field(FieldSchema::new("outOfStock"))
        .with_field(FieldSchema::new("price"))
        .with_field(FieldSchema::new("publishYear"))
        .with_field(FieldSchema::new("title"))
}

fn translate(query: &str, mode: JsonMode) -> JsonValue {
    let command = translate_query(query, &book()).unwrap();
    to_json(&command, mode).unwrap()
}

fn expected(path: &str, operator: &str, literal: JsonValue) -> JsonValue {
    json!({
        "aggregate": "books",
        "pipeline": [
            {"$match": {"$and": [
                {path: {operator: literal}},
                {path: {"$ne": null}}
            ]}},
            {"$project": {
                "_id": true,
                "discount": true,
                "isbn13": true,
                "outOfStock": true,
                "price": true,
                "publishYear": true,
                "title": true
            }}
        ]
    })
}

#[traced_test]
#[test]
fn test_boolean() {
    assert_eq!(
        translate("from Book where outOfStock = true", JsonMode::Relaxed),
        expected("outOfStock", "$eq", json!(true))
    );
}

#[traced_test]
#[test]
fn test_integer() {
    assert_eq!(
        translate("from Book where publishYear = 1995", JsonMode::Relaxed),
        expected("publishYear", "$eq", json!(1995))
    );
    assert_eq!(
        translate("from Book where publishYear = 1995", JsonMode::Canonical),
        expected("publishYear", "$eq", json!({"$numberInt": "1995"}))
    );
}

#[traced_test]
#[test]
fn test_long() {
    assert_eq!(
        translate("from Book where isbn13 = 9780310904168L", JsonMode::Relaxed),
        expected("isbn13", "$eq", json!(9_780_310_904_168i64))
    );
    assert_eq!(
        translate("from Book where isbn13 = 9780310904168L", JsonMode::Canonical),
        expected("isbn13", "$eq", json!({"$numberLong": "9780310904168"}))
    );
}

#[traced_test]
#[test]
fn test_double() {
    assert_eq!(
        translate("from Book where discount > 0.5D", JsonMode::Relaxed),
        expected("discount", "$gt", json!(0.5))
    );
}

#[traced_test]
#[test]
fn test_string() {
    assert_eq!(
        translate(r#"from Book where title = "Holy Bible""#, JsonMode::Relaxed),
        expected("title", "$eq", json!("Holy Bible"))
    );
}

#[traced_test]
#[test]
fn test_big_decimal() {
    assert_eq!(
        translate("from Book where price = 123.50BD", JsonMode::Relaxed),
        expected("price", "$eq", json!({"$numberDecimal": "123.50"}))
    );
}

#[traced_test]
#[test]
fn test_null_literal() {
    // `= null` is unknown for every row in SQL; the guard keeps it that way
    assert_eq!(
        translate("from Book where title = null", JsonMode::Relaxed),
        expected("title", "$eq", JsonValue::Null)
    );
}

#[traced_test]
#[test]
fn test_negated_disjunction_guards_every_field() {
    let doc = translate(
        "from Book b where not (b.price > 5 or b.title = 'X')",
        JsonMode::Relaxed,
    );

    assert_eq!(
        doc["pipeline"][0],
        json!({"$match": {"$and": [
            {"$nor": [{"$or": [
                {"price": {"$gt": 5}},
                {"title": {"$eq": "X"}}
            ]}]},
            {"price": {"$ne": null}},
            {"title": {"$ne": null}}
        ]}})
    );
}

#[traced_test]
#[test]
fn test_malformed_query() {
    let err = translate_query("from Book where title = ", &book()).unwrap_err();
    assert!(matches!(err, TranslateError::Syntax(_)));
}

#[traced_test]
#[test]
fn test_invalid_schema_is_rejected() {
    let schema = EntitySchema::new("Book", "books").with_field(FieldSchema::new("title"));
    let err = translate_query("from Book", &schema).unwrap_err();
    assert!(matches!(err, TranslateError::Schema(_)));
}
