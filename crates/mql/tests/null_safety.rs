//! End-to-end tests: build a filter, enforce null safety, render it.

use model::core::value::Value;
use mql::{
    ast::{filter::FilterNode, operation::FilterOperation},
    renderer::json::{JsonMode, to_json},
};
use serde_json::json;

fn price_gt() -> FilterNode {
    FilterNode::field("price", true, FilterOperation::Gt(Value::Double(0.5)))
}

fn title_eq() -> FilterNode {
    FilterNode::field("title", false, FilterOperation::Eq(Value::from("X")))
}

#[test]
fn test_conjunction_gets_guard_after_original() {
    let node = FilterNode::and(vec![price_gt(), title_eq()])
        .unwrap()
        .with_null_safety_enforced();

    let doc = to_json(&node, JsonMode::Relaxed).unwrap();
    assert_eq!(
        doc,
        json!({"$and": [
            {"$and": [
                {"price": {"$gt": 0.5}},
                {"title": {"$eq": "X"}}
            ]},
            {"price": {"$ne": null}}
        ]})
    );
    assert_eq!(doc["$and"].as_array().map(|a| a.len()), Some(2));
}

#[test]
fn test_rewrite_twice_renders_identically() {
    let node = FilterNode::or(vec![
        FilterNode::nor(vec![price_gt()]).unwrap(),
        FilterNode::and(vec![price_gt(), title_eq()]).unwrap(),
        title_eq(),
    ])
    .unwrap();

    let once = node.with_null_safety_enforced();
    let twice = once.with_null_safety_enforced();

    assert_eq!(
        to_json(&once, JsonMode::Canonical).unwrap(),
        to_json(&twice, JsonMode::Canonical).unwrap()
    );
}

#[test]
fn test_disjunction_guards_each_branch() {
    let node = FilterNode::or(vec![price_gt(), title_eq()])
        .unwrap()
        .with_null_safety_enforced();

    let doc = to_json(&node, JsonMode::Relaxed).unwrap();
    assert_eq!(
        doc,
        json!({"$or": [
            {"$and": [{"price": {"$gt": 0.5}}, {"price": {"$ne": null}}]},
            {"title": {"$eq": "X"}}
        ]})
    );
}

#[test]
fn test_negated_comparison_excludes_nulls() {
    // not (price > 0.5) must not match documents without a price
    let node = FilterNode::nor(vec![price_gt()])
        .unwrap()
        .with_null_safety_enforced();

    let doc = to_json(&node, JsonMode::Relaxed).unwrap();
    assert_eq!(
        doc,
        json!({"$and": [
            {"$nor": [{"price": {"$gt": 0.5}}]},
            {"price": {"$ne": null}}
        ]})
    );
}

#[test]
fn test_equality_with_null_literal_keeps_guard() {
    let node = FilterNode::field("discount", true, FilterOperation::Eq(Value::Null))
        .with_null_safety_enforced();

    let doc = to_json(&node, JsonMode::Relaxed).unwrap();
    assert_eq!(
        doc,
        json!({"$and": [
            {"discount": {"$eq": null}},
            {"discount": {"$ne": null}}
        ]})
    );
}

#[test]
fn test_negated_disjunction_excludes_nulls() {
    // not (price > 0.5 or title = 'X') must not match documents without a price
    let node = FilterNode::nor(vec![FilterNode::or(vec![price_gt(), title_eq()]).unwrap()])
        .unwrap()
        .with_null_safety_enforced();

    let doc = to_json(&node, JsonMode::Relaxed).unwrap();
    assert_eq!(
        doc,
        json!({"$and": [
            {"$nor": [{"$or": [
                {"price": {"$gt": 0.5}},
                {"title": {"$eq": "X"}}
            ]}]},
            {"price": {"$ne": null}}
        ]})
    );
}
