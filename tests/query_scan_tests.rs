//! Query and scan: comparison fan-out, filter shaping, pagination
//! cursors and count-only requests.

use std::collections::HashMap;

use ddb::{item, Comparison, QueryOptions, ScanOptions, Value};
use serde_json::json;

mod helpers;
use helpers::*;

const EMPTY_PAGE: &str = r#"{"Count": 0, "Items": [], "ConsumedCapacity": {"CapacityUnits": 0.5}}"#;

#[tokio::test]
async fn query_fans_out_between_operands_in_order() {
    let (db, http_client) = replay_ddb(&[EMPTY_PAGE]);

    let conditions = HashMap::from([
        ("author".to_string(), Comparison::from(Value::from("u1"))),
        (
            "age".to_string(),
            Comparison::Between(Value::from(10), Value::from(20)),
        ),
    ]);
    db.query("posts", conditions, QueryOptions::default())
        .await
        .unwrap();

    let body = request_body(&http_client, 0);
    assert_eq!(request_target(&http_client, 0), "DynamoDB_20120810.Query");
    assert_eq!(body["KeyConditions"]["author"]["ComparisonOperator"], "EQ");
    assert_eq!(
        body["KeyConditions"]["author"]["AttributeValueList"],
        json!([{"S": "u1"}])
    );
    assert_eq!(body["KeyConditions"]["age"]["ComparisonOperator"], "BETWEEN");
    assert_eq!(
        body["KeyConditions"]["age"]["AttributeValueList"],
        json!([{"N": "10"}, {"N": "20"}])
    );
}

#[tokio::test]
async fn query_decodes_items_and_cursor() {
    let (db, _http_client) = replay_ddb(&[r#"{
        "Count": 2,
        "Items": [
            {"author": {"S": "u1"}, "posted_at": {"N": "1"}},
            {"author": {"S": "u1"}, "posted_at": {"N": "2"}}
        ],
        "LastEvaluatedKey": {"author": {"S": "abc"}, "posted_at": {"N": "5"}},
        "ConsumedCapacity": {"TableName": "posts", "CapacityUnits": 1.5}
    }"#]);

    let page = db
        .query(
            "posts",
            HashMap::from([("author".to_string(), Comparison::from(Value::from("u1")))]),
            QueryOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0]["posted_at"], Value::N(1.0));
    assert_eq!(page.items[1]["posted_at"], Value::N(2.0));

    let cursor = page.last_evaluated_key.unwrap();
    assert_eq!(cursor["author"], Value::S("abc".into()));
    assert_eq!(cursor["posted_at"], Value::N(5.0));
    assert_eq!(page.consumed_capacity, 1.5);
}

#[tokio::test]
async fn cursor_resubmits_as_exclusive_start_key() {
    let (db, http_client) = replay_ddb(&[
        r#"{
            "Count": 1,
            "Items": [{"author": {"S": "u1"}, "posted_at": {"N": "1"}}],
            "LastEvaluatedKey": {"author": {"S": "u1"}, "posted_at": {"N": "1"}},
            "ConsumedCapacity": {"CapacityUnits": 1}
        }"#,
        EMPTY_PAGE,
    ]);

    let conditions =
        HashMap::from([("author".to_string(), Comparison::from(Value::from("u1")))]);
    let first = db
        .query("posts", conditions.clone(), QueryOptions::default())
        .await
        .unwrap();

    db.query(
        "posts",
        conditions,
        QueryOptions {
            exclusive_start_key: first.last_evaluated_key,
            ..QueryOptions::default()
        },
    )
    .await
    .unwrap();

    let body = request_body(&http_client, 1);
    assert_eq!(
        body["ExclusiveStartKey"],
        json!({"author": {"S": "u1"}, "posted_at": {"N": "1"}})
    );
    assert_eq!(db.consumed_capacity(), 1.5);
}

#[tokio::test]
async fn query_descends_only_on_explicit_false() {
    let (db, http_client) = replay_ddb(&[EMPTY_PAGE, EMPTY_PAGE, EMPTY_PAGE]);
    let conditions =
        HashMap::from([("author".to_string(), Comparison::from(Value::from("u1")))]);

    db.query("posts", conditions.clone(), QueryOptions::default())
        .await
        .unwrap();
    db.query(
        "posts",
        conditions.clone(),
        QueryOptions {
            scan_index_forward: Some(true),
            ..QueryOptions::default()
        },
    )
    .await
    .unwrap();
    db.query(
        "posts",
        conditions,
        QueryOptions {
            scan_index_forward: Some(false),
            ..QueryOptions::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(request_body(&http_client, 0).get("ScanIndexForward"), None);
    assert_eq!(request_body(&http_client, 1).get("ScanIndexForward"), None);
    assert_eq!(request_body(&http_client, 2)["ScanIndexForward"], false);
}

#[tokio::test]
async fn query_count_is_ignored_when_projecting_attributes() {
    let (db, http_client) = replay_ddb(&[EMPTY_PAGE, EMPTY_PAGE]);
    let conditions =
        HashMap::from([("author".to_string(), Comparison::from(Value::from("u1")))]);

    db.query(
        "posts",
        conditions.clone(),
        QueryOptions {
            count: true,
            ..QueryOptions::default()
        },
    )
    .await
    .unwrap();
    db.query(
        "posts",
        conditions,
        QueryOptions {
            count: true,
            attributes_to_get: Some(vec!["title".to_string()]),
            ..QueryOptions::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(request_body(&http_client, 0)["Select"], "COUNT");
    assert_eq!(request_body(&http_client, 1).get("Select"), None);
    assert_eq!(
        request_body(&http_client, 1)["AttributesToGet"],
        json!(["title"])
    );
}

#[tokio::test]
async fn query_targets_index_when_named() {
    let (db, http_client) = replay_ddb(&[EMPTY_PAGE]);

    db.query(
        "posts",
        HashMap::from([("author".to_string(), Comparison::from(Value::from("u1")))]),
        QueryOptions {
            index_name: Some("price-index".to_string()),
            limit: Some(25),
            consistent_read: true,
            ..QueryOptions::default()
        },
    )
    .await
    .unwrap();

    let body = request_body(&http_client, 0);
    assert_eq!(body["IndexName"], "price-index");
    assert_eq!(body["Limit"], 25);
    assert_eq!(body["ConsistentRead"], true);
}

#[tokio::test]
async fn scan_filter_shapes_operand_free_operators() {
    let (db, http_client) = replay_ddb(&[r#"{
        "Count": 1, "ScannedCount": 3,
        "Items": [{"id": {"S": "u1"}, "status": {"S": "active"}}],
        "ConsumedCapacity": {"CapacityUnits": 2}
    }"#]);

    let filter = HashMap::from([
        ("status".to_string(), Comparison::NotNull),
        (
            "age".to_string(),
            Comparison::In(vec![Value::from(1), Value::from(2), Value::from(3)]),
        ),
    ]);
    let out = db
        .scan(
            "users",
            ScanOptions {
                filter: Some(filter),
                ..ScanOptions::default()
            },
        )
        .await
        .unwrap();

    let body = request_body(&http_client, 0);
    assert_eq!(request_target(&http_client, 0), "DynamoDB_20120810.Scan");
    assert_eq!(body["ScanFilter"]["status"]["ComparisonOperator"], "NOT_NULL");
    assert_eq!(body["ScanFilter"]["status"]["AttributeValueList"], json!([]));
    assert_eq!(body["ScanFilter"]["age"]["ComparisonOperator"], "IN");
    assert_eq!(
        body["ScanFilter"]["age"]["AttributeValueList"],
        json!([{"N": "1"}, {"N": "2"}, {"N": "3"}])
    );

    assert_eq!(out.count, 1);
    assert_eq!(out.scanned_count, 3);
    assert_eq!(out.items[0]["status"], Value::S("active".into()));
    assert_eq!(out.consumed_capacity, 2.0);
}

#[tokio::test]
async fn scan_rejects_single_operand_in_before_sending() {
    let (db, http_client) = replay_ddb(&[]);

    let err = db
        .scan(
            "users",
            ScanOptions {
                filter: Some(HashMap::from([(
                    "age".to_string(),
                    Comparison::In(vec![Value::from(1)]),
                )])),
                ..ScanOptions::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ddb::Error::Validation(_)));
    assert_eq!(request_count(&http_client), 0);
}

#[tokio::test]
async fn scan_resumes_from_exclusive_start_key() {
    let (db, http_client) = replay_ddb(&[r#"{
        "Count": 0, "ScannedCount": 0, "Items": [],
        "ConsumedCapacity": {"CapacityUnits": 0.5}
    }"#]);

    db.scan(
        "users",
        ScanOptions {
            exclusive_start_key: Some(item([("id", Value::from("u7"))])),
            limit: Some(10),
            ..ScanOptions::default()
        },
    )
    .await
    .unwrap();

    let body = request_body(&http_client, 0);
    assert_eq!(body["ExclusiveStartKey"], json!({"id": {"S": "u7"}}));
    assert_eq!(body["Limit"], 10);
}
