//! Shared scaffolding: a `Ddb` wired to a canned-response HTTP client.
//!
//! No network, no DynamoDB Local: responses are replayed verbatim and the
//! requests the adapter actually produced are available for inspection.

// not every suite uses every helper
#![allow(dead_code)]

use aws_credential_types::Credentials;
use aws_sdk_dynamodb::config::{retry::RetryConfig, Region};
use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_types::body::SdkBody;
use ddb::Ddb;

fn canned_request() -> http::Request<SdkBody> {
    http::Request::builder()
        .uri("https://dynamodb.us-east-1.amazonaws.com/")
        .body(SdkBody::empty())
        .unwrap()
}

fn canned_response(status: u16, body: &str) -> http::Response<SdkBody> {
    http::Response::builder()
        .status(status)
        .body(SdkBody::from(body))
        .unwrap()
}

/// A `Ddb` that answers successive calls with the given response bodies.
pub fn replay_ddb(bodies: &[&str]) -> (Ddb, StaticReplayClient) {
    replay_ddb_with_statuses(&bodies.iter().map(|b| (200, *b)).collect::<Vec<_>>())
}

/// Same, with explicit HTTP statuses for error-path tests.
pub fn replay_ddb_with_statuses(responses: &[(u16, &str)]) -> (Ddb, StaticReplayClient) {
    let events = responses
        .iter()
        .map(|(status, body)| ReplayEvent::new(canned_request(), canned_response(*status, body)))
        .collect();
    let http_client = StaticReplayClient::new(events);
    let config = aws_sdk_dynamodb::Config::builder()
        .credentials_provider(Credentials::for_tests())
        .region(Region::from_static("us-east-1"))
        .retry_config(RetryConfig::disabled())
        .http_client(http_client.clone())
        .behavior_version_latest()
        .build();
    let client = aws_sdk_dynamodb::Client::from_conf(config);
    (Ddb::from_client(client), http_client)
}

/// The JSON body of the `index`-th request the adapter sent.
pub fn request_body(http_client: &StaticReplayClient, index: usize) -> serde_json::Value {
    let requests: Vec<_> = http_client.actual_requests().collect();
    let body = requests[index]
        .body()
        .bytes()
        .expect("request body is buffered");
    serde_json::from_slice(body).expect("request body is JSON")
}

/// The `X-Amz-Target` header of the `index`-th request, naming the
/// operation that was invoked.
pub fn request_target(http_client: &StaticReplayClient, index: usize) -> String {
    let requests: Vec<_> = http_client.actual_requests().collect();
    requests[index]
        .headers()
        .get("x-amz-target")
        .expect("x-amz-target header")
        .to_string()
}

/// How many requests actually went out.
pub fn request_count(http_client: &StaticReplayClient) -> usize {
    http_client.actual_requests().count()
}
