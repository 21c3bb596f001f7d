//! Shared helpers for the Beget reconciliation contract tests
//!
//! A `wiremock` server stands in for api.beget.com and records every
//! request, so tests can assert both what was sent and what was not.

#![allow(dead_code)]

use ddns_provider_beget::BegetProvider;
use serde_json::Value;
use serde_json::value::RawValue;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

pub const GET_DATA_PATH: &str = "/api/dns/getData";
pub const CHANGE_RECORDS_PATH: &str = "/api/dns/changeRecords";

pub const LOGIN: &str = "user";
pub const PASSWORD: &str = "s3cret&pass";

/// Provider for `target` pointed at the mock server
pub fn provider_for(server: &MockServer, target: &str, priority: i64) -> BegetProvider {
    let settings = serde_json::json!({
        "login": LOGIN,
        "password": PASSWORD,
        "domain": target,
        "priority": priority,
    });
    let settings = RawValue::from_string(settings.to_string()).expect("settings are JSON");

    BegetProvider::new(&settings, target, "@")
        .expect("valid settings")
        .with_api_base(&server.uri())
        .expect("mock server URI is a URL")
}

/// Successful `getData` body for `fqdn` with the given record mapping
pub fn get_data_body(fqdn: &str, records: Value) -> Value {
    serde_json::json!({
        "status": "success",
        "answer": {
            "status": "success",
            "result": {"fqdn": fqdn, "records": records}
        }
    })
}

/// Successful `changeRecords` body
pub fn change_records_ok() -> Value {
    serde_json::json!({
        "status": "success",
        "answer": {"status": "success", "result": true}
    })
}

/// Mount a `getData` responder that must be hit `times` times
pub async fn mount_get_data(server: &MockServer, response: ResponseTemplate, times: impl Into<Times>) {
    Mock::given(method("GET"))
        .and(path(GET_DATA_PATH))
        .respond_with(response)
        .expect(times)
        .named("getData")
        .mount(server)
        .await;
}

/// Mount a `changeRecords` responder that must be hit `times` times
pub async fn mount_change_records(server: &MockServer, response: ResponseTemplate, times: impl Into<Times>) {
    Mock::given(method("GET"))
        .and(path(CHANGE_RECORDS_PATH))
        .respond_with(response)
        .expect(times)
        .named("changeRecords")
        .mount(server)
        .await;
}

/// Decoded `input_data` of every recorded request to `endpoint_path`
pub async fn inputs_sent_to(server: &MockServer, endpoint_path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .filter(|request| request.url.path() == endpoint_path)
        .map(|request| {
            let input = request
                .url
                .query_pairs()
                .find(|(key, _)| key == "input_data")
                .map(|(_, value)| value.into_owned())
                .expect("input_data query parameter");
            serde_json::from_str(&input).expect("input_data is JSON")
        })
        .collect()
}

/// The single write payload the provider sent
pub async fn write_payload(server: &MockServer) -> Value {
    let mut inputs = inputs_sent_to(server, CHANGE_RECORDS_PATH).await;
    assert_eq!(inputs.len(), 1, "expected exactly one changeRecords call");
    inputs.remove(0)
}
