//! Beget API plumbing: request construction, transport and response envelopes.
//!
//! Every Beget API call is an authenticated GET. Credentials, the format
//! markers and the JSON input all travel as query parameters; the API takes
//! no request body for these calls.
//!
//! ```http
//! GET /api/dns/getData?login=..&passwd=..&input_format=json&output_format=json&input_data={"fqdn":"example.com"}
//! Accept: application/json
//! ```

use ddns_core::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Beget API base URL
pub(crate) const BEGET_API_BASE: &str = "https://api.beget.com";

/// Returns the full DNS configuration of a domain
pub(crate) const GET_DATA_ENDPOINT: &str = "api/dns/getData";

/// Replaces the full DNS configuration of a domain
pub(crate) const CHANGE_RECORDS_ENDPOINT: &str = "api/dns/changeRecords";

/// Status marker Beget uses for success, at both envelope levels
pub(crate) const SUCCESS: &str = "success";

const BEGET_USER_AGENT: &str = concat!("ddns-beget/", env!("CARGO_PKG_VERSION"));

/// Build an authenticated GET request for `endpoint`.
///
/// `input` must be a serialized JSON document; it is sent as `input_data`.
pub(crate) fn build_request(
    client: &reqwest::Client,
    api_base: &Url,
    endpoint: &str,
    login: &str,
    password: &str,
    input: &[u8],
) -> Result<reqwest::Request> {
    let mut url = api_base
        .join(endpoint)
        .map_err(|e| Error::request_construction(endpoint, e.to_string()))?;

    let input = std::str::from_utf8(input)
        .map_err(|e| Error::request_construction(endpoint, format!("input is not UTF-8: {e}")))?;

    url.query_pairs_mut()
        .append_pair("login", login)
        .append_pair("passwd", password)
        .append_pair("input_format", "json")
        .append_pair("output_format", "json")
        .append_pair("input_data", input);

    tracing::debug!("Built Beget API request for {}", endpoint);

    client
        .get(url)
        .header(USER_AGENT, BEGET_USER_AGENT)
        .header(ACCEPT, "application/json")
        .build()
        .map_err(|e| Error::request_construction(endpoint, e.to_string()))
}

/// Execute `request` with the caller's client and return the raw body.
///
/// The body is read to the end before returning, on success and on a
/// non-200 status alike. If `cancel` fires first, the in-flight exchange is
/// dropped, which releases the connection, and `Error::Cancelled` is returned.
pub(crate) async fn execute(
    cancel: &CancellationToken,
    client: &reqwest::Client,
    endpoint: &str,
    request: reqwest::Request,
) -> Result<Vec<u8>> {
    let exchange = async {
        let response = client
            .execute(request)
            .await
            .map_err(|e| Error::transport(endpoint, e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(endpoint, format!("failed reading response body: {e}")))?;

        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::cancelled(endpoint)),
        result = exchange => result,
    }
}

/// Two-level response wrapper shared by all Beget API calls
///
/// Beget answers with lowercase keys; capitalized keys are accepted as well.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default, alias = "Status")]
    pub status: String,

    #[serde(default, alias = "Answer")]
    pub answer: Option<Answer<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Answer<T> {
    #[serde(default, alias = "Status")]
    pub status: String,

    #[serde(default, alias = "Result")]
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Both status levels carry the success marker
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
            && self
                .answer
                .as_ref()
                .is_some_and(|answer| answer.status == SUCCESS)
    }

    /// Take the nested result payload, if any
    pub fn into_result(self) -> Option<T> {
        self.answer.and_then(|answer| answer.result)
    }
}

/// Result payload of `getData`
///
/// `records` must be a JSON object. An empty set encoded as `[]` is a
/// decode error.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DomainData {
    #[serde(default, alias = "FQDN")]
    pub fqdn: String,

    /// Every record type of the domain, kept uninterpreted
    #[serde(default, alias = "Records")]
    pub records: Option<BTreeMap<String, Box<RawValue>>>,
}

/// Envelope of `getData`
pub(crate) type GetDataResponse = Envelope<DomainData>;

/// Envelope of `changeRecords`; the result is a bare boolean
pub(crate) type ChangeRecordsResponse = Envelope<bool>;

/// Parse a raw body into the envelope expected for `endpoint`.
///
/// Only structure is checked here; status validation is up to the caller.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse(BEGET_API_BASE).unwrap()
    }

    #[test]
    fn test_request_carries_credentials_and_input() {
        let client = reqwest::Client::new();
        let request = build_request(
            &client,
            &base(),
            GET_DATA_ENDPOINT,
            "user",
            "p&ss=word",
            br#"{"fqdn":"example.com"}"#,
        )
        .unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().scheme(), "https");
        assert_eq!(request.url().host_str(), Some("api.beget.com"));
        assert_eq!(request.url().path(), "/api/dns/getData");
        assert!(request.body().is_none());

        let query: BTreeMap<String, String> = request.url().query_pairs().into_owned().collect();
        assert_eq!(query["login"], "user");
        assert_eq!(query["passwd"], "p&ss=word");
        assert_eq!(query["input_format"], "json");
        assert_eq!(query["output_format"], "json");
        assert_eq!(query["input_data"], r#"{"fqdn":"example.com"}"#);
    }

    #[test]
    fn test_request_headers() {
        let client = reqwest::Client::new();
        let request = build_request(&client, &base(), CHANGE_RECORDS_ENDPOINT, "u", "p", b"{}").unwrap();

        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert!(
            request.headers()[USER_AGENT]
                .to_str()
                .unwrap()
                .starts_with("ddns-beget/")
        );
        assert_eq!(request.url().path(), "/api/dns/changeRecords");
    }

    #[test]
    fn test_request_rejects_non_utf8_input() {
        let client = reqwest::Client::new();
        let result = build_request(&client, &base(), GET_DATA_ENDPOINT, "u", "p", &[0xff, 0xfe]);
        assert!(matches!(result, Err(Error::RequestConstruction { .. })));
    }

    #[test]
    fn test_decode_get_data_lowercase_keys() {
        let body = br#"{"status":"success","answer":{"status":"success","result":{"fqdn":"example.com","records":{"TXT":["v=spf1"]}}}}"#;
        let envelope: GetDataResponse = decode(GET_DATA_ENDPOINT, body).unwrap();

        assert!(envelope.is_success());
        let data = envelope.into_result().unwrap();
        assert_eq!(data.fqdn, "example.com");
        assert_eq!(data.records.unwrap()["TXT"].get(), r#"["v=spf1"]"#);
    }

    #[test]
    fn test_decode_get_data_capitalized_keys() {
        let body = br#"{"Status":"success","Answer":{"Status":"success","Result":{"fqdn":"example.com","Records":{}}}}"#;
        let envelope: GetDataResponse = decode(GET_DATA_ENDPOINT, body).unwrap();

        assert!(envelope.is_success());
        assert!(envelope.into_result().unwrap().records.unwrap().is_empty());
    }

    #[test]
    fn test_decode_get_data_without_result() {
        let body = br#"{"status":"success","answer":{"status":"success"}}"#;
        let envelope: GetDataResponse = decode(GET_DATA_ENDPOINT, body).unwrap();

        assert!(envelope.is_success());
        assert!(envelope.into_result().is_none());
    }

    #[test]
    fn test_decode_get_data_array_records_is_error() {
        let body = br#"{"status":"success","answer":{"status":"success","result":{"fqdn":"example.com","records":[]}}}"#;
        let result = decode::<GetDataResponse>(GET_DATA_ENDPOINT, body);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_decode_error_envelope_is_not_success() {
        let body = br#"{"status":"error","error_text":"No such method","error_code":"INVALID_DATA"}"#;
        let envelope: ChangeRecordsResponse = decode(CHANGE_RECORDS_ENDPOINT, body).unwrap();
        assert!(!envelope.is_success());

        let body = br#"{"status":"success","answer":{"status":"error","errors":[{"error_code":"INVALID_DATA"}]}}"#;
        let envelope: ChangeRecordsResponse = decode(CHANGE_RECORDS_ENDPOINT, body).unwrap();
        assert!(!envelope.is_success());
    }

    #[test]
    fn test_decode_change_records_result() {
        let body = br#"{"status":"success","answer":{"status":"success","result":true}}"#;
        let envelope: ChangeRecordsResponse = decode(CHANGE_RECORDS_ENDPOINT, body).unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.into_result(), Some(true));
    }

    #[test]
    fn test_decode_malformed_json() {
        let result: Result<GetDataResponse> = decode(GET_DATA_ENDPOINT, b"<html>oops</html>");
        match result {
            Err(Error::Decode { endpoint, .. }) => assert_eq!(endpoint, GET_DATA_ENDPOINT),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
