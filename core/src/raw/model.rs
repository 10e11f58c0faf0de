//! # Raw Documentation Data
//!
//! The shape of one captured HTTP exchange as handed over by the capture layer.
//!
//! Fields that validation must be able to report as missing are `Option`s, so a
//! record deserialized from partial JSON still reaches the factory's checks.

use crate::params::QueryStringConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Captured header values keyed by header name.
pub type RawHeaders = IndexMap<String, Value>;

/// One HTTP operation's captured exchange plus author-supplied overlays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocData {
    /// The documented path template (e.g. `/users/{id}`).
    pub path: String,
    /// The captured request and response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<RawResults>,
    /// Path and query parameter descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<RawParameters>,
    /// Request body overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RawBody>,
    /// Request header overlays keyed by header name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<IndexMap<String, RawHeader>>,
    /// Response header overlays keyed by header name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<IndexMap<String, RawHeader>>,
    /// Response body overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<RawBody>,
    /// Response status overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<RawStatus>,
}

/// The captured request/response pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResults {
    /// Captured request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req: Option<RawRequest>,
    /// Captured response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res: Option<RawResponse>,
}

/// A captured request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRequest {
    /// HTTP method as sent (any case).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Request headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<RawHeaders>,
    /// Request payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A captured response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    /// Response headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<RawHeaders>,
    /// HTTP status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Parameter descriptors attached by the test author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParameters {
    /// Names of templated path segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_parameters: Option<Vec<String>>,
    /// Query parameters sent with the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<QueryStringConfig>,
}

/// Body overlay: example data plus an optional description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBody {
    /// Example payload supplied by the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Header overlay supplied by the test author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHeader {
    /// Value the author expects. Not used for the example, which comes from
    /// the captured exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Header description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the header is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Whether the header is deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// Response status overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStatus {
    /// Status code being described.
    pub code: u16,
    /// Status description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RawDocData {
    /// Builds a record from a captured exchange with no overlays.
    pub fn captured(path: impl Into<String>, req: RawRequest, res: RawResponse) -> Self {
        Self {
            path: path.into(),
            results: Some(RawResults {
                req: Some(req),
                res: Some(res),
            }),
            ..Self::default()
        }
    }
}

impl RawRequest {
    /// A request with method, url and (empty) headers set.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            url: Some(url.into()),
            headers: Some(RawHeaders::new()),
            data: None,
        }
    }
}

impl RawResponse {
    /// A response with a status and (empty) headers set.
    pub fn new(status: u16) -> Self {
        Self {
            headers: Some(RawHeaders::new()),
            status: Some(status),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_capture_shape() {
        let raw = json!({
            "path": "/users/{id}",
            "results": {
                "req": { "method": "GET", "url": "/users/1", "headers": { "accept": "application/json" } },
                "res": { "headers": {}, "status": 200, "body": { "id": 1 } }
            },
            "parameters": { "pathParameters": ["id"] },
            "responseHeaders": { "x-rate-limit": { "value": "10", "description": "limit" } }
        });

        let record: RawDocData = serde_json::from_value(raw).unwrap();
        let results = record.results.as_ref().unwrap();
        assert_eq!(results.req.as_ref().unwrap().method.as_deref(), Some("GET"));
        assert_eq!(results.res.as_ref().unwrap().status, Some(200));
        assert_eq!(
            record.parameters.unwrap().path_parameters,
            Some(vec!["id".to_string()])
        );
        assert_eq!(
            record.response_headers.unwrap()["x-rate-limit"].description.as_deref(),
            Some("limit")
        );
    }

    #[test]
    fn test_partial_record_still_deserializes() {
        let record: RawDocData =
            serde_json::from_value(json!({ "path": "/x", "results": { "req": {} } })).unwrap();
        let req = record.results.unwrap().req.unwrap();
        assert!(req.method.is_none());
    }
}
