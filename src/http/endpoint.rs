//! Endpoint descriptors
//!
//! An `Endpoint` fully describes one outbound request before it is sent:
//! verb, path, ordered query pairs and an optional JSON body. The transport
//! re-issues the same descriptor on every rate-limit retry.

use crate::types::{JsonValue, Method};
use url::form_urlencoded;

/// One outbound request, immutable once handed to the client
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Endpoint {
    /// HTTP verb
    pub method: Method,
    /// Path relative to the configured origin
    pub path: String,
    /// Query parameters, in insertion order
    pub query: Vec<(String, String)>,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
}

impl Endpoint {
    /// Create an endpoint with an explicit method
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET `path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST `path`
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters
    #[must_use]
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Path plus the form-encoded query string, e.g. `/analytics/team/dau?startDate=30d`
    pub fn path_and_query(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        if self.query.is_empty() {
            return path;
        }

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{path}?{encoded}")
    }
}

#[cfg(test)]
mod endpoint_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_defaults() {
        let endpoint = Endpoint::get("/teams/members");
        assert_eq!(endpoint.method, Method::GET);
        assert!(endpoint.body.is_none());
        assert_eq!(endpoint.path_and_query(), "/teams/members");
    }

    #[test]
    fn test_endpoint_adds_leading_slash() {
        assert_eq!(Endpoint::get("teams/groups").path_and_query(), "/teams/groups");
    }

    #[test]
    fn test_endpoint_query_keeps_order_and_encodes() {
        let endpoint = Endpoint::get("/analytics/team/dau")
            .query("startDate", "30d")
            .query("endDate", "today")
            .query("users", "a@x.com,b@x.com");

        assert_eq!(
            endpoint.path_and_query(),
            "/analytics/team/dau?startDate=30d&endDate=today&users=a%40x.com%2Cb%40x.com"
        );
    }

    #[test]
    fn test_endpoint_post_body() {
        let endpoint = Endpoint::post("/teams/spend").json(json!({"page": 1}));
        assert_eq!(endpoint.method, Method::POST);
        assert_eq!(endpoint.body, Some(json!({"page": 1})));
    }
}
