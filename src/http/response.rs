// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response with a fully buffered body

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};
use serde::de::DeserializeOwned;
use url::Url;

use super::headers::{CONTENT_LENGTH, CONTENT_TYPE, SET_COOKIE};

/// Response metadata plus the complete body
///
/// The network stream behind it has already been drained and released.
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Negotiated HTTP version
    pub version: Version,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
    /// Final URL (after redirects)
    pub url: Url,
    /// Time from dispatch to end of body
    pub elapsed: Duration,
}

impl Response {
    /// Create a new response
    pub fn new(
        status: StatusCode,
        version: Version,
        headers: HeaderMap,
        body: Bytes,
        url: Url,
        elapsed: Duration,
    ) -> Self {
        Self {
            status,
            version,
            headers,
            body,
            url,
            elapsed,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get body as text
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Check if content type is JSON
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json") || ct.contains("+json"))
            .unwrap_or(false)
    }

    /// Content length as announced by the server
    pub fn content_length(&self) -> Option<usize> {
        self.header(CONTENT_LENGTH).and_then(|v| v.parse().ok())
    }

    /// Get Set-Cookie headers
    pub fn set_cookies(&self) -> Vec<&str> {
        self.header_all(SET_COOKIE)
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Take ownership of the body
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response(status: StatusCode, headers: HeaderMap, body: &'static str) -> Response {
        Response::new(
            status,
            Version::HTTP_11,
            headers,
            Bytes::from(body),
            Url::parse("http://localhost/test").unwrap(),
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_response_status() {
        let resp = response(StatusCode::OK, HeaderMap::new(), "");
        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 200);

        let resp = response(StatusCode::BAD_REQUEST, HeaderMap::new(), "");
        assert!(resp.is_client_error());
        assert!(!resp.is_success());
    }

    #[test]
    fn test_response_text() {
        let resp = response(StatusCode::OK, HeaderMap::new(), "Test Response");
        assert_eq!(resp.text().unwrap(), "Test Response");
        assert_eq!(resp.body_len(), 13);
        assert_eq!(resp.into_body(), Bytes::from_static(b"Test Response"));
    }

    #[test]
    fn test_response_json() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let resp = response(StatusCode::OK, headers, r#"{"id": 7}"#);

        assert!(resp.is_json());
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_set_cookies() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        let resp = response(StatusCode::OK, headers, "");

        assert_eq!(resp.set_cookies(), vec!["a=1", "b=2"]);
    }
}
