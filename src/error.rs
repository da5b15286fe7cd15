// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for restease
//!
//! Every failure of a request falls into one of three classes, see
//! [`ErrorKind`]. Non-2xx HTTP statuses are never errors: they come back as a
//! normal [`Response`](crate::Response).

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for restease operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for restease
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP method is not a valid token
    #[error("Invalid HTTP method '{method}': {reason}")]
    InvalidMethod { method: String, reason: String },

    /// `base_url + path` did not parse as an absolute URL
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Header name or value rejected
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Reading the caller's request body stream failed
    #[error("Failed to read request body: {0}")]
    RequestBody(#[source] std::io::Error),

    /// Default HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Blocking runtime could not be started
    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Request dispatch failed (DNS, connect, TLS, protocol)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Whole call exceeded the configured timeout
    #[error("Request timed out after {duration_ms}ms: {url}")]
    Timeout { duration_ms: u64, url: String },

    /// Response headers arrived but the body could not be read to the end
    #[error("Failed to read response body from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure class of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input; nothing was sent over the network
    Construction,
    /// Network, TLS, timeout or cancellation while dispatching
    Transport,
    /// Failure while draining the response body
    BodyRead,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Construction => write!(f, "construction"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::BodyRead => write!(f, "body read"),
        }
    }
}

impl Error {
    /// Create an invalid method error
    pub fn invalid_method(method: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::InvalidMethod {
            method: method.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(url: impl Into<String>, limit: Duration) -> Self {
        Error::Timeout {
            duration_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            url: url.into(),
        }
    }

    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidMethod { .. }
            | Error::InvalidUrl { .. }
            | Error::InvalidHeader { .. }
            | Error::RequestBody(_)
            | Error::ClientBuild(_)
            | Error::Runtime(_) => ErrorKind::Construction,
            Error::Transport(_) | Error::Timeout { .. } => ErrorKind::Transport,
            Error::BodyRead { .. } => ErrorKind::BodyRead,
        }
    }

    /// Check if the request was rejected before any network I/O
    pub fn is_construction(&self) -> bool {
        self.kind() == ErrorKind::Construction
    }

    /// Check if dispatch failed
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Check if the response body could not be read
    pub fn is_body_read(&self) -> bool {
        self.kind() == ErrorKind::BodyRead
    }

    /// Check if this is a timeout, ours or one raised by the transport
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Transport(e) | Error::BodyRead { source: e, .. } => e.is_timeout(),
            _ => false,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::InvalidUrl { url, .. } => Some(url),
            Error::Timeout { url, .. } => Some(url),
            Error::BodyRead { url, .. } => Some(url),
            Error::Transport(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_errors() {
        let err = Error::invalid_method("BAD METHOD", "invalid token");
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert!(err.is_construction());
        assert!(!err.is_transport());

        let err = Error::RequestBody(std::io::Error::other("broken pipe"));
        assert!(err.is_construction());
        assert!(err.to_string().contains("broken pipe"));
    }

    #[test]
    fn test_invalid_url_error() {
        let source = url::Url::parse("no-scheme/path").unwrap_err();
        let err = Error::InvalidUrl {
            url: "no-scheme/path".to_string(),
            source,
        };

        assert!(err.is_construction());
        assert_eq!(err.url(), Some("no-scheme/path"));
    }

    #[test]
    fn test_timeout_error() {
        let err = Error::timeout("http://localhost/slow", Duration::from_millis(1500));

        assert!(err.is_timeout());
        assert!(err.is_transport());
        assert_eq!(err.url(), Some("http://localhost/slow"));
        assert_eq!(
            err.to_string(),
            "Request timed out after 1500ms: http://localhost/slow"
        );
    }

    #[test]
    fn test_timeout_millis_saturate() {
        let err = Error::timeout("http://localhost/", Duration::MAX);

        match err {
            Error::Timeout { duration_ms, .. } => assert_eq!(duration_ms, u64::MAX),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Construction.to_string(), "construction");
        assert_eq!(ErrorKind::Transport.to_string(), "transport");
        assert_eq!(ErrorKind::BodyRead.to_string(), "body read");
    }
}
