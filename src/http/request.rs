// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request parameters and request construction

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::cookie::CookieStore;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Body, Method};
use url::Url;

use super::headers::AUTHORIZATION;
use super::transport::Transport;
use crate::error::{Error, Result};

/// Basic authentication credentials
///
/// Always sent. Empty credentials still produce `Authorization: Basic Og==`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Basic base64(username:password)`, marked sensitive
    pub fn header_value(&self) -> Result<HeaderValue> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::try_from(format!("Basic {}", encoded))
            .map_err(|e| Error::invalid_header(AUTHORIZATION, e))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to issue one HTTP request
///
/// Consumed by [`execute`](crate::execute). Optional fields fall back as
/// follows: no transport builds a default client for the call only, no
/// cookie jar disables cookie handling, no timeout (or a zero one) waits
/// indefinitely.
pub struct RequestSpec {
    /// Scheme, host and optional prefix, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Appended verbatim to `base_url`; slashes are not normalized
    pub path: String,
    /// HTTP method; empty means `GET`
    pub method: String,
    /// Request payload; `None` sends no body
    pub body: Option<Body>,
    /// Headers, one value per name
    pub headers: HashMap<String, String>,
    /// Credentials, applied unconditionally
    pub basic_auth: BasicAuth,
    /// Transport used to dispatch the request
    pub transport: Option<Arc<dyn Transport>>,
    /// Cookie store consulted before and updated after the request
    pub cookie_jar: Option<Arc<dyn CookieStore>>,
    /// Limit for the whole call, including the body read
    pub timeout: Option<Duration>,
}

/// Built request plus the collaborators needed to dispatch it
pub(crate) struct Prepared {
    pub request: reqwest::Request,
    pub transport: Option<Arc<dyn Transport>>,
    pub cookie_jar: Option<Arc<dyn CookieStore>>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for Prepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prepared")
            .field("request", &self.request)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RequestSpec {
    /// Create a spec with an empty method (sent as `GET`)
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            method: String::new(),
            body: None,
            headers: HashMap::new(),
            basic_auth: BasicAuth::default(),
            transport: None,
            cookie_jar: None,
            timeout: None,
        }
    }

    /// Create a GET spec
    pub fn get(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(base_url, path).method("GET")
    }

    /// Create a POST spec
    pub fn post(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(base_url, path).method("POST")
    }

    /// Set the method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set a header, replacing any earlier value for the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set multiple headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Drain a reader into the request body
    pub fn body_reader<R: Read>(mut self, mut reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(Error::RequestBody)?;
        self.body = Some(Body::from(buf));
        Ok(self)
    }

    /// Set basic auth credentials
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = BasicAuth::new(username, password);
        self
    }

    /// Use a custom transport
    pub fn transport<T: Transport + 'static>(mut self, transport: Arc<T>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a cookie store
    pub fn cookie_jar<J: CookieStore + 'static>(mut self, jar: Arc<J>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Set timeout; zero disables it
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout).filter(|t| !t.is_zero());
        self
    }

    /// Target URL exactly as it will be parsed
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// Build the outgoing request. Fails without touching the network.
    pub(crate) fn prepare(self) -> Result<Prepared> {
        let method = parse_method(&self.method)?;

        let raw_url = self.url();
        let url = Url::parse(&raw_url).map_err(|source| Error::InvalidUrl {
            url: raw_url,
            source,
        })?;

        let mut request = reqwest::Request::new(method, url);

        let headers = request.headers_mut();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::invalid_header(name.as_str(), e))?;
            // Opaque bytes are allowed; only control characters are rejected
            let header_value = HeaderValue::from_bytes(value.as_bytes())
                .map_err(|e| Error::invalid_header(name.as_str(), e))?;
            headers.insert(header_name, header_value);
        }
        headers.insert(reqwest::header::AUTHORIZATION, self.basic_auth.header_value()?);

        *request.body_mut() = self.body;

        Ok(Prepared {
            request,
            transport: self.transport,
            cookie_jar: self.cookie_jar,
            timeout: self.timeout.filter(|t| !t.is_zero()),
        })
    }
}

impl fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("method", &self.method)
            .field("has_body", &self.body.is_some())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("basic_auth", &self.basic_auth)
            .field("custom_transport", &self.transport.is_some())
            .field("cookie_jar", &self.cookie_jar.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_method(method: &str) -> Result<Method> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes()).map_err(|e| Error::invalid_method(method, e))
}
