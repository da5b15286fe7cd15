// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Single-request executor
//!
//! `Idle -> Built -> Dispatched -> BodyRead -> Done`; the first failing step
//! ends the call. Nothing is retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::cookie::CookieStore;
use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::request::{Prepared, RequestSpec};
use super::response::Response;
use super::transport::Transport;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// Send one request and buffer its whole body.
///
/// Non-2xx statuses are returned as a normal [`Response`]. The response
/// stream never outlives this call: it is drained and dropped on success,
/// on a failed body read, on timeout, and when the returned future is
/// dropped before completion.
///
/// # Example
///
/// ```rust,no_run
/// use restease::{execute, RequestSpec};
///
/// #[tokio::main]
/// async fn main() -> restease::Result<()> {
///     let response = execute(
///         RequestSpec::get("https://example.com", "/api/items")
///             .header("Accept", "application/json")
///             .basic_auth("user", "secret"),
///     )
///     .await?;
///
///     println!("{} ({} bytes)", response.status, response.body_len());
///     Ok(())
/// }
/// ```
pub async fn execute(spec: RequestSpec) -> Result<Response> {
    let Prepared {
        mut request,
        transport,
        cookie_jar,
        timeout,
    } = spec.prepare()?;

    // The default client walks redirects with the jar itself; a custom
    // transport only gets the first request's cookies and the final response.
    let (transport, store_cookies): (Arc<dyn Transport>, bool) = match transport {
        Some(transport) => (transport, true),
        None => (Arc::new(default_client(cookie_jar.clone())?), false),
    };

    if let Some(jar) = cookie_jar.as_deref() {
        attach_cookies(&mut request, jar)?;
    }

    let url = request.url().to_string();
    debug!(
        method = %request.method(),
        url = %url,
        has_body = request.body().is_some(),
        timeout_ms = timeout.map(millis),
        "Dispatching request"
    );

    let start = Instant::now();
    let store = cookie_jar.as_deref().filter(|_| store_cookies);
    let exchange = round_trip(transport.as_ref(), request, store, start);
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, exchange).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(url.as_str(), limit)),
        },
        None => exchange.await,
    };

    match &result {
        Ok(response) => debug!(
            url = %url,
            status = response.status_code(),
            bytes = response.body_len(),
            elapsed_ms = millis(response.elapsed),
            "Request completed"
        ),
        Err(e) => warn!(url = %url, kind = %e.kind(), error = %e, "Request failed"),
    }

    result
}

impl RequestSpec {
    /// Send this request; shorthand for [`execute`]
    pub async fn send(self) -> Result<Response> {
        execute(self).await
    }
}

/// Blocking variant of [`execute`].
///
/// Runs the request on a private current-thread runtime and blocks the
/// calling thread until the body is buffered. Panics if called from within
/// an async runtime; use [`execute`] there. A custom transport must not
/// hold pooled connections bound to another, already stopped runtime.
pub fn execute_blocking(spec: RequestSpec) -> Result<Response> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    runtime.block_on(execute(spec))
}

/// Client used when the spec carries no transport, scoped to one call.
/// Given a jar, it reads and updates it on every redirect hop.
fn default_client(cookie_jar: Option<Arc<dyn CookieStore>>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
    builder = match cookie_jar {
        Some(jar) => builder.cookie_provider(Arc::new(SharedStore(jar))),
        None => builder.cookie_store(false),
    };
    builder.build().map_err(Error::ClientBuild)
}

/// Sized handle so a `dyn CookieStore` can back a client's cookie provider
struct SharedStore(Arc<dyn CookieStore>);

impl CookieStore for SharedStore {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.0.set_cookies(cookie_headers, url)
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.0.cookies(url)
    }
}

/// Add the jar's cookies for the first request, after any the caller set
fn attach_cookies(request: &mut reqwest::Request, jar: &dyn CookieStore) -> Result<()> {
    let Some(stored) = jar.cookies(request.url()) else {
        return Ok(());
    };

    let merged = match request.headers().get(COOKIE) {
        Some(caller) if !caller.is_empty() => {
            let mut bytes = caller.as_bytes().to_vec();
            bytes.extend_from_slice(b"; ");
            bytes.extend_from_slice(stored.as_bytes());
            HeaderValue::from_bytes(&bytes).map_err(|e| Error::invalid_header(COOKIE.as_str(), e))?
        }
        _ => stored,
    };
    request.headers_mut().insert(COOKIE, merged);
    Ok(())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

async fn round_trip(
    transport: &dyn Transport,
    request: reqwest::Request,
    cookie_jar: Option<&dyn CookieStore>,
    start: Instant,
) -> Result<Response> {
    let response = transport.round_trip(request).await?;

    let status = response.status();
    let version = response.version();
    let headers = response.headers().clone();
    let final_url = response.url().clone();

    if let Some(jar) = cookie_jar {
        let mut set_cookies = headers.get_all(SET_COOKIE).iter();
        jar.set_cookies(&mut set_cookies, &final_url);
    }

    // Consumes the response; the stream is released whether or not this succeeds
    let body = response.bytes().await.map_err(|source| Error::BodyRead {
        url: final_url.to_string(),
        source,
    })?;

    Ok(Response::new(
        status,
        version,
        headers,
        body,
        final_url,
        start.elapsed(),
    ))
}
