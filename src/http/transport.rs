// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pluggable transport for dispatching a built request

use async_trait::async_trait;

/// Sends one fully built request and returns the response head plus its
/// unread body stream.
///
/// Implemented for [`reqwest::Client`], so a preconfigured client (shared
/// connection pool, proxy, custom TLS) can be passed straight into a
/// [`RequestSpec`](crate::RequestSpec). Implementations are shared via `Arc`
/// and may be called concurrently; any synchronization is theirs.
///
/// # Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use restease::Transport;
///
/// struct Tagged {
///     inner: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl Transport for Tagged {
///     async fn round_trip(&self, mut request: reqwest::Request) -> reqwest::Result<reqwest::Response> {
///         request
///             .headers_mut()
///             .insert("x-via", reqwest::header::HeaderValue::from_static("tagged"));
///         self.inner.execute(request).await
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Dispatch the request
    async fn round_trip(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn round_trip(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.execute(request).await
    }
}
