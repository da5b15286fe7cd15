// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # restease - One-call HTTP requests
//!
//! Describe a request as a [`RequestSpec`] (base URL, path, method, body,
//! headers, basic auth, transport, cookie jar, timeout), hand it to
//! [`execute`], and get back a [`Response`] whose body is already fully read.
//! The live response stream never escapes the call, so there is nothing to
//! close.
//!
//! - No retries, no caching, no status-code policing: a 404 is a `Response`
//! - Errors are typed by phase: construction, transport, body read
//! - Optional custom [`Transport`] (any `reqwest::Client` works) and cookie
//!   store (the bundled [`CookieJar`] or `reqwest::cookie::Jar`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use restease::{execute, RequestSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = execute(
//!         RequestSpec::post("https://api.example.com", "/v1/items")
//!             .header("Content-Type", "application/json")
//!             .body(r#"{"name":"widget"}"#)
//!             .basic_auth("user", "secret")
//!             .timeout(Duration::from_secs(10)),
//!     )
//!     .await?;
//!
//!     if response.is_success() {
//!         let item: serde_json::Value = response.json()?;
//!         println!("created: {}", item);
//!     } else {
//!         println!("rejected with {}", response.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

// Errors
pub use error::{Error, ErrorKind, Result};

// HTTP
pub use http::{execute, execute_blocking};
pub use http::{BasicAuth, RequestSpec, Response, Transport};
pub use http::{Cookie, CookieJar, CookieStore, SameSite};

/// restease version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
