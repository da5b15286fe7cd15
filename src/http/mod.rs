// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for restease
//!
//! Builds a single request from a [`RequestSpec`], dispatches it through a
//! [`Transport`], and hands back a [`Response`] whose body is already fully
//! buffered.

mod cookie;
mod executor;
mod request;
mod response;
mod transport;

pub use cookie::{Cookie, CookieJar, SameSite};
pub use executor::{execute, execute_blocking};
pub use request::{BasicAuth, RequestSpec};
pub use response::Response;
pub use transport::Transport;

/// Re-exported so callers can implement or pass any cookie store
pub use reqwest::cookie::CookieStore;

/// User agent sent by the default transport
pub const DEFAULT_USER_AGENT: &str = concat!("restease/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
}
