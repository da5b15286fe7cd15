// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory cookie jar usable as a request's cookie store

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// Sent only to the exact host that set it (no Domain attribute)
    #[serde(default)]
    pub host_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    #[default]
    None,
    Lax,
    Strict,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
            host_only: false,
            same_site: SameSite::default(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Restrict the cookie to the exact domain host
    pub fn host_only(mut self, host_only: bool) -> Self {
        self.host_only = host_only;
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp <= Utc::now())
    }

    /// Check if the cookie should be sent to the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        self.domain_matches(host)
            && self.path_matches(url.path())
            && (!self.secure || url.scheme() == "https")
            && !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }

        if self.host_only {
            return host.eq_ignore_ascii_case(&self.domain);
        }
        domain_match(host, &self.domain)
    }

    // "/docs" matches "/docs", "/docs/" and "/docs/x" but not "/docsearch"
    fn path_matches(&self, request_path: &str) -> bool {
        if request_path == self.path {
            return true;
        }
        request_path.starts_with(&self.path)
            && (self.path.ends_with('/') || request_path[self.path.len()..].starts_with('/'))
    }

    /// Parse a Set-Cookie header value received from `url`
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));
        let host = url.host_str().unwrap_or("");
        cookie.domain = host.to_string();
        cookie.host_only = true;
        cookie.path = default_path(url);

        let mut max_age = None;
        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_ascii_lowercase().as_str() {
                    "domain" if !val.is_empty() => {
                        let domain = val.trim_start_matches('.');
                        // A host may only set cookies for itself or a parent domain
                        if !domain_match(host, domain) {
                            return None;
                        }
                        cookie.domain = domain.to_ascii_lowercase();
                        cookie.host_only = false;
                    }
                    "path" if val.starts_with('/') => cookie.path = val.to_string(),
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                            cookie.expires = Some(dt.with_timezone(&Utc));
                        }
                    }
                    "max-age" => max_age = val.parse::<i64>().ok(),
                    "samesite" => {
                        cookie.same_site = match val.to_ascii_lowercase().as_str() {
                            "strict" => SameSite::Strict,
                            "lax" => SameSite::Lax,
                            _ => SameSite::None,
                        };
                    }
                    _ => {}
                }
            } else {
                match part.to_ascii_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        // Max-Age wins over Expires
        if let Some(secs) = max_age {
            let expires = chrono::Duration::try_seconds(secs.max(0))
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            cookie.expires = Some(expires);
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

// RFC 6265 section 5.1.3; IP hosts only match themselves
fn domain_match(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.');
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }
    if host.parse::<std::net::IpAddr>().is_ok() || host.starts_with('[') {
        return false;
    }
    host.to_ascii_lowercase()
        .ends_with(&format!(".{}", domain.to_ascii_lowercase()))
}

// Directory of the request path, per RFC 6265 section 5.1.4
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Thread-safe cookie storage
///
/// Pass it to [`RequestSpec::cookie_jar`](crate::RequestSpec::cookie_jar) to
/// send stored cookies and keep the ones a response sets.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    /// Cookies stored by domain
    cookies: Arc<DashMap<String, Vec<Cookie>>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing one with the same name and path.
    /// An already expired cookie only removes its predecessor.
    pub fn add(&self, cookie: Cookie) {
        let mut entry = self.cookies.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        if !cookie.is_expired() {
            entry.push(cookie);
        }
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        if let Some(cookie) = Cookie::parse(header, url) {
            self.add(cookie);
        }
    }

    /// Get all cookies for a URL, longest path first
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.remove_expired();

        let mut result: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|c| c.matches(url))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        result.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        result
    }

    /// Get Cookie header value for a URL
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(|c| c.to_header_value())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Remove a specific cookie
    pub fn remove(&self, name: &str, domain: &str, path: &str) {
        if let Some(mut cookies) = self.cookies.get_mut(domain) {
            cookies.retain(|c| c.name != name || c.path != path);
        }
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
    }

    fn remove_expired(&self) {
        for mut entry in self.cookies.iter_mut() {
            entry.value_mut().retain(|c| !c.is_expired());
        }
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all_cookies: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        serde_json::to_string(&all_cookies)
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let jar = CookieJar::new();
        for cookie in cookies {
            jar.add(cookie);
        }
        Ok(jar)
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            if let Ok(value) = header.to_str() {
                self.add_from_header(value, url);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.get_cookie_header(url)
            .and_then(|header| HeaderValue::from_str(&header).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let url = Url::parse("https://example.com/path").unwrap();
        let header = "session=abc123; Domain=example.com; Path=/; Secure; HttpOnly; SameSite=Lax";
        let cookie = Cookie::parse(header, &url).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, SameSite::Lax);
    }

    #[test]
    fn test_huge_max_age_does_not_overflow() {
        let url = Url::parse("http://example.com/").unwrap();

        let cookie = Cookie::parse("s=1; Max-Age=10000000000000", &url).unwrap();
        assert!(!cookie.is_expired());

        let cookie = Cookie::parse(&format!("s=1; Max-Age={}", i64::MAX), &url).unwrap();
        assert_eq!(cookie.expires, Some(DateTime::<Utc>::MAX_UTC));
        assert!(cookie.matches(&url));
    }

    #[test]
    fn test_foreign_domain_attribute_is_rejected() {
        let jar = CookieJar::new();
        let evil = Url::parse("http://evil.test/").unwrap();

        jar.add_from_header("sid=attacker; Domain=bank.test; Path=/", &evil);
        assert!(jar.is_empty());
        assert_eq!(
            jar.get_cookie_header(&Url::parse("http://bank.test/").unwrap()),
            None
        );

        // Suffix without a dot boundary is not a parent domain
        let url = Url::parse("http://notbank.test/").unwrap();
        assert!(Cookie::parse("sid=x; Domain=bank.test", &url).is_none());
    }

    #[test]
    fn test_parent_domain_attribute_is_accepted() {
        let url = Url::parse("http://api.example.com/").unwrap();
        let cookie = Cookie::parse("sid=1; Domain=.Example.com", &url).unwrap();

        assert_eq!(cookie.domain, "example.com");
        assert!(!cookie.host_only);
        assert!(cookie.matches(&Url::parse("http://www.example.com/").unwrap()));
    }

    #[test]
    fn test_cookie_without_domain_is_host_only() {
        let jar = CookieJar::new();
        jar.add_from_header("sid=1; Path=/", &Url::parse("http://example.com/").unwrap());

        assert_eq!(
            jar.get_cookie_header(&Url::parse("http://example.com/").unwrap()),
            Some("sid=1".to_string())
        );
        assert_eq!(
            jar.get_cookie_header(&Url::parse("http://api.example.com/").unwrap()),
            None
        );
    }

    #[test]
    fn test_ip_host_does_not_match_as_parent() {
        let url = Url::parse("http://10.0.0.1/").unwrap();
        assert!(Cookie::parse("sid=1; Domain=0.0.1", &url).is_none());
        assert!(Cookie::parse("sid=1; Domain=10.0.0.1", &url).is_some());
    }

    #[test]
    fn test_default_path() {
        let url = Url::parse("http://example.com/api/login").unwrap();
        let cookie = Cookie::parse("token=x", &url).unwrap();
        assert_eq!(cookie.path, "/api");

        let url = Url::parse("http://example.com/login").unwrap();
        let cookie = Cookie::parse("token=x", &url).unwrap();
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn test_malformed_cookie_is_ignored() {
        let url = Url::parse("http://example.com/").unwrap();
        assert!(Cookie::parse("novalue", &url).is_none());
        assert!(Cookie::parse("=value", &url).is_none());
    }

    #[test]
    fn test_path_matching() {
        let cookie = Cookie::new("a", "1").domain("example.com").path("/docs");

        assert!(cookie.matches(&Url::parse("http://example.com/docs").unwrap()));
        assert!(cookie.matches(&Url::parse("http://example.com/docs/web").unwrap()));
        assert!(!cookie.matches(&Url::parse("http://example.com/docsearch").unwrap()));
        assert!(!cookie.matches(&Url::parse("http://example.com/").unwrap()));
    }

    #[test]
    fn test_secure_cookie_needs_https() {
        let cookie = Cookie::new("a", "1").domain("example.com").secure(true);

        assert!(cookie.matches(&Url::parse("https://example.com/").unwrap()));
        assert!(!cookie.matches(&Url::parse("http://example.com/").unwrap()));
    }

    #[test]
    fn test_subdomain_matching() {
        let cookie = Cookie::new("a", "1").domain(".example.com");

        assert!(cookie.matches(&Url::parse("http://api.example.com/").unwrap()));
        assert!(cookie.matches(&Url::parse("http://example.com/").unwrap()));
        assert!(!cookie.matches(&Url::parse("http://badexample.com/").unwrap()));
    }

    #[test]
    fn test_cookie_jar() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.com/path").unwrap();

        jar.add(Cookie::new("test", "value").domain("example.com"));
        jar.add(Cookie::new("test", "replaced").domain("example.com"));
        assert_eq!(jar.len(), 1);

        let cookies = jar.get_cookies(&url);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value, "replaced");

        jar.remove("test", "example.com", "/");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_max_age_zero_deletes_cookie() {
        let jar = CookieJar::new();
        let url = Url::parse("http://example.com/").unwrap();

        jar.add_from_header("session=abc; Path=/", &url);
        assert_eq!(jar.len(), 1);

        jar.add_from_header("session=; Path=/; Max-Age=0", &url);
        assert!(jar.is_empty());
    }

    #[test]
    fn test_cookie_store_round_trip() {
        let jar = CookieJar::new();
        let url = Url::parse("http://127.0.0.1:8080/login").unwrap();
        let headers = [
            HeaderValue::from_static("session=abc; Path=/"),
            HeaderValue::from_static("theme=dark; Path=/"),
        ];

        jar.set_cookies(&mut headers.iter(), &url);
        assert_eq!(jar.len(), 2);

        let header = jar
            .cookies(&Url::parse("http://127.0.0.1:8080/me").unwrap())
            .unwrap();
        let header = header.to_str().unwrap();
        assert!(header.contains("session=abc"));
        assert!(header.contains("theme=dark"));
    }

    #[test]
    fn test_json_export_import() {
        let jar = CookieJar::new();
        jar.add(Cookie::new("a", "1").domain("example.com"));

        let json = jar.to_json().unwrap();
        let restored = CookieJar::from_json(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(
            restored.get_cookie_header(&Url::parse("http://example.com/").unwrap()),
            Some("a=1".to_string())
        );
    }
}
