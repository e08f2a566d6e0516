//! Request cookies and `Set-Cookie` values.
//!
//! [`Cookies`] reads the inbound `Cookie` header. [`SetCookie`] formats one
//! `Set-Cookie` header value; the response builder appends each one as a
//! separate header line.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Cookies sent by the client.
///
/// # Example
///
/// ```rust
/// use crumb_extract::Cookies;
///
/// let cookies = Cookies::parse("session=abc123; theme=\"dark\"");
/// assert_eq!(cookies.get("session"), Some("abc123"));
/// assert_eq!(cookies.get("theme"), Some("dark"));
/// assert!(cookies.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    cookies: HashMap<String, String>,
}

impl Cookies {
    /// Creates an empty cookie set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `Cookie` header value. Pairs without `=` are ignored.
    #[must_use]
    pub fn parse(header_value: &str) -> Self {
        let cookies = header_value
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .map(|(name, value)| {
                (
                    name.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                )
            })
            .collect();
        Self { cookies }
    }

    /// Returns a cookie value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns true if the cookie exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Iterates over all cookies.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of cookies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true if there are no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Sent with cross-site requests.
    None,
    /// Sent with same-site requests and top-level navigations.
    #[default]
    Lax,
    /// Sent with same-site requests only.
    Strict,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Lax => f.write_str("Lax"),
            Self::Strict => f.write_str("Strict"),
        }
    }
}

/// Builder for one `Set-Cookie` header value.
///
/// # Example
///
/// ```rust
/// use crumb_extract::{SameSite, SetCookie};
///
/// let cookie = SetCookie::new("session", "abc123")
///     .http_only(true)
///     .secure(true)
///     .same_site(SameSite::Strict)
///     .max_age_secs(3600)
///     .path("/");
///
/// assert_eq!(
///     cookie.to_header_value(),
///     "session=abc123; Path=/; Max-Age=3600; Secure; HttpOnly; SameSite=Strict",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: String,
    domain: Option<String>,
    path: Option<String>,
    max_age: Option<Duration>,
    expires: Option<String>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl SetCookie {
    /// Creates a cookie with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            max_age: None,
            expires: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Creates a cookie that tells the client to drop `name`.
    #[must_use]
    pub fn remove(name: impl Into<String>) -> Self {
        Self::new(name, "").path("/").max_age_secs(0)
    }

    /// Sets the `Domain` attribute.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the `Path` attribute.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the `Max-Age` attribute.
    #[must_use]
    pub fn max_age(mut self, duration: Duration) -> Self {
        self.max_age = Some(duration);
        self
    }

    /// Sets the `Max-Age` attribute in seconds.
    #[must_use]
    pub fn max_age_secs(self, seconds: u64) -> Self {
        self.max_age(Duration::from_secs(seconds))
    }

    /// Sets the `Expires` attribute, an HTTP date.
    #[must_use]
    pub fn expires(mut self, date: impl Into<String>) -> Self {
        self.expires = Some(date.into());
        self
    }

    /// Sets the `Secure` flag.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the `HttpOnly` flag.
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets the `SameSite` attribute.
    #[must_use]
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Returns the cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Formats the `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut parts = vec![format!("{}={}", self.name, self.value)];

        if let Some(ref domain) = self.domain {
            parts.push(format!("Domain={domain}"));
        }
        if let Some(ref path) = self.path {
            parts.push(format!("Path={path}"));
        }
        if let Some(max_age) = self.max_age {
            parts.push(format!("Max-Age={}", max_age.as_secs()));
        }
        if let Some(ref expires) = self.expires {
            parts.push(format!("Expires={expires}"));
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        if let Some(same_site) = self.same_site {
            parts.push(format!("SameSite={same_site}"));
        }

        parts.join("; ")
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_malformed_pairs() {
        let cookies = Cookies::parse("a=1; broken; b = 2 ;");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get("b"), Some("2"));
        assert!(!cookies.contains("broken"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(Cookies::parse("").is_empty());
    }

    #[test]
    fn test_set_cookie_minimal() {
        assert_eq!(SetCookie::new("id", "7").to_header_value(), "id=7");
    }

    #[test]
    fn test_set_cookie_all_attributes() {
        let cookie = SetCookie::new("id", "7")
            .domain("example.com")
            .path("/app")
            .max_age_secs(60)
            .expires("Wed, 21 Oct 2026 07:28:00 GMT")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::None);

        assert_eq!(
            cookie.to_string(),
            "id=7; Domain=example.com; Path=/app; Max-Age=60; \
             Expires=Wed, 21 Oct 2026 07:28:00 GMT; Secure; HttpOnly; SameSite=None"
        );
    }

    #[test]
    fn test_remove_cookie() {
        let cookie = SetCookie::remove("session");
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.to_header_value(), "session=; Path=/; Max-Age=0");
    }
}
