//! HTTP methods a route can be registered under.

use std::fmt;
use std::str::FromStr;

use http::Method;
use serde::{Deserialize, Serialize};

/// The closed set of methods a route definition may use.
///
/// Every route definition carries exactly one of these. `TRACE` and
/// `CONNECT` are not routable.
///
/// # Example
///
/// ```rust
/// use crumb_core::HttpMethod;
///
/// let method: HttpMethod = "post".parse().unwrap();
/// assert_eq!(method, HttpMethod::Post);
/// assert_eq!(method.as_str(), "POST");
/// assert_eq!(HttpMethod::try_from(&http::Method::HEAD), Ok(HttpMethod::Head));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
}

impl HttpMethod {
    /// All routable methods, in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
        Self::Head,
    ];

    /// Returns the upper-case method token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }

    /// Converts into the `http` crate's method type.
    #[must_use]
    pub fn to_http(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
            Self::Options => Method::OPTIONS,
            Self::Head => Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a method token is not routable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedMethod(s.to_string()))
    }
}

impl TryFrom<&Method> for HttpMethod {
    type Error = UnsupportedMethod;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match *method {
            Method::GET => Ok(Self::Get),
            Method::POST => Ok(Self::Post),
            Method::PUT => Ok(Self::Put),
            Method::PATCH => Ok(Self::Patch),
            Method::DELETE => Ok(Self::Delete),
            Method::OPTIONS => Ok(Self::Options),
            Method::HEAD => Ok(Self::Head),
            _ => Err(UnsupportedMethod(method.to_string())),
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        method.to_http()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("Delete".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert_eq!("OPTIONS".parse::<HttpMethod>(), Ok(HttpMethod::Options));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "TRACE".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err.0, "TRACE");
    }

    #[test]
    fn test_http_conversion() {
        for method in HttpMethod::ALL {
            let http = method.to_http();
            assert_eq!(HttpMethod::try_from(&http), Ok(method));
            assert_eq!(http.as_str(), method.as_str());
        }
        assert!(HttpMethod::try_from(&Method::CONNECT).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_serde_uses_tokens() {
        let json = serde_json::to_string(&HttpMethod::Head).unwrap();
        assert_eq!(json, "\"HEAD\"");
        let parsed: HttpMethod = serde_json::from_str("\"PUT\"").unwrap();
        assert_eq!(parsed, HttpMethod::Put);
    }
}
