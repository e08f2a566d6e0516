//! Content-type negotiation for request bodies.

use std::fmt;

/// The negotiated body format of one request.
///
/// Resolved once per request from the inbound `Content-Type` header and then
/// matched exhaustively by the body handler.
///
/// # Example
///
/// ```rust
/// use crumb_extract::ContentType;
///
/// assert_eq!(ContentType::from_header(None), ContentType::Text);
/// assert_eq!(
///     ContentType::from_header(Some("application/json; charset=utf-8")),
///     ContentType::Json,
/// );
/// assert!(matches!(
///     ContentType::from_header(Some("image/png")),
///     ContentType::Unsupported(_),
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `text/plain`, also assumed when the header is absent
    Text,
    /// Anything else, holding the raw header value.
    Unsupported(String),
}

impl ContentType {
    /// Negotiates from the raw `Content-Type` header value.
    ///
    /// Only the media-type essence is compared, case-insensitively. A header
    /// that does not parse as a media type is unsupported.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::Text;
        };

        match raw.trim().parse::<mime::Mime>() {
            Ok(m) if m.type_() == mime::APPLICATION && m.subtype() == mime::JSON => Self::Json,
            Ok(m) if m.type_() == mime::TEXT && m.subtype() == mime::PLAIN => Self::Text,
            _ => Self::Unsupported(raw.to_string()),
        }
    }

    /// Negotiates from the raw header bytes.
    ///
    /// A header that is present but not valid UTF-8 is unsupported, never
    /// mistaken for an absent one.
    #[must_use]
    pub fn from_header_bytes(value: Option<&[u8]>) -> Self {
        let Some(bytes) = value else {
            return Self::Text;
        };
        match std::str::from_utf8(bytes) {
            Ok(raw) => Self::from_header(Some(raw)),
            Err(_) => Self::Unsupported(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Returns the canonical media type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => mime::APPLICATION_JSON.essence_str(),
            Self::Text => mime::TEXT_PLAIN.essence_str(),
            Self::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
