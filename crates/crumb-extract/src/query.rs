//! Parsed query-string parameters.

use crumb_core::CrumbError;
use serde::de::DeserializeOwned;

/// Query parameters from the request URL, in order of appearance.
///
/// Repeated keys keep every value. [`QueryParams::deserialize`] parses the
/// same query string into a typed struct.
///
/// # Example
///
/// ```rust
/// use crumb_extract::QueryParams;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct ListParams {
///     limit: Option<u32>,
///     search: Option<String>,
/// }
///
/// let query = QueryParams::parse(Some("limit=10&tag=a&tag=b&search=rust+lang"));
/// assert_eq!(query.get("limit"), Some("10"));
/// assert_eq!(query.get_all("tag"), vec!["a", "b"]);
/// assert_eq!(query.get("search"), Some("rust lang"));
///
/// let params: ListParams = query.deserialize().unwrap();
/// assert_eq!(params.limit, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    raw: String,
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses a raw query string (without the leading `?`).
    ///
    /// A query string that does not decode yields no pairs; the raw string
    /// is still kept.
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let raw = query.unwrap_or_default().to_string();
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(&raw).unwrap_or_default();
        Self { raw, pairs }
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `key`.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns true if `key` appears at least once.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns the raw query string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the query string had no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Deserializes the query string into `T`.
    ///
    /// A mismatch is a bad request.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, CrumbError> {
        serde_urlencoded::from_str(&self.raw)
            .map_err(|e| CrumbError::bad_request(format!("Invalid query string: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Paging {
        page: u32,
        #[serde(default)]
        size: Option<u32>,
    }

    #[test]
    fn test_parse_empty() {
        let query = QueryParams::parse(None);
        assert!(query.is_empty());
        assert_eq!(query.as_str(), "");
    }

    #[test]
    fn test_percent_decoding() {
        let query = QueryParams::parse(Some("q=caf%C3%A9&x=a%26b"));
        assert_eq!(query.get("q"), Some("café"));
        assert_eq!(query.get("x"), Some("a&b"));
        assert!(query.contains("x"));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_loose_pairs_are_kept() {
        let query = QueryParams::parse(Some("flag&&x=1&%zz=2"));
        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("x"), Some("1"));
        assert_eq!(query.as_str(), "flag&&x=1&%zz=2");
    }

    #[test]
    fn test_deserialize_typed() {
        let query = QueryParams::parse(Some("page=2"));
        let paging: Paging = query.deserialize().unwrap();
        assert_eq!(paging, Paging { page: 2, size: None });
    }

    #[test]
    fn test_deserialize_mismatch_is_bad_request() {
        let query = QueryParams::parse(Some("page=two"));
        let err = query.deserialize::<Paging>().unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }
}
