//! Case-insensitive header multi-map.
//!
//! [`Headers`] is the header container of the wire [`Response`](crate::Response)
//! and of the response builder. Names are keyed by their lower-cased form, so
//! `Content-Type`, `content-type` and `CONTENT-TYPE` all address one entry.
//! The casing of the first write is kept for output.

use indexmap::map::Entry;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

/// A multi-map of HTTP headers with case-insensitive names.
///
/// Iteration order is insertion order of the logical header names.
///
/// # Example
///
/// ```rust
/// use crumb_core::Headers;
///
/// let mut headers = Headers::new();
/// headers.set("content-type", "text/plain");
/// headers.set("CONTENT-TYPE", "application/json");
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("Content-Type"), Some("application/json"));
///
/// headers.append("Set-Cookie", "a=1");
/// headers.append("set-cookie", "b=2");
/// assert_eq!(headers.get_all("Set-Cookie"), vec!["a=1", "b=2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: IndexMap<String, HeaderEntry>,
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing every existing value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.entry(normalize(&name)) {
            Entry::Occupied(mut e) => {
                let entry = e.get_mut();
                entry.values.clear();
                entry.values.push(value);
            }
            Entry::Vacant(e) => {
                e.insert(HeaderEntry {
                    name,
                    values: vec![value],
                });
            }
        }
    }

    /// Adds a value without replacing existing ones.
    ///
    /// Each appended value is emitted as its own header line.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        self.inner
            .entry(normalize(&name))
            .or_insert_with(|| HeaderEntry {
                name,
                values: Vec::new(),
            })
            .values
            .push(value);
    }

    /// Returns the last value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&normalize(name))
            .and_then(|e| e.values.last())
            .map(String::as_str)
    }

    /// Returns every value stored under `name`, oldest first.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.inner
            .get(&normalize(name))
            .map(|e| e.values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns true if a header with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&normalize(name))
    }

    /// Removes a header, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.inner.shift_remove(&normalize(name)).map(|e| e.values)
    }

    /// Returns the number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(display name, value)` pairs, one per header line.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.values().flat_map(|e| {
            e.values
                .iter()
                .map(move |v| (e.name.as_str(), v.as_str()))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (k, v) in iter {
            headers.append(k, v);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_set_overwrites_regardless_of_case() {
        let mut headers = Headers::new();
        headers.set("content-type", "text/plain");
        headers.set("CONTENT-TYPE", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get_all("Content-Type"), vec!["application/json"]);
    }

    #[test]
    fn test_first_casing_is_kept_for_output() {
        let mut headers = Headers::new();
        headers.set("X-Request-Id", "1");
        headers.set("x-request-id", "2");

        let lines: Vec<_> = headers.iter().collect();
        assert_eq!(lines, vec![("X-Request-Id", "2")]);
    }

    #[test]
    fn test_append_keeps_separate_lines() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Set-Cookie"), Some("b=2"));
        assert_eq!(headers.iter().count(), 2);
    }

    #[test]
    fn test_set_after_append_replaces_all() {
        let mut headers = Headers::new();
        headers.append("Vary", "Accept");
        headers.append("Vary", "Cookie");
        headers.set("vary", "Origin");

        assert_eq!(headers.get_all("VARY"), vec!["Origin"]);
    }

    #[test]
    fn test_remove_and_contains() {
        let mut headers: Headers = [("Location", "/a"), ("Allow", "GET")].into_iter().collect();
        assert!(headers.contains("location"));
        assert_eq!(headers.remove("LOCATION"), Some(vec!["/a".to_string()]));
        assert!(!headers.contains("Location"));
        assert_eq!(headers.len(), 1);
        assert!(headers.get("missing").is_none());
        assert!(headers.get_all("missing").is_empty());
    }

    fn mixed_case(name: &str, mask: u64) -> String {
        name.chars()
            .enumerate()
            .map(|(i, c)| {
                if mask & (1 << (i % 64)) != 0 {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn test_any_casing_addresses_one_entry(
            name in "[A-Za-z][A-Za-z-]{0,20}",
            first in any::<u64>(),
            second in any::<u64>(),
            a in "[ -~]{0,16}",
            b in "[ -~]{0,16}",
        ) {
            let mut headers = Headers::new();
            headers.set(mixed_case(&name, first), a);
            headers.set(mixed_case(&name, second), b.clone());

            prop_assert_eq!(headers.len(), 1);
            prop_assert_eq!(headers.get(&name.to_ascii_uppercase()), Some(b.as_str()));
            prop_assert_eq!(headers.get_all(&name.to_ascii_lowercase()).len(), 1);
        }
    }
}
