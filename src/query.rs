//! Minimal ordered view of a URL query string.
//!
//! This is not a general query-string library: it supports exactly the
//! lookup, insert and remove operations the modal binding needs, and it
//! preserves the order of unrelated parameters so that rewriting one key
//! round-trips the rest of the URL unchanged.

use std::fmt;

/// Key/value pairs parsed from a URL query string, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    entries: Vec<(String, String)>,
}

impl QuerySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. A leading `?` is accepted and ignored.
    ///
    /// Segments without `=` become keys with an empty value, matching how
    /// browsers treat bare flags. A segment that fails to percent-decode is
    /// kept verbatim rather than dropped.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut entries = Vec::new();

        for segment in raw.split('&') {
            if segment.is_empty() {
                continue;
            }
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key, value),
                None => (segment, ""),
            };
            entries.push((decode_component(key), decode_component(value)));
        }

        Self { entries }
    }

    /// Value of the first entry for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key` to `value`, overwriting the first existing entry and
    /// dropping any duplicates, or appending if the key is absent.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut found = false;
        self.entries.retain_mut(|(k, v)| {
            if k.as_str() == key {
                if found {
                    return false;
                }
                found = true;
                *v = value.to_string();
            }
            true
        });
        if !found {
            self.entries.push((key.to_string(), value.to_string()));
        }
    }

    /// Remove every entry for `key`. No-op if the key is absent.
    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k.as_str() != key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize back to a query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&urlencoding::encode(key));
            out.push('=');
            out.push_str(&urlencoding::encode(value));
        }
        out
    }
}

impl fmt::Display for QuerySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Percent-decode one key or value, treating `+` as a space.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let params = QuerySet::parse("create-workspace=true&tab=billing");
        assert_eq!(params.get("create-workspace"), Some("true"));
        assert_eq!(params.get("tab"), Some("billing"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_parse_accepts_leading_question_mark() {
        let params = QuerySet::parse("?tab=billing");
        assert_eq!(params.get("tab"), Some("billing"));
    }

    #[test]
    fn test_parse_empty_and_bare_keys() {
        assert!(QuerySet::parse("").is_empty());
        assert!(QuerySet::parse("?").is_empty());

        let params = QuerySet::parse("flag&tab=billing&&x=");
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.get("x"), Some(""));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_parse_decodes_components() {
        let params = QuerySet::parse("name=hello%20world&plus=a+b");
        assert_eq!(params.get("name"), Some("hello world"));
        assert_eq!(params.get("plus"), Some("a b"));
    }

    #[test]
    fn test_set_overwrites_and_collapses_duplicates() {
        let mut params = QuerySet::parse("a=1&b=2&a=3");
        params.set("a", "9");
        assert_eq!(params.to_query_string(), "a=9&b=2");
    }

    #[test]
    fn test_set_appends_missing_key() {
        let mut params = QuerySet::parse("tab=billing");
        params.set("create-workspace", "true");
        assert_eq!(params.to_query_string(), "tab=billing&create-workspace=true");
    }

    #[test]
    fn test_remove_all_occurrences() {
        let mut params = QuerySet::parse("a=1&b=2&a=3");
        params.remove("a");
        assert_eq!(params.to_query_string(), "b=2");

        // Removing an absent key is a no-op.
        params.remove("a");
        assert_eq!(params.to_query_string(), "b=2");
    }

    #[test]
    fn test_serialize_preserves_order_and_encodes() {
        let mut params = QuerySet::new();
        params.set("q", "rust lang");
        params.set("tab", "billing");
        assert_eq!(params.to_query_string(), "q=rust%20lang&tab=billing");
        assert_eq!(params.to_string(), "q=rust%20lang&tab=billing");
    }

    #[test]
    fn test_rewrite_one_key_round_trips_the_rest() {
        let mut params = QuerySet::parse("create-workspace=true&tab=billing");
        params.remove("create-workspace");
        assert_eq!(params.to_query_string(), "tab=billing");
    }
}
