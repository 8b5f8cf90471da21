//! Import map: bare package specifier to resolved CDN URL.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from package specifier to script URL.
///
/// Insertion order is preserved; replacing the URL of an existing specifier
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportMap(IndexMap<String, String>);

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, specifier: &str) -> Option<&str> {
        self.0.get(specifier).map(String::as_str)
    }

    pub fn contains(&self, specifier: &str) -> bool {
        self.0.contains_key(specifier)
    }

    /// Inserts or replaces an entry, returning the previous URL.
    pub fn insert(&mut self, specifier: impl Into<String>, url: impl Into<String>) -> Option<String> {
        self.0.insert(specifier.into(), url.into())
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, specifier: &str) -> Option<String> {
        self.0.shift_remove(specifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn specifiers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overwrites the entries present in `entries`, leaving all others untouched.
    pub fn merge(&mut self, entries: ImportMap) {
        for (specifier, url) in entries.0 {
            self.0.insert(specifier, url);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ImportMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unrelated_entries_and_positions() {
        let mut map: ImportMap = [("react", "a"), ("dayjs", "d"), ("antd", "c")]
            .into_iter()
            .collect();

        map.merge([("antd", "c2")].into_iter().collect());

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("react", "a"), ("dayjs", "d"), ("antd", "c2")]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut map: ImportMap = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(map.remove("b").as_deref(), Some("2"));
        assert_eq!(map.specifiers().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_serializes_as_plain_object_in_order() {
        let map: ImportMap = [("react", "r"), ("antd", "a")].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"react":"r","antd":"a"}"#);

        let back: ImportMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
