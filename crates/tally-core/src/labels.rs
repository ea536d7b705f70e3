//! Label sets and canonical metric keys.
//!
//! A label set is kept sorted by key so two equivalent sets built in any order
//! render and hash identically. The canonical key is `name` for an unlabeled
//! metric, otherwise `name|k1="v1",k2="v2"` with keys in lexicographic order.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

/// Sorted label set. Later duplicates of a key overwrite earlier ones; pairs
/// with an empty key are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        pairs.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `k1="v1",k2="v2"` with raw (unescaped) values.
    pub fn sorted_string(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{k}=\"{v}\"");
        }
        out
    }

    /// Storage identity for `name` under this label set.
    ///
    /// Values are joined unescaped, so a value containing `",` can collide
    /// with a different label set: `{a="1",b="2"}` and `{a="1\",b=\"2"}`
    /// share one key and therefore one entity.
    pub fn canonical_key(&self, name: &str) -> String {
        if self.is_empty() {
            name.to_string()
        } else {
            format!("{name}|{}", self.sorted_string())
        }
    }

    /// Exposition form: `{k="v",...}` with escaped values, or nothing when
    /// there are no labels and no `extra` pair.
    pub(crate) fn render(&self, extra: Option<(&str, &str)>) -> String {
        let mut parts: Vec<String> = self
            .iter()
            .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
            .collect();
        if let Some((k, v)) = extra {
            parts.push(format!("{k}=\"{}\"", escape_label(v)));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", parts.join(","))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = BTreeMap::new();
        for (k, v) in iter {
            let k = k.into();
            if k.is_empty() {
                continue;
            }
            map.insert(k, v.into());
        }
        Labels(map)
    }
}

/// Canonical key for `name` under raw label pairs.
pub fn canonical_key(name: &str, labels: &[(&str, &str)]) -> String {
    Labels::new(labels).canonical_key(name)
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlabeled_key_is_bare_name() {
        assert_eq!(canonical_key("up", &[]), "up");
    }

    #[test]
    fn key_is_order_independent() {
        let a = canonical_key("m", &[("a", "1"), ("b", "2")]);
        let b = canonical_key("m", &[("b", "2"), ("a", "1")]);
        assert_eq!(a, b);
        assert_eq!(a, r#"m|a="1",b="2""#);
    }

    #[test]
    fn unescaped_values_can_collide() {
        let split = canonical_key("m", &[("a", "1"), ("b", "2")]);
        let joined = canonical_key("m", &[("a", "1\",b=\"2")]);
        assert_eq!(split, joined);
    }

    #[test]
    fn empty_keys_are_dropped() {
        let labels = Labels::new(&[("", "x")]);
        assert!(labels.is_empty());
        assert_eq!(labels.canonical_key("m"), "m");
    }

    #[test]
    fn render_escapes_values() {
        let labels = Labels::new(&[("path", "a\"b\\c\nd")]);
        assert_eq!(labels.render(None), r#"{path="a\"b\\c\nd"}"#);
        assert_eq!(Labels::default().render(Some(("le", "+Inf"))), r#"{le="+Inf"}"#);
        assert_eq!(Labels::default().render(None), "");
    }
}
