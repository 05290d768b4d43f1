//! Path variables captured by a route match.

use serde::{Serialize, Serializer};

/// Variables extracted from a request path, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    entries: Vec<(String, String)>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: String, value: String) {
        self.entries.push((name, value));
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Vars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_order() {
        let mut vars = Vars::new();
        vars.push("b".into(), "2".into());
        vars.push("a".into(), "1".into());

        assert_eq!(vars.get("a"), Some("1"));
        assert_eq!(vars.get("missing"), None);
        assert_eq!(vars.iter().collect::<Vec<_>>(), vec![("b", "2"), ("a", "1")]);
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut vars = Vars::new();
        vars.push("vars".into(), "hello".into());
        assert_eq!(serde_json::to_string(&vars).unwrap(), r#"{"vars":"hello"}"#);
    }
}
