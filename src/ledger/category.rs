use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered set of known category names.
///
/// Matching is exact and case-sensitive. Names are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `category` if unseen. Returns `true` when the registry grew.
    pub fn register(&mut self, category: &str) -> bool {
        if category.trim().is_empty() || self.seen.contains(category) {
            return false;
        }
        self.seen.insert(category.to_string());
        self.ordered.push(category.to_string());
        true
    }

    pub fn extend<'a, I>(&mut self, categories: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for category in categories {
            self.register(category);
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.seen.contains(category)
    }

    pub fn list(&self) -> Vec<String> {
        self.ordered.clone()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Serialize for CategoryRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ordered.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CategoryRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut registry = CategoryRegistry::new();
        registry.extend(names.iter().map(String::as_str));
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_and_ordered() {
        let mut registry = CategoryRegistry::new();
        assert!(registry.register("Food"));
        assert!(registry.register("Transport"));
        assert!(!registry.register("Food"));
        assert_eq!(registry.list(), vec!["Food", "Transport"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut registry = CategoryRegistry::new();
        registry.register("Food");
        registry.register("food");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn blank_names_are_ignored() {
        let mut registry = CategoryRegistry::new();
        assert!(!registry.register("  "));
        assert!(registry.is_empty());
    }

    #[test]
    fn deserialization_drops_duplicates() {
        let registry: CategoryRegistry =
            serde_json::from_str(r#"["Food","Other","Food"]"#).unwrap();
        assert_eq!(registry.list(), vec!["Food", "Other"]);
    }
}
