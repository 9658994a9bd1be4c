//! Element Attributes
//!
//! Insertion-ordered attribute map plus the element slot accessors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::NodeData;

/// Single attribute in list form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attribute map (name to value)
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from list form
    ///
    /// A repeated name keeps the position of its first occurrence and the
    /// value of its last.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        let mut map = Self::new();
        for attr in pairs {
            map.insert(attr.name, attr.value);
        }
        map
    }

    /// List form, in insertion order
    pub fn to_pairs(&self) -> Vec<Attr> {
        self.attributes.clone()
    }

    /// Get number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&index| self.attributes[index].value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Set attribute, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if let Some(&index) = self.by_name.get(&name) {
            Some(std::mem::replace(&mut self.attributes[index].value, value))
        } else {
            self.by_name.insert(name.clone(), self.attributes.len());
            self.attributes.push(Attr { name, value });
            None
        }
    }

    /// Set attribute only when the name is not present yet
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.insert(name, value);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|attr| (attr.name.as_str(), attr.value.as_str()))
    }
}

impl PartialEq for AttrMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Eq for AttrMap {}

impl FromIterator<Attr> for AttrMap {
    fn from_iter<I: IntoIterator<Item = Attr>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Attribute map of an element, without creating it
///
/// `None` for non-elements. An element that never received attributes
/// reads as `Some(None)`.
pub fn attr_map(data: &NodeData) -> Option<Option<&AttrMap>> {
    match data {
        NodeData::Element { attrs, .. } => Some(attrs.as_ref()),
        _ => None,
    }
}

/// Attribute map of an element, creating an empty one on first use
///
/// `None` for non-elements.
pub fn attr_map_mut(data: &mut NodeData) -> Option<&mut AttrMap> {
    match data {
        NodeData::Element { attrs, .. } => Some(attrs.get_or_insert_with(AttrMap::new)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_keep_insertion_order() {
        let map = AttrMap::from_pairs(vec![
            Attr::new("id", "main"),
            Attr::new("class", "a b"),
            Attr::new("data-x", "1"),
        ]);

        let names: Vec<_> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "class", "data-x"]);
        assert_eq!(map.to_pairs()[1], Attr::new("class", "a b"));
    }

    #[test]
    fn test_repeated_name_last_value_wins() {
        let map = AttrMap::from_pairs(vec![
            Attr::new("a", "1"),
            Attr::new("b", "2"),
            Attr::new("a", "3"),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.to_pairs(), vec![Attr::new("a", "3"), Attr::new("b", "2")]);
    }

    #[test]
    fn test_insert_if_absent_never_overwrites() {
        let mut map = AttrMap::new();
        assert!(map.insert_if_absent("id", "first"));
        assert!(!map.insert_if_absent("id", "second"));
        assert_eq!(map.get("id"), Some("first"));
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut map = AttrMap::new();
        assert_eq!(map.insert("href", "/a"), None);
        assert_eq!(map.insert("href", "/b"), Some("/a".to_string()));
        assert_eq!(map.get("href"), Some("/b"));
        assert!(map.contains("href"));
        assert!(!map.contains("src"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = AttrMap::from_pairs(vec![Attr::new("x", "1"), Attr::new("y", "2")]);
        let b: AttrMap = vec![Attr::new("y", "2"), Attr::new("x", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_attr_map_mut_creates_slot_on_elements_only() {
        let mut element = NodeData::element("div");
        assert_eq!(attr_map(&element), Some(None));

        if let Some(map) = attr_map_mut(&mut element) {
            map.insert("id", "x");
        }
        assert_eq!(attr_map(&element).flatten().and_then(|map| map.get("id")), Some("x"));

        let mut text = NodeData::Text("t".into());
        assert!(attr_map(&text).is_none());
        assert!(attr_map_mut(&mut text).is_none());
    }
}
