//! Ordered attribute storage for elements.

/// [§ 4.9.2 Interface NamedNodeMap](https://dom.spec.whatwg.org/#interface-namednodemap)
///
/// "An element has an associated attribute list."
///
/// Attributes keep their source order. Lookups are linear, which is what every
/// real element (a handful of attributes) wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributesMap {
    entries: Vec<(String, String)>,
}

impl AttributesMap {
    /// Create an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Value of the attribute called `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&String> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether an attribute called `name` is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Set `name` to `value`, replacing an existing value in place.
    ///
    /// Returns the previous value if there was one.
    pub fn insert(&mut self, name: String, value: String) -> Option<String> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((name, value));
        None
    }

    /// Add `name` only if it is not already present.
    ///
    /// Returns `true` if the attribute was added.
    pub fn insert_if_absent(&mut self, name: &str, value: &str) -> bool {
        if self.contains_key(name) {
            return false;
        }
        self.entries.push((name.to_string(), value.to_string()));
        true
    }

    /// Remove the attribute called `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate `(name, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter().map(pair_refs)
    }

    /// Number of attributes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the element has no attributes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for AttributesMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            let _ = map.insert(name, value);
        }
        map
    }
}

impl<'a> IntoIterator for &'a AttributesMap {
    type Item = (&'a String, &'a String);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a String, &'a String),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(pair_refs as fn(&'a (String, String)) -> _)
    }
}

fn pair_refs((key, value): &(String, String)) -> (&String, &String) {
    (key, value)
}
