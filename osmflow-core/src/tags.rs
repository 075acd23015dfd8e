//! Ordered key/value tag lists.

/// A single `key=value` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// Tags in the order they were read.
///
/// Duplicate keys are kept as-is; lookups return the first match.
///
/// # Examples
/// ```
/// use osmflow_core::TagList;
///
/// let mut tags = TagList::new();
/// tags.add("name", "Foo");
/// tags.add("name", "Bar");
///
/// assert_eq!(tags.len(), 2);
/// assert_eq!(tags.get("name"), Some("Foo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Append a tag without checking for duplicates.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.push(Tag {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Value of the first tag with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.tags
            .iter()
            .map(|tag| (tag.key.as_str(), tag.value.as_str()))
    }

    /// Number of tags, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the list holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Remove every tag, keeping the allocation.
    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

impl<K, V> FromIterator<(K, V)> for TagList
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Self::new();
        for (key, value) in iter {
            tags.add(key, value);
        }
        tags
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
