//! Reader configuration.

/// Default capacity of the buffer around the byte source.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// How tags with a missing key or value are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TagPolicy {
    /// Missing parts become empty strings.
    #[default]
    Lenient,
    /// Missing parts abort the pass with [`crate::ReadError::MalformedTag`].
    Strict,
}

/// Options shared by every reader.
///
/// # Examples
/// ```
/// use osmflow_input::{ReadOptions, TagPolicy};
///
/// let options = ReadOptions {
///     tag_policy: TagPolicy::Strict,
///     ..ReadOptions::default()
/// };
/// assert_eq!(options.buffer_capacity, 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReadOptions {
    /// Capacity in bytes of the buffered reader around the source.
    pub buffer_capacity: usize,
    /// Treatment of incomplete tags.
    pub tag_policy: TagPolicy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            tag_policy: TagPolicy::default(),
        }
    }
}
