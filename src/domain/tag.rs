//! Key/value tags and the backup marker tag.

/// Tag key that opts a resource into backup and records, on a snapshot,
/// the resource it was taken from.
pub const MARKER_TAG: &str = "LambderBackup";

/// A single key/value tag as attached by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value. May be empty.
    pub value: String,
}

impl Tag {
    /// Creates a tag from a key and value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates the marker tag pointing at `resource_id`.
    #[must_use]
    pub fn marker(resource_id: &str) -> Self {
        Self::new(MARKER_TAG, resource_id)
    }
}

/// Returns `true` if any tag in `tags` has the marker key.
#[must_use]
pub fn has_marker(tags: &[Tag]) -> bool {
    tags.iter().any(|t| t.key == MARKER_TAG)
}

/// Returns the value of the first marker tag in `tags`, if any.
#[must_use]
pub fn marker_value(tags: &[Tag]) -> Option<&str> {
    tags.iter()
        .find(|t| t.key == MARKER_TAG)
        .map(|t| t.value.as_str())
}
