//! Parsing of co-occurrence matrix keys.

/// Separator between source and target in a relation key.
pub const RELATION_SEPARATOR: char = '&';

/// A parsed relation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationCell<'a> {
    /// Cell on the matrix diagonal (`"X"`); never becomes a link
    Diagonal(&'a str),
    /// Off-diagonal cell (`"X&Y"`)
    Pair { source: &'a str, target: &'a str },
    /// Key with an empty source segment
    Malformed,
}

impl<'a> RelationCell<'a> {
    /// Parse a composite key. Segments after the second are ignored.
    pub fn parse(key: &'a str) -> Self {
        let mut parts = key.split(RELATION_SEPARATOR);
        let source = parts.next().unwrap_or_default();
        let target = parts.next().unwrap_or_default();

        if source.is_empty() {
            RelationCell::Malformed
        } else if target.is_empty() {
            RelationCell::Diagonal(source)
        } else {
            RelationCell::Pair { source, target }
        }
    }
}
