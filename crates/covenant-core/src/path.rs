//! # Field Paths
//!
//! Paths from a record's root to a failing value, built up as the engine
//! descends into arrays, maps, and nested objects. Rendering is dotted,
//! with array positions in brackets: `info.tags[2]`, `prices.usd`.

use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field of a record or nested object.
    Field(String),
    /// A position within an array.
    Index(usize),
    /// A key within a map.
    Key(String),
}

/// A path from the record root to a specific value.
///
/// An empty path denotes the record itself and renders as `(root)`,
/// so root-level failures stay readable in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, denoting the record root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A single-segment path for a top-level field.
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![PathSegment::Field(name.into())])
    }

    /// Extend with a named field segment.
    pub fn child(&self, name: impl Into<String>) -> Self {
        self.extended(PathSegment::Field(name.into()))
    }

    /// Extend with an array position.
    pub fn at_index(&self, index: usize) -> Self {
        self.extended(PathSegment::Index(index))
    }

    /// Extend with a map key.
    pub fn at_key(&self, key: impl Into<String>) -> Self {
        self.extended(PathSegment::Key(key.into()))
    }

    /// Whether this is the record root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn extended(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) | PathSegment::Key(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Render a schema-side dotted path (`["info", "age"]` becomes `info.age`).
///
/// Schema paths never contain array positions or map keys, so a plain
/// join is enough; this keeps index and directive errors consistent with
/// data-side [`FieldPath`] rendering.
pub fn dotted(path: &[String]) -> String {
    path.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let path = FieldPath::field("info").child("tags").at_index(2);
        assert_eq!(path.to_string(), "info.tags[2]");
    }

    #[test]
    fn test_display_map_key() {
        let path = FieldPath::field("prices").at_key("usd");
        assert_eq!(path.to_string(), "prices.usd");
    }

    #[test]
    fn test_root_display() {
        assert_eq!(FieldPath::root().to_string(), "(root)");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = FieldPath::field("a");
        let _child = parent.child("b");
        assert_eq!(parent.to_string(), "a");
    }

    #[test]
    fn test_dotted() {
        assert_eq!(dotted(&["info".to_string(), "age".to_string()]), "info.age");
    }
}
