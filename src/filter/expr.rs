//! The ECQL filter expression value

use std::fmt;

/// GeoTools constant that accepts every feature
pub const INCLUDE: &str = "INCLUDE";

/// An immutable ECQL predicate string.
///
/// No structure is kept beyond the text itself. Fragments built by the
/// functions in this module are standalone clauses that can be joined with
/// `AND`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterExpr(String);

impl FilterExpr {
    /// Wrap an already formatted predicate
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The accept-everything filter
    pub fn include() -> Self {
        Self(INCLUDE.to_string())
    }

    /// Returns true if this is the accept-everything filter
    pub fn is_include(&self) -> bool {
        self.0 == INCLUDE
    }

    /// Returns the predicate text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the expression and returns its text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FilterExpr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for FilterExpr {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for FilterExpr {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl PartialEq<&str> for FilterExpr {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for FilterExpr {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
