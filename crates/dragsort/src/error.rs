#![forbid(unsafe_code)]

//! Error types.

use std::fmt;

/// Construction-time controller error.
///
/// Once a controller exists nothing it does is fatal; failed gestures are
/// reported through [`IgnoredReason`](crate::IgnoredReason) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// No group element was configured.
    MissingGroupElement,
    /// One or more options are out of range.
    InvalidOptions(Vec<String>),
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingGroupElement => f.write_str("groupElement is required"),
            Self::InvalidOptions(problems) => {
                write!(f, "invalid reorder options: {}", problems.join("; "))
            }
        }
    }
}

impl std::error::Error for ReorderError {}

/// Failure reported by a drag-element resolver.
///
/// The controller treats it exactly like a resolver that declined: the
/// gesture does not start a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    reason: String,
}

impl ResolveError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drag element resolver failed: {}", self.reason)
    }
}

impl std::error::Error for ResolveError {}

impl From<&str> for ResolveError {
    fn from(reason: &str) -> Self {
        Self::new(reason)
    }
}

impl From<String> for ResolveError {
    fn from(reason: String) -> Self {
        Self::new(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::{ReorderError, ResolveError};

    #[test]
    fn display_messages() {
        assert_eq!(
            ReorderError::MissingGroupElement.to_string(),
            "groupElement is required"
        );
        assert_eq!(
            ReorderError::InvalidOptions(vec!["a".into(), "b".into()]).to_string(),
            "invalid reorder options: a; b"
        );
        assert_eq!(
            ResolveError::from("no handle").to_string(),
            "drag element resolver failed: no handle"
        );
    }
}
