//! Resource identifiers and routing.
//!
//! # Responsibility
//! - Parse `content://<authority>/<path>` identifiers.
//! - Classify them into the three resource kinds the store serves.
//!
//! # Invariants
//! - Pattern precedence is registration order; the first match wins.
//! - A numeric placeholder only matches an all-digit segment that fits `i64`.

pub mod router;

pub use router::{UriMatch, UriRouter};

use crate::contract::SCHEME;
use std::fmt::{Display, Formatter};

/// Parsed resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUri {
    authority: String,
    segments: Vec<String>,
}

impl ResourceUri {
    /// Parses `content://authority/seg/seg`.
    ///
    /// Empty path segments are dropped, so `notes/` and `notes` are the same
    /// resource. Query and fragment parts are ignored. Returns `None` for any
    /// other scheme or an empty authority.
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.trim().strip_prefix(SCHEME)?.strip_prefix("://")?;
        let rest = rest
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let mut parts = rest.split('/');
        let authority = parts.next().filter(|value| !value.is_empty())?;
        let segments = parts
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Some(Self {
            authority: authority.to_string(),
            segments,
        })
    }

    /// Builds an identifier from an authority and a `/`-separated path.
    pub fn new(authority: &str, path: &str) -> Self {
        Self {
            authority: authority.to_string(),
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns a child identifier with one extra segment.
    pub fn with_appended(&self, segment: impl Display) -> Self {
        let mut child = self.clone();
        child.segments.push(segment.to_string());
        child
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.authority == other.authority
            && self.segments.len() < other.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl Display for ResourceUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME}://{}", self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
