//! Locator route table.
//!
//! # Responsibility
//! - Hold the locator patterns a provider instance answers to.
//! - Resolve a locator to the collection or to one entry id.
//!
//! # Invariants
//! - Patterns are tried in registration order; the first match wins.
//! - A `#` segment matches only an unsigned decimal that fits in `i64`.
//! - Only `content://` locators are routed.

use crate::contract::{ResourceKind, CONTENT_AUTHORITY, CONTENT_SCHEME, PATH_THOUGHTS};
use crate::locator::{parse_decimal_id, Locator};
use crate::model::entry::EntryId;

/// Result of routing a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedLocator {
    Collection,
    Item(EntryId),
}

impl ResolvedLocator {
    pub fn kind(self) -> ResourceKind {
        match self {
            Self::Collection => ResourceKind::Collection,
            Self::Item(_) => ResourceKind::Item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Literal(String),
    Number,
}

#[derive(Debug, Clone)]
struct RoutePattern {
    authority: String,
    segments: Vec<PatternSegment>,
    kind: ResourceKind,
}

/// Explicitly constructed pattern table owned by one provider.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    patterns: Vec<RoutePattern>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the entries collection and single-entry routes.
    pub fn journal() -> Self {
        Self::new()
            .with_route(CONTENT_AUTHORITY, PATH_THOUGHTS, ResourceKind::Collection)
            .with_route(
                CONTENT_AUTHORITY,
                &format!("{PATH_THOUGHTS}/#"),
                ResourceKind::Item,
            )
    }

    pub fn with_route(mut self, authority: &str, path: &str, kind: ResourceKind) -> Self {
        self.add_route(authority, path, kind);
        self
    }

    /// Registers `path` (segments separated by `/`, `#` for an id) under
    /// `authority`.
    pub fn add_route(&mut self, authority: &str, path: &str, kind: ResourceKind) {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment {
                "#" => PatternSegment::Number,
                literal => PatternSegment::Literal(literal.to_string()),
            })
            .collect();
        self.patterns.push(RoutePattern {
            authority: authority.to_string(),
            segments,
            kind,
        });
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Resolves `locator`, or `None` when no pattern matches.
    pub fn resolve(&self, locator: &Locator) -> Option<ResolvedLocator> {
        if locator.scheme() != Some(CONTENT_SCHEME) {
            return None;
        }
        let authority = locator.authority()?;
        let segments = locator.path_segments();

        self.patterns
            .iter()
            .filter(|pattern| pattern.authority == authority)
            .find_map(|pattern| pattern.resolve(&segments))
    }
}

impl RoutePattern {
    fn resolve(&self, segments: &[&str]) -> Option<ResolvedLocator> {
        if self.segments.len() != segments.len() {
            return None;
        }

        let mut captured = None;
        for (expected, actual) in self.segments.iter().zip(segments) {
            match expected {
                PatternSegment::Literal(literal) if literal == actual => {}
                PatternSegment::Literal(_) => return None,
                PatternSegment::Number => captured = Some(parse_decimal_id(actual)?),
            }
        }

        match self.kind {
            ResourceKind::Collection => Some(ResolvedLocator::Collection),
            ResourceKind::Item => captured.map(ResolvedLocator::Item),
        }
    }
}
