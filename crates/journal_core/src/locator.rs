//! Resource locators for journal data.
//!
//! # Responsibility
//! - Wrap locator strings (`content://<authority>/<path>`) in a value type.
//! - Expose the parsed scheme, authority and path segments used for routing
//!   and change notification.
//!
//! # Invariants
//! - Empty path segments are ignored, so a trailing `/` does not change the
//!   resource a locator names.
//! - The raw string is kept verbatim for logging and error messages.

use crate::contract::{CONTENT_AUTHORITY, CONTENT_SCHEME, PATH_THOUGHTS};
use crate::model::entry::EntryId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque string naming the entries collection or one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Locator of the entries collection.
    pub fn entries() -> Self {
        Self(format!(
            "{CONTENT_SCHEME}://{CONTENT_AUTHORITY}/{PATH_THOUGHTS}"
        ))
    }

    /// Locator of one entry.
    pub fn entry(id: EntryId) -> Self {
        Self::entries().with_appended_id(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Scheme before `://`, if any.
    pub fn scheme(&self) -> Option<&str> {
        self.split().0
    }

    /// Authority between `://` and the first `/`.
    pub fn authority(&self) -> Option<&str> {
        self.split().1
    }

    /// Non-empty path segments after the authority.
    pub fn path_segments(&self) -> Vec<&str> {
        self.split()
            .2
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Returns a new locator with `id` appended as a path segment.
    ///
    /// Any `?query` or `#fragment` suffix is dropped so the id lands in the
    /// path.
    pub fn with_appended_id(&self, id: EntryId) -> Self {
        let base = self.without_suffix().trim_end_matches('/');
        Self(format!("{base}/{}", id.get()))
    }

    /// Parses the last path segment as an entry id.
    pub fn last_id(&self) -> Option<EntryId> {
        self.path_segments()
            .last()
            .and_then(|segment| parse_decimal_id(segment))
    }

    /// Whether `other` names a resource strictly below this one.
    pub fn is_ancestor_of(&self, other: &Locator) -> bool {
        if self.scheme() != other.scheme() || self.authority() != other.authority() {
            return false;
        }
        let own = self.path_segments();
        let theirs = other.path_segments();
        own.len() < theirs.len() && theirs.starts_with(&own)
    }

    /// Whether both locators name the same resource.
    pub fn same_resource(&self, other: &Locator) -> bool {
        self.scheme() == other.scheme()
            && self.authority() == other.authority()
            && self.path_segments() == other.path_segments()
    }

    fn without_suffix(&self) -> &str {
        self.0.split(['?', '#']).next().unwrap_or(self.0.as_str())
    }

    fn split(&self) -> (Option<&str>, Option<&str>, &str) {
        let raw = self.without_suffix();
        let Some((scheme, rest)) = raw.split_once("://") else {
            return (None, None, raw);
        };
        match rest.split_once('/') {
            Some((authority, path)) => (Some(scheme), Some(authority), path),
            None => (Some(scheme), Some(rest), ""),
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Parses an all-digit segment into an id. Signs and overflow are rejected.
pub(crate) fn parse_decimal_id(segment: &str) -> Option<EntryId> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse::<i64>().ok().map(EntryId::new)
}

#[cfg(test)]
mod tests {
    use super::{parse_decimal_id, Locator};
    use crate::model::entry::EntryId;

    #[test]
    fn entries_locator_uses_content_scheme() {
        let locator = Locator::entries();
        assert_eq!(
            locator.as_str(),
            "content://com.feghas.jounalapp.data/thoughts"
        );
        assert_eq!(locator.scheme(), Some("content"));
        assert_eq!(locator.authority(), Some("com.feghas.jounalapp.data"));
        assert_eq!(locator.path_segments(), vec!["thoughts"]);
    }

    #[test]
    fn appended_id_is_recoverable() {
        let item = Locator::entries().with_appended_id(EntryId::new(42));
        assert_eq!(
            item.as_str(),
            "content://com.feghas.jounalapp.data/thoughts/42"
        );
        assert_eq!(item.last_id(), Some(EntryId::new(42)));
        assert_eq!(Locator::entries().last_id(), None);
    }

    #[test]
    fn trailing_slash_and_query_do_not_change_segments() {
        let locator = Locator::new("content://com.feghas.jounalapp.data/thoughts/?x=1");
        assert_eq!(locator.path_segments(), vec!["thoughts"]);
        assert!(locator.same_resource(&Locator::entries()));
        assert_eq!(
            Locator::new("content://com.feghas.jounalapp.data/thoughts/")
                .with_appended_id(EntryId::new(3))
                .as_str(),
            "content://com.feghas.jounalapp.data/thoughts/3"
        );
    }

    #[test]
    fn appended_id_goes_before_query_and_fragment() {
        for raw in [
            "content://com.feghas.jounalapp.data/thoughts?x=1",
            "content://com.feghas.jounalapp.data/thoughts/?x=1",
            "content://com.feghas.jounalapp.data/thoughts#top",
        ] {
            let item = Locator::new(raw).with_appended_id(EntryId::new(5));
            assert_eq!(
                item.as_str(),
                "content://com.feghas.jounalapp.data/thoughts/5"
            );
            assert_eq!(item.last_id(), Some(EntryId::new(5)));
        }
    }

    #[test]
    fn ancestor_requires_same_authority_and_strict_prefix() {
        let collection = Locator::entries();
        let item = Locator::entry(EntryId::new(7));
        assert!(collection.is_ancestor_of(&item));
        assert!(!item.is_ancestor_of(&collection));
        assert!(!collection.is_ancestor_of(&collection));

        let foreign = Locator::new("content://other.authority/thoughts/7");
        assert!(!collection.is_ancestor_of(&foreign));
    }

    #[test]
    fn decimal_id_rejects_signs_and_overflow() {
        assert_eq!(parse_decimal_id("0012"), Some(EntryId::new(12)));
        assert_eq!(parse_decimal_id("-1"), None);
        assert_eq!(parse_decimal_id("+1"), None);
        assert_eq!(parse_decimal_id("1a"), None);
        assert_eq!(parse_decimal_id("99999999999999999999"), None);
        assert_eq!(parse_decimal_id(""), None);
    }
}
