//! Sibling-indexing policy and its precedence rules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Which tag names receive an explicit `[1]` on their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForceIndex {
    /// No forcing; first occurrences stay bare unless another rule applies.
    #[default]
    None,
    /// Every tag name is forced.
    All,
    /// Only the listed tag names are forced.
    Specific(HashSet<String>),
}

impl ForceIndex {
    pub fn applies_to(&self, tag: &str) -> bool {
        match self {
            ForceIndex::None => false,
            ForceIndex::All => true,
            ForceIndex::Specific(tags) => tags.contains(tag),
        }
    }
}

/// Configuration for one flattening pass.
///
/// Index rendering for a first occurrence is decided by
/// [`IndexingPolicy::should_show_index`]; see there for the precedence.
/// Second and later occurrences are always indexed.
///
/// ```
/// use leafpath::v1::IndexingPolicy;
///
/// let policy = IndexingPolicy::default()
///     .force_all()
///     .with_exception("title")
///     .with_attribute("id");
///
/// assert!(policy.should_show_index("item", 1));
/// assert!(!policy.should_show_index("title", 1));
/// assert!(policy.should_show_index("title", 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexingPolicy {
    pub legacy_always_index_one: HashSet<String>,
    pub force_index_one: ForceIndex,
    pub exceptions_to_forcing: HashSet<String>,
    pub attributes_in_path: Vec<String>,
    pub ignored_tags: HashSet<String>,
}

impl IndexingPolicy {
    pub fn with_legacy_index(mut self, tag: impl Into<String>) -> Self {
        self.legacy_always_index_one.insert(tag.into());
        self
    }

    pub fn force_all(mut self) -> Self {
        self.force_index_one = ForceIndex::All;
        self
    }

    /// Force `[1]` for `tag`. Has no effect once every tag is forced.
    pub fn with_forced(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        match self.force_index_one {
            ForceIndex::All => {}
            ForceIndex::Specific(ref mut tags) => {
                tags.insert(tag);
            }
            ForceIndex::None => {
                self.force_index_one = ForceIndex::Specific(HashSet::from([tag]));
            }
        }
        self
    }

    pub fn with_exception(mut self, tag: impl Into<String>) -> Self {
        self.exceptions_to_forcing.insert(tag.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.attributes_in_path.contains(&name) {
            self.attributes_in_path.push(name);
        }
        self
    }

    pub fn with_ignored(mut self, tag: impl Into<String>) -> Self {
        self.ignored_tags.insert(tag.into());
        self
    }

    pub fn is_ignored(&self, tag: &str) -> bool {
        self.ignored_tags.contains(tag)
    }

    /// Decide whether occurrence number `count` of `tag` renders an index.
    ///
    /// Any count of 2 or more is always indexed. For the first occurrence the
    /// rules are applied in order, each later rule overriding the earlier:
    ///
    /// 1. bare by default,
    /// 2. indexed if `tag` is in `legacy_always_index_one`,
    /// 3. indexed if `force_index_one` applies to `tag`,
    /// 4. bare if `tag` is in `exceptions_to_forcing`.
    pub fn should_show_index(&self, tag: &str, count: usize) -> bool {
        if count >= 2 {
            return true;
        }

        let mut show = false;
        if self.legacy_always_index_one.contains(tag) {
            show = true;
        }
        if self.force_index_one.applies_to(tag) {
            show = true;
        }
        if self.exceptions_to_forcing.contains(tag) {
            show = false;
        }
        show
    }

    /// Parse a policy from the JSON format described by [`PolicyFile`].
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let file: PolicyFile = serde_json::from_str(json)?;
        Ok(file.into())
    }

    /// Load a JSON policy file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|source| Error::Policy {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ============================================================================
// On-disk format
// ============================================================================

/// JSON shape of a policy file.
///
/// `force_index_one` distinguishes three states: omitted (force nothing),
/// an empty list (force every tag), or a list of tag names.
///
/// ```json
/// {
///   "legacy_always_index_one": ["entry"],
///   "force_index_one": [],
///   "exceptions_to_forcing": ["title"],
///   "attributes_in_path": ["type", "id"],
///   "ignored_tags": ["comment"]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_always_index_one: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_index_one: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions_to_forcing: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes_in_path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_tags: Vec<String>,
}

impl From<PolicyFile> for IndexingPolicy {
    fn from(file: PolicyFile) -> Self {
        let force_index_one = match file.force_index_one {
            None => ForceIndex::None,
            Some(tags) if tags.is_empty() => ForceIndex::All,
            Some(tags) => ForceIndex::Specific(tags.into_iter().collect()),
        };
        let mut policy = IndexingPolicy {
            legacy_always_index_one: file.legacy_always_index_one.into_iter().collect(),
            force_index_one,
            exceptions_to_forcing: file.exceptions_to_forcing.into_iter().collect(),
            attributes_in_path: Vec::new(),
            ignored_tags: file.ignored_tags.into_iter().collect(),
        };
        for name in file.attributes_in_path {
            policy = policy.with_attribute(name);
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_second_occurrence_always_indexed() {
        let policy = IndexingPolicy::default().with_exception("a");
        assert!(policy.should_show_index("a", 2));
        assert!(policy.should_show_index("a", 17));
    }

    #[test]
    fn test_first_occurrence_bare_by_default() {
        assert!(!IndexingPolicy::default().should_show_index("a", 1));
    }

    #[test]
    fn test_legacy_rule() {
        let policy = IndexingPolicy::default().with_legacy_index("a");
        assert!(policy.should_show_index("a", 1));
        assert!(!policy.should_show_index("b", 1));
    }

    #[test]
    fn test_force_all() {
        let policy = IndexingPolicy::default().force_all();
        assert!(policy.should_show_index("anything", 1));
    }

    #[test]
    fn test_force_specific() {
        let policy = IndexingPolicy::default().with_forced("a");
        assert!(policy.should_show_index("a", 1));
        assert!(!policy.should_show_index("b", 1));
    }

    #[test]
    fn test_exception_overrides_force_all() {
        let policy = IndexingPolicy::default().force_all().with_exception("a");
        assert!(!policy.should_show_index("a", 1));
        assert!(policy.should_show_index("b", 1));
    }

    #[test]
    fn test_exception_overrides_legacy() {
        let policy = IndexingPolicy::default()
            .with_legacy_index("a")
            .with_exception("a");
        assert!(!policy.should_show_index("a", 1));
    }

    #[test]
    fn test_with_forced_after_force_all_stays_all() {
        let policy = IndexingPolicy::default().force_all().with_forced("a");
        assert_eq!(policy.force_index_one, ForceIndex::All);
    }

    #[test]
    fn test_with_attribute_deduplicates_and_keeps_order() {
        let policy = IndexingPolicy::default()
            .with_attribute("type")
            .with_attribute("id")
            .with_attribute("type");
        assert_eq!(policy.attributes_in_path, vec!["type", "id"]);
    }

    #[test]
    fn test_policy_file_force_states() {
        let none = IndexingPolicy::from_json("{}").unwrap();
        assert_eq!(none.force_index_one, ForceIndex::None);

        let all = IndexingPolicy::from_json(r#"{"force_index_one": []}"#).unwrap();
        assert_eq!(all.force_index_one, ForceIndex::All);

        let some = IndexingPolicy::from_json(r#"{"force_index_one": ["a", "b"]}"#).unwrap();
        assert!(some.force_index_one.applies_to("a"));
        assert!(!some.force_index_one.applies_to("c"));
    }

    #[test]
    fn test_policy_file_full() {
        let json = r#"{
            "legacy_always_index_one": ["entry"],
            "exceptions_to_forcing": ["title"],
            "attributes_in_path": ["type", "id"],
            "ignored_tags": ["comment"]
        }"#;
        let policy = IndexingPolicy::from_json(json).unwrap();
        assert!(policy.legacy_always_index_one.contains("entry"));
        assert!(policy.exceptions_to_forcing.contains("title"));
        assert_eq!(policy.attributes_in_path, vec!["type", "id"]);
        assert!(policy.is_ignored("comment"));
    }

    #[test]
    fn test_policy_file_rejects_unknown_fields() {
        assert!(IndexingPolicy::from_json(r#"{"force_all": true}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"force_index_one": ["item"]}}"#).unwrap();
        f.flush().unwrap();
        let policy = IndexingPolicy::load(f.path()).unwrap();
        assert!(policy.should_show_index("item", 1));
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        f.flush().unwrap();
        let err = IndexingPolicy::load(f.path()).unwrap_err();
        assert!(matches!(err, Error::Policy { .. }));
        assert!(!err.is_parse_failure());
    }
}
