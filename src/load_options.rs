//! Backend-agnostic query specification supplied by the caller.
//!
//! `LoadOptions` is the immutable per-request input: a nested-array filter,
//! sort and group descriptors, pagination, and a total-row-count request. It
//! deserializes from the camelCase JSON shape that grid components send over
//! the wire, and is equally constructible in code.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A single descriptor or a list of them.
///
/// The wire format allows `"name"`, `{"selector": "name"}`, or a list of
/// either; all collapse to a slice through [`OneOrMany::as_slice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }
}

/// Ordering descriptor: a bare column name or `{selector, desc?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortEntry {
    Column(String),
    Descriptor {
        selector: String,
        #[serde(default)]
        desc: bool,
    },
}

impl SortEntry {
    pub fn selector(&self) -> &str {
        match self {
            SortEntry::Column(name) => name,
            SortEntry::Descriptor { selector, .. } => selector,
        }
    }

    pub fn is_desc(&self) -> bool {
        match self {
            SortEntry::Column(_) => false,
            SortEntry::Descriptor { desc, .. } => *desc,
        }
    }
}

impl From<&str> for SortEntry {
    fn from(name: &str) -> Self {
        SortEntry::Column(name.to_string())
    }
}

/// Grouping descriptor: a bare column name or `{selector}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupEntry {
    Column(String),
    Descriptor { selector: String },
}

impl GroupEntry {
    pub fn selector(&self) -> &str {
        match self {
            GroupEntry::Column(name) => name,
            GroupEntry::Descriptor { selector } => selector,
        }
    }
}

impl From<&str> for GroupEntry {
    fn from(name: &str) -> Self {
        GroupEntry::Column(name.to_string())
    }
}

/// Caller-supplied filter/sort/group/paginate specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadOptions {
    /// Nested-array filter predicate, e.g. `[["age", ">", 21], "and", ["name", "contains", "an"]]`.
    pub filter: Option<Value>,
    pub sort: Option<OneOrMany<SortEntry>>,
    pub group: Option<OneOrMany<GroupEntry>>,
    /// Rows to skip from the start of the result set.
    pub skip: Option<u64>,
    /// Maximum rows to return.
    pub take: Option<u64>,
    /// Request a sibling count query over the filtered rows.
    pub require_total_count: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_options() {
        let options: LoadOptions = serde_json::from_str(
            r#"{
                "filter": ["age", ">", 21],
                "sort": [{"selector": "name", "desc": true}, "age"],
                "group": {"selector": "city"},
                "skip": 10,
                "take": 5,
                "requireTotalCount": true
            }"#,
        )
        .unwrap();

        assert!(options.filter.is_some());
        let sort = options.sort.unwrap();
        let entries = sort.as_slice();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].selector(), "name");
        assert!(entries[0].is_desc());
        assert_eq!(entries[1].selector(), "age");
        assert!(!entries[1].is_desc());

        let group = options.group.unwrap();
        assert_eq!(group.as_slice()[0].selector(), "city");

        assert_eq!(options.skip, Some(10));
        assert_eq!(options.take, Some(5));
        assert!(options.require_total_count);
    }

    #[test]
    fn test_deserialize_empty_object() {
        let options: LoadOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, LoadOptions::default());
        assert!(!options.require_total_count);
    }

    #[test]
    fn test_single_sort_descriptor() {
        let options: LoadOptions =
            serde_json::from_str(r#"{"sort": {"selector": "id"}}"#).unwrap();
        let sort = options.sort.unwrap();
        assert_eq!(sort.as_slice().len(), 1);
        assert_eq!(sort.as_slice()[0].selector(), "id");
    }
}
