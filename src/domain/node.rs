//! The capability every hierarchical record exposes to the engine.

use std::collections::HashMap;

/// Minimal contract a record must satisfy to take part in a hierarchy.
///
/// `code` identifies the record within one batch. `parent_code` names the
/// record's direct ancestor, `None` marks a root. A parent code that matches
/// no record in the batch is tolerated and handled as a dangling reference.
pub trait HierarchyNode {
    fn code(&self) -> &str;
    fn parent_code(&self) -> Option<&str>;
}

impl<T: HierarchyNode + ?Sized> HierarchyNode for &T {
    fn code(&self) -> &str {
        (**self).code()
    }

    fn parent_code(&self) -> Option<&str> {
        (**self).parent_code()
    }
}

/// Plain code/parent pair, used by the record loader and handy in tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct Record {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Record {
    pub fn root(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            parent: None,
        }
    }

    pub fn child(code: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            parent: Some(parent.into()),
        }
    }
}

impl HierarchyNode for Record {
    fn code(&self) -> &str {
        &self.code
    }

    fn parent_code(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// Build the code → record view the resolvers operate on.
///
/// Duplicate codes are not rejected here: the last record carrying a code wins.
pub fn index_by_code<T: HierarchyNode>(records: &[T]) -> HashMap<String, &T> {
    records
        .iter()
        .map(|record| (record.code().to_string(), record))
        .collect()
}
