//! Memoized depth computation over a code → record map.

use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::domain::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::domain::node::HierarchyNode;

/// Hop ceiling for unmemoized walks when none is configured.
pub const DEFAULT_MAX_HOPS: usize = 100;

/// Code → depth cache shared by the depth queries of one batch.
#[derive(Debug, Default, Clone)]
pub struct DepthMemo {
    depths: HashMap<String, usize>,
}

impl DepthMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<usize> {
        self.depths.get(code).copied()
    }

    pub fn insert(&mut self, code: impl Into<String>, depth: usize) {
        self.depths.insert(code.into(), depth);
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn clear(&mut self) {
        self.depths.clear();
    }
}

/// Number of parent hops from `code` to its root, `None` for an unknown code.
///
/// Uses [`DEFAULT_MAX_HOPS`] and reports anomalies through `tracing`.
pub fn depth<T: HierarchyNode>(
    code: &str,
    records: &HashMap<String, T>,
    memo: &mut DepthMemo,
) -> Option<usize> {
    depth_bounded(code, records, memo, DEFAULT_MAX_HOPS, &TracingSink)
}

/// Like [`depth`], with an explicit hop ceiling and diagnostic sink.
///
/// A parent missing from `records` ends the walk there (the hop onto it still
/// counts). A walk that would go past `max_hops` yields `max_hops`: this bounds cyclic
/// input but does not make the answer meaningful, run cycle detection first.
#[instrument(level = "trace", skip(records, memo, sink))]
pub fn depth_bounded<T, S>(
    code: &str,
    records: &HashMap<String, T>,
    memo: &mut DepthMemo,
    max_hops: usize,
    sink: &S,
) -> Option<usize>
where
    T: HierarchyNode,
    S: DiagnosticSink + ?Sized,
{
    if let Some(known) = memo.get(code) {
        return Some(known);
    }

    let node = records.get(code)?;
    let Some(parent) = node.parent_code() else {
        memo.insert(code, 0);
        return Some(0);
    };
    if let Some(parent_depth) = memo.get(parent) {
        memo.insert(code, parent_depth + 1);
        return Some(parent_depth + 1);
    }

    let mut hops = 1;
    let mut current = parent;
    loop {
        let Some(ancestor) = records.get(current) else {
            sink.emit(Diagnostic::ParentNotFound {
                code: current.to_string(),
            });
            break;
        };
        let Some(next) = ancestor.parent_code() else {
            break;
        };
        if hops >= max_hops {
            sink.emit(Diagnostic::HopLimitReached {
                code: code.to_string(),
                limit: max_hops,
            });
            break;
        }
        current = next;
        hops += 1;
        if let Some(known) = memo.get(next) {
            hops += known;
            break;
        }
    }

    trace!(code, hops, "depth computed");
    memo.insert(code, hops);
    Some(hops)
}
