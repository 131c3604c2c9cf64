//! Cycle detection over parent-code references.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::node::{index_by_code, HierarchyNode};

/// Would adding `candidate` to `existing` introduce a cycle?
///
/// The candidate's parent link overrides any existing record with the same code.
/// Only the chain starting at the candidate is walked.
pub fn has_cycle<C, T>(candidate: &C, existing: &[T]) -> bool
where
    C: HierarchyNode,
    T: HierarchyNode,
{
    let mut parents: HashMap<&str, Option<&str>> = existing
        .iter()
        .map(|record| (record.code(), record.parent_code()))
        .collect();
    parents.insert(candidate.code(), candidate.parent_code());

    let mut visited = HashSet::new();
    let mut current = candidate.code();
    loop {
        if !visited.insert(current) {
            debug!(candidate = candidate.code(), revisited = current, "cycle found");
            return true;
        }
        match parents.get(current) {
            Some(Some(parent)) => current = *parent,
            _ => return false,
        }
    }
}

/// True if any record's ancestor chain within `records` loops back on itself.
pub fn detect_cycle_in_batch<T: HierarchyNode>(records: &[T]) -> bool {
    find_cycle_in_batch(records).is_some()
}

/// Returns the first code found to be revisited while walking ancestor chains.
///
/// Walks stop at roots and at parent codes missing from the batch. Chains already
/// proven to end at a root or a dangling reference are not walked again.
#[instrument(level = "debug", skip(records), fields(batch = records.len()))]
pub fn find_cycle_in_batch<T: HierarchyNode>(records: &[T]) -> Option<String> {
    let by_code = index_by_code(records);
    let mut settled: HashSet<&str> = HashSet::new();

    for record in records {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = *by_code.get(record.code())?;
        loop {
            let code = current.code();
            if settled.contains(code) {
                break;
            }
            if !visited.insert(code) {
                debug!(start = record.code(), revisited = code, "cycle found in batch");
                return Some(code.to_string());
            }
            match current.parent_code().and_then(|parent| by_code.get(parent)) {
                Some(parent) => current = *parent,
                None => break,
            }
        }
        settled.extend(visited);
    }
    None
}
