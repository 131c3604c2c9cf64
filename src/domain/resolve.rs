//! Ancestor and descendant queries against a code → record map.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::instrument;

use crate::domain::depth::DEFAULT_MAX_HOPS;
use crate::domain::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::domain::node::HierarchyNode;

/// Ancestor codes of `code`, immediate parent first.
///
/// Empty for unknown codes and roots. A dangling parent code is included as the
/// last element. Walks stop on a revisited code and after [`DEFAULT_MAX_HOPS`].
pub fn ancestors<T: HierarchyNode>(code: &str, records: &HashMap<String, T>) -> Vec<String> {
    ancestors_bounded(code, records, DEFAULT_MAX_HOPS, &TracingSink)
}

/// Like [`ancestors`], with an explicit hop ceiling and diagnostic sink.
#[instrument(level = "trace", skip(records, sink))]
pub fn ancestors_bounded<'a, T, S>(
    code: &'a str,
    records: &'a HashMap<String, T>,
    max_hops: usize,
    sink: &S,
) -> Vec<String>
where
    T: HierarchyNode,
    S: DiagnosticSink + ?Sized,
{
    let Some(mut current) = records.get(code).and_then(|node| node.parent_code()) else {
        return Vec::new();
    };

    let mut chain = Vec::new();
    let mut visited: HashSet<&'a str> = HashSet::from([code]);
    loop {
        if chain.len() >= max_hops {
            sink.emit(Diagnostic::HopLimitReached {
                code: code.to_string(),
                limit: max_hops,
            });
            break;
        }
        if !visited.insert(current) {
            break;
        }
        chain.push(current.to_string());

        let Some(parent) = records.get(current) else {
            sink.emit(Diagnostic::ParentNotFound {
                code: current.to_string(),
            });
            break;
        };
        match parent.parent_code() {
            Some(next) => current = next,
            None => break,
        }
    }
    chain
}

/// Every code reachable from `code` by following parent links backwards.
///
/// Breadth-first; `code` itself is never part of the result, and each code is
/// expanded at most once so malformed input cannot loop.
#[instrument(level = "trace", skip(records))]
pub fn descendants<T: HierarchyNode>(code: &str, records: &HashMap<String, T>) -> HashSet<String> {
    let mut found = HashSet::new();
    let mut seen: HashSet<&str> = HashSet::from([code]);
    let mut queue = VecDeque::from([code]);

    while let Some(current) = queue.pop_front() {
        for (child_code, node) in records {
            if node.parent_code() == Some(current) && seen.insert(child_code.as_str()) {
                found.insert(child_code.clone());
                queue.push_back(child_code.as_str());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostics::CollectingSink;
    use crate::domain::Record;
    use rstest::rstest;

    fn records(items: &[Record]) -> HashMap<String, Record> {
        items.iter().map(|r| (r.code.clone(), r.clone())).collect()
    }

    fn set(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[rstest]
    #[case::root(vec![Record::root("A")], "A", vec![])]
    #[case::single_parent(vec![Record::root("A"), Record::child("B", "A")], "B", vec!["A"])]
    #[case::multi_level(
        vec![Record::root("A"), Record::child("B", "A"), Record::child("C", "B"), Record::child("D", "C")],
        "D",
        vec!["C", "B", "A"]
    )]
    #[case::dangling(vec![Record::child("B", "X")], "B", vec!["X"])]
    #[case::cycle(
        vec![Record::child("A", "C"), Record::child("B", "A"), Record::child("C", "B")],
        "C",
        vec!["B", "A"]
    )]
    #[case::other_branch_ignored(
        vec![
            Record::root("A"),
            Record::child("B", "A"),
            Record::child("C", "B"),
            Record::child("X", "A"),
            Record::child("Y", "X"),
        ],
        "C",
        vec!["B", "A"]
    )]
    #[case::unknown(vec![Record::root("A")], "Z", vec![])]
    fn given_records_when_resolving_ancestors_then_nearest_first(
        #[case] items: Vec<Record>,
        #[case] code: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(ancestors(code, &records(&items)), expected);
    }

    #[test]
    fn given_long_chain_when_ceiling_is_low_then_returns_partial_chain() {
        let items: Vec<Record> = std::iter::once(Record::root("n0"))
            .chain((1..10).map(|i| Record::child(format!("n{i}"), format!("n{}", i - 1))))
            .collect();
        let sink = CollectingSink::new();

        let chain = ancestors_bounded("n9", &records(&items), 3, &sink);

        assert_eq!(chain, vec!["n8", "n7", "n6"]);
        assert!(matches!(
            sink.diagnostics().as_slice(),
            [Diagnostic::HopLimitReached { limit: 3, .. }]
        ));
    }

    #[test]
    fn given_dangling_parent_when_resolving_ancestors_then_reports_it() {
        let sink = CollectingSink::new();

        ancestors_bounded("B", &records(&[Record::child("B", "X")]), 100, &sink);

        assert_eq!(
            sink.diagnostics(),
            vec![Diagnostic::ParentNotFound {
                code: "X".to_string()
            }]
        );
    }

    #[rstest]
    #[case::leaf(vec![Record::root("A")], "A", &[])]
    #[case::direct_children(
        vec![Record::root("A"), Record::child("B", "A"), Record::child("C", "A")],
        "A",
        &["B", "C"]
    )]
    #[case::multi_level(
        vec![
            Record::root("A"),
            Record::child("B", "A"),
            Record::child("C", "B"),
            Record::child("D", "C"),
            Record::child("E", "D"),
        ],
        "A",
        &["B", "C", "D", "E"]
    )]
    #[case::cycle_below(
        vec![
            Record::root("A"),
            Record::child("B", "A"),
            Record::child("C", "B"),
            Record::child("A2", "C"),
        ],
        "A",
        &["B", "C", "A2"]
    )]
    #[case::subtree_only(
        vec![
            Record::root("A"),
            Record::child("B", "A"),
            Record::child("C", "A"),
            Record::child("D", "B"),
            Record::child("E", "B"),
            Record::child("F", "C"),
            Record::child("G", "E"),
        ],
        "B",
        &["D", "E", "G"]
    )]
    #[case::dangling_elsewhere(
        vec![Record::root("A"), Record::child("B", "A"), Record::child("X", "Y")],
        "A",
        &["B"]
    )]
    #[case::unknown(vec![Record::root("A"), Record::child("B", "A")], "Z", &[])]
    fn given_records_when_resolving_descendants_then_returns_reachable_set(
        #[case] items: Vec<Record>,
        #[case] code: &str,
        #[case] expected: &[&str],
    ) {
        assert_eq!(descendants(code, &records(&items)), set(expected));
    }

    #[test]
    fn given_cycle_through_origin_when_resolving_descendants_then_excludes_origin() {
        let map = records(&[Record::child("A", "B"), Record::child("B", "A")]);

        assert_eq!(descendants("A", &map), set(&["B"]));
    }
}
