//! Arena-backed forest assembled from flat code/parent-code records.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::cycle::find_cycle_in_batch;
use crate::domain::depth::{depth_bounded, DepthMemo, DEFAULT_MAX_HOPS};
use crate::domain::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{index_by_code, HierarchyNode};

/// A record paired with the codes of its ancestors, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo<T> {
    pub item: T,
    pub breadcrumb: Vec<String>,
}

impl<T> NodeInfo<T> {
    pub fn depth(&self) -> usize {
        self.breadcrumb.len()
    }
}

impl<T: Clone> NodeInfo<&T> {
    pub fn cloned(&self) -> NodeInfo<T> {
        NodeInfo {
            item: self.item.clone(),
            breadcrumb: self.breadcrumb.clone(),
        }
    }
}

/// Tree node in the arena, exclusively owned by its [`Forest`].
#[derive(Debug)]
struct TreeNode<T> {
    item: T,
    children: Vec<Index>,
}

/// Ordered collection of trees built from [`HierarchyNode`] records.
///
/// Roots keep the order in which they were added, children the order in which
/// they were attached. Non-fatal anomalies go to the sink `S`.
#[derive(Debug)]
pub struct Forest<T, S = TracingSink> {
    arena: Arena<TreeNode<T>>,
    roots: Vec<Index>,
    max_hops: usize,
    sink: S,
}

impl<T: HierarchyNode> Default for Forest<T, TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HierarchyNode> Forest<T, TracingSink> {
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl<T: HierarchyNode, S: DiagnosticSink> Forest<T, S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            max_hops: DEFAULT_MAX_HOPS,
            sink,
        }
    }

    /// Hop ceiling for depth walks in [`Forest::insert_all`], raised to the
    /// batch size when a batch is longer.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Root codes in insertion order.
    pub fn roots(&self) -> Vec<&str> {
        self.roots
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .map(|node| node.item.code())
            .collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.iter().any(|(item, _)| item.code() == code)
    }

    /// Insert one record below its parent, or as a new root if it has none.
    ///
    /// The first node in pre-order whose code matches the parent code receives
    /// the record. Without a match the record is dropped, a
    /// [`Diagnostic::DanglingParent`] is emitted and `false` returned.
    #[instrument(level = "trace", skip(self, item), fields(code = item.code()))]
    pub fn add_node(&mut self, item: T) -> bool {
        let parent = match item.parent_code() {
            None => None,
            Some(parent_code) => match self.find(parent_code) {
                Some(parent_idx) => Some(parent_idx),
                None => {
                    self.sink.emit(Diagnostic::DanglingParent {
                        code: item.code().to_string(),
                        parent_code: parent_code.to_string(),
                    });
                    return false;
                }
            },
        };
        self.insert_node(item, parent);
        true
    }

    /// Insert a whole batch, parents before children, or nothing at all.
    ///
    /// Fails with [`DomainError::CycleDetected`] before touching the forest if any
    /// parent chain in the batch loops. Otherwise records are inserted in order
    /// of ascending depth, ties keeping input order.
    #[instrument(level = "debug", skip(self, items))]
    pub fn insert_all<I>(&mut self, items: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        if let Some(code) = find_cycle_in_batch(&items) {
            return Err(DomainError::CycleDetected { code });
        }

        // acyclic from here on: a chain cannot be longer than the batch
        let ceiling = self.max_hops.max(items.len());
        let depths: Vec<Option<usize>> = {
            let by_code: HashMap<String, &T> = index_by_code(&items);
            let mut memo = DepthMemo::new();
            items
                .iter()
                .map(|item| depth_bounded(item.code(), &by_code, &mut memo, ceiling, &self.sink))
                .collect()
        };

        let mut entries: Vec<(Option<usize>, T)> = depths.into_iter().zip(items).collect();
        entries.sort_by_key(|(depth, _)| *depth);
        debug!(batch = entries.len(), "inserting batch");

        for (_, item) in entries {
            self.add_node(item);
        }
        Ok(())
    }

    /// Every record in pre-order, each with its root-first breadcrumb.
    #[instrument(level = "debug", skip(self))]
    pub fn flatten(&self) -> Vec<NodeInfo<&T>> {
        let mut items = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<(Index, Vec<String>)> = self
            .roots
            .iter()
            .rev()
            .map(|&idx| (idx, Vec::new()))
            .collect();

        while let Some((idx, breadcrumb)) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            let mut child_breadcrumb = breadcrumb.clone();
            child_breadcrumb.push(node.item.code().to_string());
            for &child in node.children.iter().rev() {
                stack.push((child, child_breadcrumb.clone()));
            }
            items.push(NodeInfo {
                item: &node.item,
                breadcrumb,
            });
        }
        items
    }

    /// Pre-order iterator over `(record, depth)`.
    pub fn iter(&self) -> ForestIterator<'_, T> {
        ForestIterator::new(&self.arena, &self.roots)
    }

    /// Nodes on the longest root-to-leaf path, 0 for an empty forest.
    pub fn height(&self) -> usize {
        self.iter().map(|(_, depth)| depth + 1).max().unwrap_or(0)
    }

    /// Codes of nodes without children, in pre-order.
    pub fn leaf_codes(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut stack: Vec<Index> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                if node.children.is_empty() {
                    leaves.push(node.item.code());
                }
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }

    /// Render the forest below a synthetic root labelled `label`.
    pub fn to_tree_string(&self, label: &str) -> Tree<String> {
        fn build<T: HierarchyNode>(arena: &Arena<TreeNode<T>>, idx: Index) -> Option<Tree<String>> {
            let node = arena.get(idx)?;
            let leaves = node
                .children
                .iter()
                .filter_map(|&child| build(arena, child))
                .collect::<Vec<_>>();
            Some(Tree::new(node.item.code().to_string()).with_leaves(leaves))
        }

        let trees = self
            .roots
            .iter()
            .filter_map(|&root| build(&self.arena, root))
            .collect::<Vec<_>>();
        Tree::new(label.to_string()).with_leaves(trees)
    }

    fn insert_node(&mut self, item: T, parent: Option<Index>) -> Index {
        let node_idx = self.arena.insert(TreeNode {
            item,
            children: Vec::new(),
        });

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    /// Pre-order search for the first node carrying `code`.
    fn find(&self, code: &str) -> Option<Index> {
        let mut stack: Vec<Index> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                if node.item.code() == code {
                    return Some(idx);
                }
                stack.extend(node.children.iter().rev());
            }
        }
        None
    }
}

pub struct ForestIterator<'a, T> {
    arena: &'a Arena<TreeNode<T>>,
    stack: Vec<(Index, usize)>,
}

impl<'a, T> ForestIterator<'a, T> {
    fn new(arena: &'a Arena<TreeNode<T>>, roots: &[Index]) -> Self {
        let stack = roots.iter().rev().map(|&idx| (idx, 0)).collect();
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for ForestIterator<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((&node.item, depth));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostics::CollectingSink;
    use crate::domain::Record;

    fn codes<T: HierarchyNode>(infos: &[NodeInfo<&T>]) -> Vec<(String, Vec<String>)> {
        infos
            .iter()
            .map(|info| (info.item.code().to_string(), info.breadcrumb.clone()))
            .collect()
    }

    #[test]
    fn given_empty_forest_when_flattening_then_empty() {
        let forest: Forest<Record> = Forest::new();

        assert!(forest.flatten().is_empty());
        assert_eq!(forest.height(), 0);
        assert!(forest.is_empty());
    }

    #[test]
    fn given_nodes_in_parent_order_when_adding_then_attaches_below_parent() {
        let mut forest = Forest::new();

        assert!(forest.add_node(Record::root("A")));
        assert!(forest.add_node(Record::child("B", "A")));
        assert!(forest.add_node(Record::child("C", "A")));

        assert_eq!(forest.roots(), vec!["A"]);
        assert_eq!(forest.leaf_codes(), vec!["B", "C"]);
        assert_eq!(forest.height(), 2);
    }

    #[test]
    fn given_missing_parent_when_adding_then_drops_and_reports() {
        let mut forest = Forest::with_sink(CollectingSink::new());
        forest.add_node(Record::root("A"));

        let attached = forest.add_node(Record::child("X", "Y"));

        assert!(!attached);
        assert_eq!(forest.len(), 1);
        assert_eq!(
            forest.sink().diagnostics(),
            vec![Diagnostic::DanglingParent {
                code: "X".to_string(),
                parent_code: "Y".to_string()
            }]
        );
    }

    #[test]
    fn given_duplicate_parent_codes_when_adding_then_first_in_preorder_wins() {
        let mut forest = Forest::new();
        forest.add_node(Record::root("A"));
        forest.add_node(Record::child("P", "A"));
        forest.add_node(Record::root("P"));

        forest.add_node(Record::child("C", "P"));

        let flat = forest.flatten();
        let c = flat.iter().find(|info| info.item.code == "C").unwrap();
        assert_eq!(c.breadcrumb, vec!["A", "P"]);
    }

    #[test]
    fn given_flattened_forest_when_iterating_then_depths_match_breadcrumbs() {
        let mut forest = Forest::new();
        forest
            .insert_all(vec![
                Record::root("A"),
                Record::child("B", "A"),
                Record::child("C", "B"),
                Record::root("X"),
            ])
            .unwrap();

        let from_iter: Vec<(String, usize)> = forest
            .iter()
            .map(|(item, depth)| (item.code.clone(), depth))
            .collect();
        let from_flatten: Vec<(String, usize)> = forest
            .flatten()
            .iter()
            .map(|info| (info.item.code.clone(), info.depth()))
            .collect();

        assert_eq!(from_iter, from_flatten);
    }

    #[test]
    fn given_unsorted_batch_when_inserting_then_breadcrumbs_are_root_first() {
        let mut forest = Forest::new();

        forest
            .insert_all(vec![
                Record::child("C", "B"),
                Record::root("A"),
                Record::child("B", "A"),
            ])
            .unwrap();

        assert_eq!(
            codes(&forest.flatten()),
            vec![
                ("A".to_string(), vec![]),
                ("B".to_string(), vec!["A".to_string()]),
                ("C".to_string(), vec!["A".to_string(), "B".to_string()]),
            ]
        );
    }

    #[test]
    fn given_cyclic_batch_when_inserting_then_fails_without_mutation() {
        let mut forest = Forest::new();

        let result = forest.insert_all(vec![Record::child("A", "B"), Record::child("B", "A")]);

        assert!(matches!(result, Err(DomainError::CycleDetected { .. })));
        assert!(forest.flatten().is_empty());
    }

    #[test]
    fn given_chain_deeper_than_ceiling_when_inserting_leaf_first_then_keeps_every_record() {
        let mut forest = Forest::with_sink(CollectingSink::new()).with_max_hops(2);

        forest
            .insert_all(vec![
                Record::child("D", "C"),
                Record::child("C", "B"),
                Record::child("B", "A"),
                Record::root("A"),
            ])
            .unwrap();

        let flat = forest.flatten();
        assert_eq!(flat.len(), 4);
        assert_eq!(
            flat.iter().map(|info| info.item.code.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C", "D"]
        );
        assert!(forest.sink().is_empty());
    }

    #[test]
    fn given_forest_when_rendering_then_nests_codes() {
        let mut forest = Forest::new();
        forest
            .insert_all(vec![Record::root("A"), Record::child("B", "A")])
            .unwrap();

        let rendered = forest.to_tree_string("forest").to_string();

        assert!(rendered.starts_with("forest\n"));
        assert!(rendered.contains("A"));
        assert!(rendered.contains("B"));
    }

    #[test]
    fn given_borrowed_info_when_cloning_then_owns_record() {
        let mut forest = Forest::new();
        forest.add_node(Record::root("A"));

        let owned: Vec<NodeInfo<Record>> = forest.flatten().iter().map(|info| info.cloned()).collect();

        assert_eq!(
            owned,
            vec![NodeInfo {
                item: Record::root("A"),
                breadcrumb: vec![]
            }]
        );
    }
}
