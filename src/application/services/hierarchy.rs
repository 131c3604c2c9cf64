//! Hierarchy service
//!
//! Loads record batches and answers structural queries over them.

use std::path::Path;
use std::sync::Arc;

use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{parse_records, ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    ancestors_bounded, depth_bounded, descendants, find_cycle_in_batch, has_cycle,
    index_by_code, DepthMemo, Forest, NodeInfo, Record, TracingSink,
};
use crate::infrastructure::traits::FileSystem;

/// Outcome of checking whether one record may join a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateCheck {
    Accepted,
    Cycle,
}

/// Service for building forests from record files.
pub struct HierarchyService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl HierarchyService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Read and validate the records stored in `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Record>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::NotFound(path.to_path_buf()));
        }
        let content = self.fs.read_to_string(path).with_path_context(path)?;
        parse_records(&content, path, self.settings.reject_duplicate_codes)
    }

    /// Assemble a forest from a batch, all or nothing.
    pub fn build_forest(&self, records: Vec<Record>) -> ApplicationResult<Forest<Record>> {
        let mut forest = Forest::new().with_max_hops(self.settings.max_hops);
        forest.insert_all(records)?;
        debug!(nodes = forest.len(), roots = forest.roots().len(), "forest built");
        Ok(forest)
    }

    /// Records of `path` in pre-order with their breadcrumbs.
    pub fn flatten(&self, path: &Path) -> ApplicationResult<Vec<NodeInfo<Record>>> {
        let forest = self.build_forest(self.load(path)?)?;
        Ok(forest.flatten().iter().map(|info| info.cloned()).collect())
    }

    /// Render the forest of `path`, labelled with the file name.
    pub fn tree(&self, path: &Path) -> ApplicationResult<Tree<String>> {
        let forest = self.build_forest(self.load(path)?)?;
        Ok(forest.to_tree_string(&path.display().to_string()))
    }

    /// Ancestor codes of `code`, immediate parent first.
    pub fn ancestors(&self, path: &Path, code: &str) -> ApplicationResult<Vec<String>> {
        let records = self.load(path)?;
        let by_code = index_by_code(&records);
        Ok(ancestors_bounded(
            code,
            &by_code,
            self.settings.max_hops,
            &TracingSink,
        ))
    }

    /// Descendant codes of `code`, sorted.
    pub fn descendants(&self, path: &Path, code: &str) -> ApplicationResult<Vec<String>> {
        let records = self.load(path)?;
        let by_code = index_by_code(&records);
        Ok(descendants(code, &by_code).into_iter().sorted().collect())
    }

    /// Depth of `code`, `None` if the batch does not contain it.
    pub fn depth(&self, path: &Path, code: &str) -> ApplicationResult<Option<usize>> {
        let records = self.load(path)?;
        let by_code = index_by_code(&records);
        Ok(depth_bounded(
            code,
            &by_code,
            &mut DepthMemo::new(),
            self.settings.max_hops,
            &TracingSink,
        ))
    }

    /// A code taking part in a parent cycle, if the batch has one.
    pub fn find_cycle(&self, path: &Path) -> ApplicationResult<Option<String>> {
        let records = self.load(path)?;
        Ok(find_cycle_in_batch(&records))
    }

    /// Would adding `candidate` to the batch in `path` introduce a cycle?
    pub fn check_candidate(
        &self,
        path: &Path,
        candidate: &Record,
    ) -> ApplicationResult<CandidateCheck> {
        let records = self.load(path)?;
        if has_cycle(candidate, &records) {
            Ok(CandidateCheck::Cycle)
        } else {
            Ok(CandidateCheck::Accepted)
        }
    }
}
