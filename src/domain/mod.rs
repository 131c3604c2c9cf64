//! Domain layer: the hierarchy engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod cycle;
pub mod depth;
pub mod diagnostics;
pub mod error;
pub mod forest;
pub mod node;
pub mod resolve;

pub use cycle::{detect_cycle_in_batch, find_cycle_in_batch, has_cycle};
pub use depth::{depth, depth_bounded, DepthMemo, DEFAULT_MAX_HOPS};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use error::{DomainError, DomainResult};
pub use forest::{Forest, ForestIterator, NodeInfo};
pub use node::{index_by_code, HierarchyNode, Record};
pub use resolve::{ancestors, ancestors_bounded, descendants};
