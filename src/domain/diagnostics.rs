//! Non-fatal structural anomalies and the sink they are reported to.

use std::cell::RefCell;
use std::fmt;

/// Anomaly observed while walking or assembling a hierarchy.
///
/// None of these abort an operation; they are reported and processing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `add_node` found no attachment point for the record's parent.
    DanglingParent { code: String, parent_code: String },
    /// A parent link named a code that is not in the record map.
    ParentNotFound { code: String },
    /// A walk was cut off at the hop ceiling.
    HopLimitReached { code: String, limit: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingParent { code, parent_code } => write!(
                f,
                "node {} dropped: parent {} not found in forest",
                code, parent_code
            ),
            Diagnostic::ParentNotFound { code } => write!(f, "parent not found: {}", code),
            Diagnostic::HopLimitReached { code, limit } => {
                write!(f, "walk from {} stopped at {} hops", code, limit)
            }
        }
    }
}

/// Receiver for [`Diagnostic`]s, injected into the engine.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Default sink: forwards every diagnostic as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::DanglingParent { code, parent_code } => tracing::warn!(
                node_code = %code,
                parent_code = %parent_code,
                "node insertion failed: possible hierarchy inconsistency"
            ),
            Diagnostic::ParentNotFound { code } => {
                tracing::warn!(code = %code, "parent not found in map")
            }
            Diagnostic::HopLimitReached { code, limit } => {
                tracing::warn!(code = %code, limit, "hop ceiling reached")
            }
        }
    }
}

/// Keeps every diagnostic it receives, in order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}
