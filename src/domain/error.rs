//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent structural violations that abort an operation.
///
/// Recoverable anomalies are reported as diagnostics instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cyclic dependency detected in hierarchy: {code}")]
    CycleDetected { code: String },
}

/// Result type for engine operations.
pub type DomainResult<T> = Result<T, DomainError>;
