use thiserror::Error;

/// Fatal failures the core can raise. None are retryable; a caller comparing
/// many pairs is expected to catch one of these for a single pair and move on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The hierarchy violates one of a statechart's structural invariants
    /// (e.g. a dangling region/state reference, or a duplicate id).
    #[error("structural integrity violated: {0}")]
    StructuralIntegrity(String),

    /// A trigger used the `after <N> <unit>` grammar with an unrecognised unit.
    #[error("unknown time unit `{unit}` in trigger `{trigger}`")]
    UnknownTimeUnit {
        /// The offending unit token.
        unit: String,
        /// The full trigger string it came from.
        trigger: String,
    },

    /// Two nodes of the same comparison graph share an `(id, label)` pair.
    #[error("ambiguous labelled node: id `{id}` label `{label}` appears more than once")]
    AmbiguousLabelledNode {
        /// The colliding node id.
        id: String,
        /// The colliding label.
        label: String,
    },
}

/// The crate's standard result type.
pub type CoreResult<T> = Result<T, CoreError>;
