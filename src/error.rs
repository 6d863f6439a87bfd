//! Error types for the fuzzy logic container and its evaluation.
//!
//! Two families share one enum:
//!
//! - **Structural**: [`FuzzyError::Uninitialized`], [`FuzzyError::NotFound`],
//!   [`FuzzyError::IndexOutOfRange`]. The requested operation failed and the caller
//!   must fix the call.
//! - **Data**: [`FuzzyError::UnresolvedReference`], [`FuzzyError::CycleDetected`].
//!   Expected steady states of a user-edited graph; the update pass absorbs them
//!   into "no effect" so one malformed node cannot stop the rest of the graph.

use thiserror::Error;

use crate::id::Id;

/// Errors produced by [`FuzzyLogic`](crate::model::FuzzyLogic) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FuzzyError {
    /// A container operation ran before `initialize()`.
    #[error("fuzzy logic is not initialized")]
    Uninitialized,
    /// No entity with this identifier exists where one was required.
    #[error("no entity with id {0}")]
    NotFound(Id),
    /// Indexed lookup past the end of a collection.
    #[error("index {index} out of range (len: {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Collection length at the time of the call.
        len: usize,
    },
    /// An input reference names neither a fuzzification set nor an inference.
    #[error("reference {0} does not resolve to an input")]
    UnresolvedReference(Id),
    /// Following input links from this inference returns to it.
    #[error("cycle reference through inference {0}")]
    CycleDetected(Id),
}

impl FuzzyError {
    /// `true` for errors the caller must handle; `false` for data errors the
    /// update pass discards.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Uninitialized | Self::NotFound(_) | Self::IndexOutOfRange { .. }
        )
    }
}

/// Result alias for fuzzy logic operations.
pub type FuzzyResult<T> = Result<T, FuzzyError>;
