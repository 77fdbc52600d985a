//! Error taxonomy for the puzzle core.
//!
//! Every variant here indicates a caller bug (an index that valid UI input
//! can never produce). Expected oddities of user interaction — clicking the
//! empty peg with nothing selected, clicking while ropes are settling,
//! clicking under the completion overlay — are not errors; they surface as
//! informational outcomes on the operations themselves.

use thiserror::Error;

/// Errors that can occur in puzzle-core operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Level index outside the catalog.
    #[error("level index {index} out of range (catalog has {count} levels)")]
    LevelOutOfRange {
        /// The requested level index.
        index: usize,
        /// Number of levels in the catalog.
        count: usize,
    },

    /// Peg index outside 0..5.
    #[error("peg index {0} out of range (pegs are 0..5)")]
    PegOutOfRange(usize),

    /// Rope id outside 0..4 passed to the animator.
    #[error("rope id {0} out of range (ropes are 0..4)")]
    InvalidRope(usize),
}
