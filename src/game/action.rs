//! Intents forwarded by the UI and the errors placement can raise.
//!
//! Intents are domain events, not side effects. The session decides whether
//! the current phase accepts them.

use serde::{Deserialize, Serialize};

/// A request from the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Begin the first game.
    Start,
    /// Place the current player's mark at `(row, col)`.
    SelectCell {
        /// Row (0-2).
        row: usize,
        /// Column (0-2).
        col: usize,
    },
    /// Clear a finished game and begin the next one.
    Restart,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Start => write!(f, "start"),
            Intent::SelectCell { row, col } => write!(f, "select ({row}, {col})"),
            Intent::Restart => write!(f, "restart"),
        }
    }
}

/// Error raised by board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// A coordinate was outside `0..3`.
    #[display("Cell ({row}, {col}) is outside the 3x3 board")]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}
