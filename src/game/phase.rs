//! Session phase.

use super::Mark;
use serde::{Deserialize, Serialize};

/// Discrete state of a session.
///
/// Exactly one phase is active at a time. Only `TurnOf` accepts placements;
/// `Won` and `Tied` are terminal until a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first start intent.
    #[default]
    NotStarted,
    /// The given mark moves next.
    TurnOf(Mark),
    /// The given mark completed a line.
    Won(Mark),
    /// The board filled up with no line.
    Tied,
}

impl Phase {
    /// Returns the mark to move, if a game is in progress.
    pub fn to_move(&self) -> Option<Mark> {
        match self {
            Phase::TurnOf(mark) => Some(*mark),
            _ => None,
        }
    }

    /// True for `Won(_)` and `Tied`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won(_) | Phase::Tied)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::NotStarted => write!(f, "Not started"),
            Phase::TurnOf(Mark::X) => write!(f, "Player1 to move (X)"),
            Phase::TurnOf(Mark::O) => write!(f, "Player2 to move (O)"),
            Phase::Won(Mark::X) => write!(f, "Player1 won"),
            Phase::Won(Mark::O) => write!(f, "Player2 won"),
            Phase::Tied => write!(f, "Game tied"),
        }
    }
}
