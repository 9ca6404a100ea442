//! Tie detection.

use super::super::{Board, Cell};
use super::win::winner;
use tracing::instrument;

/// Checks if the board is full (all cells occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}

/// A full board with no winning line.
#[instrument(skip(board))]
pub fn is_tied(board: &Board) -> bool {
    is_full(board) && winner(board).is_none()
}
