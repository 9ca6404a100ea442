//! Core domain types for noughts and crosses.

use super::action::BoardError;
use super::position::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// Player one's mark (moves first).
    X,
    /// Player two's mark.
    O,
}

impl Mark {
    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Cell holds a mark.
    Occupied(Mark),
}

/// 3x3 board.
///
/// Boards are values: [`Board::place`] returns a new board and leaves the
/// original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order.
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Gets the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] if either coordinate is outside `0..3`.
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        Ok(self.get(Position::from_coords(row, col)?))
    }

    /// Checks if the cell at the given position is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns a copy of the board with `mark` written at `(row, col)`.
    ///
    /// The target cell must be empty. The session checks this before calling;
    /// debug builds assert it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] if either coordinate is outside `0..3`.
    #[instrument(skip(self))]
    pub fn place(&self, row: usize, col: usize, mark: Mark) -> Result<Board, BoardError> {
        let pos = Position::from_coords(row, col)?;
        Ok(self.with_mark(pos, mark))
    }

    /// Returns a copy of the board with `mark` written at `pos`.
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Board {
        debug_assert!(self.is_empty(pos), "cell {pos} is already occupied");
        let mut next = *self;
        next.cells[pos.to_index()] = Cell::Occupied(mark);
        next
    }

    /// Checks whether `mark` holds a complete line.
    pub fn has_won(&self, mark: Mark) -> bool {
        super::rules::has_won(self, mark)
    }

    /// Checks whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        super::rules::is_full(self)
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let symbol = match self.cells[row * 3 + col] {
                    Cell::Empty => ".".to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}
