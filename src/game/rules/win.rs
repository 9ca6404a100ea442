//! Win detection.

use super::super::{Board, Cell, Mark, Position};
use tracing::instrument;

/// The eight winning lines: rows, columns, then diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::BottomLeft, Position::Center, Position::TopRight],
];

/// Checks whether `mark` fills any complete line.
#[instrument(skip(board))]
pub fn has_won(board: &Board, mark: Mark) -> bool {
    let target = Cell::Occupied(mark);
    LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.get(pos) == target))
}

/// Returns the winning mark, checking X before O.
#[instrument(skip(board))]
pub fn winner(board: &Board) -> Option<Mark> {
    [Mark::X, Mark::O]
        .into_iter()
        .find(|&mark| has_won(board, mark))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(mark: Mark, positions: &[Position]) -> Board {
        positions
            .iter()
            .fold(Board::new(), |board, &pos| board.with_mark(pos, mark))
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert!(!has_won(&board, Mark::X));
        assert!(!has_won(&board, Mark::O));
        assert_eq!(winner(&board), None);
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            let board = board_with(Mark::O, &line);
            assert!(has_won(&board, Mark::O), "line {line:?} should win");
            assert!(!has_won(&board, Mark::X));
        }
    }

    #[test]
    fn test_anti_diagonal() {
        let board = board_with(
            Mark::X,
            &[Position::BottomLeft, Position::Center, Position::TopRight],
        );
        assert_eq!(winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(Mark::X, &[Position::TopLeft, Position::TopCenter]);
        assert!(!has_won(&board, Mark::X));
    }

    #[test]
    fn test_mixed_line_does_not_win() {
        let board = board_with(Mark::X, &[Position::TopLeft, Position::TopCenter])
            .with_mark(Position::TopRight, Mark::O);
        assert_eq!(winner(&board), None);
    }
}
