//! Turn state machine.
//!
//! The session owns the board, the phase and the result history. Intents are
//! processed one at a time to completion; intents the current phase does not
//! accept are ignored rather than reported as errors.

use super::action::{BoardError, Intent};
use super::phase::Phase;
use super::position::Position;
use super::rules;
use super::types::{Board, Mark};
use crate::history::{ResultHistory, ResultLabel};
use tracing::{debug, info, instrument};

/// What an intent did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The current phase does not accept the intent; nothing changed.
    Ignored,
    /// The first game began.
    Started,
    /// A mark was placed and the game continues.
    Placed {
        /// Mark that was placed.
        mark: Mark,
        /// Where it was placed.
        position: Position,
    },
    /// A placement ended the game and its result was recorded.
    Finished {
        /// Recorded result.
        outcome: ResultLabel,
        /// History after the result was appended.
        history: ResultHistory,
    },
    /// A finished game was cleared and a new one began.
    Restarted,
}

/// Everything a renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase.
    pub phase: Phase,
    /// Current board.
    pub board: Board,
    /// Recent results, newest first.
    pub history: ResultHistory,
}

/// A game session.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    board: Board,
    phase: Phase,
    history: ResultHistory,
    revision: u64,
}

impl GameSession {
    /// Creates a session with a blank history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session seeded with a previously loaded history.
    pub fn with_history(history: ResultHistory) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the result history.
    pub fn history(&self) -> &ResultHistory {
        &self.history
    }

    /// Number of results appended during this session's lifetime.
    ///
    /// A history load issued at one revision must not be applied once the
    /// revision has moved on.
    pub fn history_revision(&self) -> u64 {
        self.revision
    }

    /// Returns the state for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            board: self.board,
            history: self.history,
        }
    }

    /// Dispatches an intent.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] for a cell outside the board.
    pub fn apply(&mut self, intent: Intent) -> Result<SessionEvent, BoardError> {
        match intent {
            Intent::Start => Ok(self.start()),
            Intent::SelectCell { row, col } => self.select_cell(row, col),
            Intent::Restart => Ok(self.restart()),
        }
    }

    /// Begins the first game. Only valid before any game has started.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn start(&mut self) -> SessionEvent {
        if self.phase != Phase::NotStarted {
            debug!("Start ignored outside NotStarted");
            return SessionEvent::Ignored;
        }
        self.phase = Phase::TurnOf(Mark::X);
        info!("Game started");
        SessionEvent::Started
    }

    /// Places the current player's mark at `(row, col)`.
    ///
    /// Ignored when no game is in progress or the cell is taken.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] if either coordinate is outside `0..3`.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn select_cell(&mut self, row: usize, col: usize) -> Result<SessionEvent, BoardError> {
        let position = Position::from_coords(row, col)?;

        let Some(mark) = self.phase.to_move() else {
            debug!("Selection ignored, no game in progress");
            return Ok(SessionEvent::Ignored);
        };
        if !self.board.is_empty(position) {
            debug!(%position, "Selection ignored, cell occupied");
            return Ok(SessionEvent::Ignored);
        }

        self.board = self.board.with_mark(position, mark);
        Ok(self.evaluate(mark, position))
    }

    /// Sets the next phase after `mover` played at `position`.
    ///
    /// Checks a win for X, then for O, then a tie.
    fn evaluate(&mut self, mover: Mark, position: Position) -> SessionEvent {
        let outcome = if let Some(winner) = rules::winner(&self.board) {
            self.phase = Phase::Won(winner);
            ResultLabel::win_for(winner)
        } else if rules::is_full(&self.board) {
            self.phase = Phase::Tied;
            ResultLabel::GameTied
        } else {
            self.phase = Phase::TurnOf(mover.opponent());
            debug!(%mover, %position, "Mark placed");
            return SessionEvent::Placed {
                mark: mover,
                position,
            };
        };

        self.history = self.history.append(outcome);
        self.revision += 1;
        info!(%outcome, revision = self.revision, "Game finished");
        SessionEvent::Finished {
            outcome,
            history: self.history,
        }
    }

    /// Clears a finished game and starts the next one with X to move.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn restart(&mut self) -> SessionEvent {
        if !self.phase.is_terminal() {
            debug!("Restart ignored outside a finished game");
            return SessionEvent::Ignored;
        }
        self.board = Board::new();
        self.phase = Phase::TurnOf(Mark::X);
        info!("Game restarted");
        SessionEvent::Restarted
    }

    /// Replaces the history with one loaded from storage.
    ///
    /// `requested_at` is the revision at which the load was issued. The
    /// history is only replaced if no result has been appended since; returns
    /// whether it was applied.
    #[instrument(skip(self, history), fields(current = self.revision))]
    pub fn apply_loaded_history(&mut self, history: ResultHistory, requested_at: u64) -> bool {
        if requested_at != self.revision {
            debug!("Discarding stale history load");
            return false;
        }
        self.history = history;
        true
    }
}
