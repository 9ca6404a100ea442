//! Strictly Noughts library - two-player noughts and crosses
//!
//! The core is a turn state machine over a 3x3 board together with a rolling
//! record of the last five results. Rendering and storage are collaborators:
//! a front end forwards intents and draws [`Snapshot`]s, and a
//! [`HistoryStore`] keeps the serialized history between runs.
//!
//! # Architecture
//!
//! - **Game**: board values, win/tie rules and the [`GameSession`] state machine
//! - **History**: [`ResultHistory`] and the [`HistoryStore`] boundary
//! - **Host**: [`SessionHost`] runs persistence off the intent path
//! - **Db**: [`SqliteStore`], the diesel-backed store
//!
//! # Example
//!
//! ```
//! use strictly_noughts::{GameSession, Mark, Phase, ResultLabel};
//!
//! let mut session = GameSession::new();
//! session.start();
//! for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
//!     session.select_cell(row, col).expect("in range");
//! }
//! assert_eq!(session.phase(), Phase::Won(Mark::X));
//! assert_eq!(session.history().latest(), Some(ResultLabel::Player1Won));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod console;
mod db;
mod game;
mod history;
mod host;

// Crate-level exports - Game types
pub use game::{
    Board, BoardError, Cell, GameSession, Intent, Mark, Phase, Position, SessionEvent, Snapshot,
    rules,
};

// Crate-level exports - History
pub use history::{
    HISTORY_CAPACITY, HISTORY_KEY, HistoryStore, MalformedHistory, MemoryStore, NullStore,
    ResultHistory, ResultLabel, StoreError,
};

// Crate-level exports - Persistence
pub use db::{DbError, SqliteStore};

// Crate-level exports - Host
pub use host::SessionHost;

// Crate-level exports - Configuration and CLI
pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError, StorageBackend};
pub use console::{ConsoleCommand, HELP, parse_line, render};
