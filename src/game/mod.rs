mod action;
mod phase;
mod position;
mod session;
mod types;

pub mod rules;

pub use action::{BoardError, Intent};
pub use phase::Phase;
pub use position::Position;
pub use session::{GameSession, SessionEvent, Snapshot};
pub use types::{Board, Cell, Mark};
