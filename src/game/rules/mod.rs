//! Game rules.
//!
//! Pure functions over [`Board`](super::Board) values. Rules are kept apart
//! from board storage so the session and tests can compose them freely.

pub mod draw;
pub mod win;

pub use draw::{is_full, is_tied};
pub use win::{LINES, has_won, winner};
