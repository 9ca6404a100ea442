//! Labels recorded for finished games.

use crate::game::Mark;
use serde::{Deserialize, Serialize};

/// Outcome label stored in the result history.
///
/// The string forms are the persisted representation and must not change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum ResultLabel {
    /// X completed a line.
    #[strum(serialize = "Player1 Won")]
    #[serde(rename = "Player1 Won")]
    Player1Won,
    /// O completed a line.
    #[strum(serialize = "Player2 Won")]
    #[serde(rename = "Player2 Won")]
    Player2Won,
    /// Board filled with no line.
    #[strum(serialize = "Game Tied")]
    #[serde(rename = "Game Tied")]
    GameTied,
}

impl ResultLabel {
    /// Label for a win by `mark`.
    pub fn win_for(mark: Mark) -> Self {
        match mark {
            Mark::X => ResultLabel::Player1Won,
            Mark::O => ResultLabel::Player2Won,
        }
    }
}
