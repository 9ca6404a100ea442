//! Rolling record of the most recent results.

use super::label::ResultLabel;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// Number of results kept.
pub const HISTORY_CAPACITY: usize = 5;

/// Persisted history did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Malformed history: {}", reason)]
pub struct MalformedHistory {
    /// What was wrong with it.
    pub reason: String,
}

/// The five most recent results, newest first.
///
/// Slots that have never been filled are blank (`None`). The persisted form
/// is a JSON array of five strings where a blank slot is `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ResultHistory {
    entries: [Option<ResultLabel>; HISTORY_CAPACITY],
}

impl ResultHistory {
    /// Creates a history of blank placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a history from a persisted blob.
    ///
    /// Absent or malformed blobs produce a blank history.
    #[instrument(skip(blob), fields(present = blob.is_some()))]
    pub fn load(blob: Option<&str>) -> Self {
        let Some(blob) = blob else {
            debug!("No persisted history, starting blank");
            return Self::new();
        };
        match serde_json::from_str::<Self>(blob) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable history");
                Self::new()
            }
        }
    }

    /// Encodes the history for the persistence collaborator.
    pub fn serialize(&self) -> String {
        serde_json::Value::from(self.to_strings()).to_string()
    }

    /// Returns a new history with `label` first and the oldest entry dropped.
    #[instrument(skip(self))]
    pub fn append(&self, label: ResultLabel) -> Self {
        let mut entries = [None; HISTORY_CAPACITY];
        entries[0] = Some(label);
        entries[1..].copy_from_slice(&self.entries[..HISTORY_CAPACITY - 1]);
        Self { entries }
    }

    /// Entries newest first; blank slots are `None`.
    pub fn entries(&self) -> &[Option<ResultLabel>; HISTORY_CAPACITY] {
        &self.entries
    }

    /// Most recent result, if any game has finished.
    pub fn latest(&self) -> Option<ResultLabel> {
        self.entries[0]
    }

    /// Display strings, blank slots as `""`.
    pub fn to_strings(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.map(|label| label.to_string()).unwrap_or_default())
            .collect()
    }
}

impl From<ResultHistory> for Vec<String> {
    fn from(history: ResultHistory) -> Self {
        history.to_strings()
    }
}

impl TryFrom<Vec<String>> for ResultHistory {
    type Error = MalformedHistory;

    fn try_from(raw: Vec<String>) -> Result<Self, Self::Error> {
        if raw.len() != HISTORY_CAPACITY {
            return Err(MalformedHistory {
                reason: format!("expected {HISTORY_CAPACITY} entries, found {}", raw.len()),
            });
        }
        let mut entries = [None; HISTORY_CAPACITY];
        for (slot, text) in entries.iter_mut().zip(&raw) {
            if text.is_empty() {
                continue;
            }
            let label = ResultLabel::from_str(text).map_err(|_| MalformedHistory {
                reason: format!("unknown result label {text:?}"),
            })?;
            *slot = Some(label);
        }
        Ok(Self { entries })
    }
}
