//! Line-oriented text front end.
//!
//! Turns typed lines into intents and renders snapshots as plain text.

use crate::game::{Intent, Snapshot};

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Forward an intent to the session.
    Intent(Intent),
    /// Redraw the current state.
    Show,
    /// Print usage.
    Help,
    /// Leave the game.
    Quit,
}

/// Usage text for the play loop.
pub const HELP: &str = "Commands: start | <row> <col> | restart | show | help | quit";

/// Parses one line of input. Returns `None` for anything unrecognised.
///
/// Cell coordinates are accepted as two integers separated by whitespace or a
/// comma. Range checking is left to the session.
pub fn parse_line(line: &str) -> Option<ConsoleCommand> {
    let line = line.trim().to_lowercase();
    let command = match line.as_str() {
        "start" | "s" => ConsoleCommand::Intent(Intent::Start),
        "restart" | "r" => ConsoleCommand::Intent(Intent::Restart),
        "show" => ConsoleCommand::Show,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        other => {
            let mut parts = other
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty());
            let row = parts.next()?.parse().ok()?;
            let col = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            ConsoleCommand::Intent(Intent::SelectCell { row, col })
        }
    };
    Some(command)
}

/// Renders a snapshot as text.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = format!("{}\n\n{}\n\nPrevious Game Results\n", snapshot.phase, snapshot.board.display());
    for entry in snapshot.history.to_strings() {
        out.push_str("  ");
        out.push_str(if entry.is_empty() { "-" } else { entry.as_str() });
        out.push('\n');
    }
    out
}
