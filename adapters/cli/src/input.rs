//! Parsing of player input typed at the prompt or passed as a move script.

use std::str::FromStr;

use thiserror::Error;
use tilemerge_core::Direction;

/// Single instruction issued by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Slide every tile toward an edge.
    Play(Direction),
    /// Abandon the current game and start a new one.
    Reset,
    /// Stop reading input.
    Quit,
}

/// Raised when a token names no known instruction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognised input '{0}': use u, d, l or r to move, n for a new game and q to quit")]
pub(crate) struct InputError(String);

impl FromStr for Input {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = value.trim().to_ascii_lowercase();
        match token.as_str() {
            "n" | "new" | "reset" => Ok(Self::Reset),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => other
                .parse::<Direction>()
                .map(Self::Play)
                .map_err(|_| InputError(value.trim().to_owned())),
        }
    }
}

/// Parses a compact move script such as `"lluR n dd"`.
///
/// Every letter is one instruction; whitespace and commas are ignored.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Input>, InputError> {
    script
        .chars()
        .filter(|symbol| !symbol.is_whitespace() && *symbol != ',')
        .map(|symbol| symbol.to_string().parse())
        .collect()
}
