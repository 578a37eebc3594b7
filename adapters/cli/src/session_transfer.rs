//! Single-line session strings of the form `tilemerge:v1:4x4:<payload>`.
//!
//! The payload is the JSON form of a [`SessionSnapshot`], base64 encoded
//! without padding so the whole string survives copy and paste.

use std::fmt;

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use thiserror::Error;
use tilemerge_core::{SessionSnapshot, GRID_SIZE};

const SESSION_DOMAIN: &str = "tilemerge";
const SESSION_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Segments of a session string, in the order they appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment {
    Domain,
    Version,
    Dimensions,
    Payload,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Domain => "prefix",
            Self::Version => "version",
            Self::Dimensions => "grid dimensions",
            Self::Payload => "payload",
        };
        f.write_str(name)
    }
}

/// Errors raised while moving a session in or out of its string form.
#[derive(Debug, Error)]
pub(crate) enum SessionTransferError {
    /// The session string is missing one of its four segments.
    #[error("session string has no {0}")]
    Missing(Segment),
    /// The domain or version segment names another format.
    #[error("'{found}' is not a supported session {segment}")]
    Unsupported {
        /// Segment holding the unexpected value.
        segment: Segment,
        /// Value found in the segment.
        found: String,
    },
    /// The session targets a grid this build does not play.
    #[error("session grid '{0}' does not match the {} by {} grid", GRID_SIZE, GRID_SIZE)]
    GridMismatch(String),
    /// The payload is not valid unpadded base64.
    #[error("session payload is not valid base64")]
    Encoding(#[source] base64::DecodeError),
    /// The payload JSON does not describe a session.
    #[error("session payload does not describe a session")]
    Payload(#[source] serde_json::Error),
}

/// Prefix shared by every session string this build produces.
fn header() -> String {
    let delimiter = FIELD_DELIMITER;
    format!("{SESSION_DOMAIN}{delimiter}{SESSION_VERSION}{delimiter}{GRID_SIZE}x{GRID_SIZE}")
}

/// Encodes a session into a single-line string that can be pasted back later.
pub(crate) fn encode(snapshot: &SessionSnapshot) -> Result<String, SessionTransferError> {
    let json = serde_json::to_vec(snapshot).map_err(SessionTransferError::Payload)?;
    Ok(format!(
        "{}{FIELD_DELIMITER}{}",
        header(),
        STANDARD_NO_PAD.encode(json)
    ))
}

/// Decodes a session string; surrounding whitespace is ignored.
pub(crate) fn decode(value: &str) -> Result<SessionSnapshot, SessionTransferError> {
    let mut segments = value.trim().splitn(4, FIELD_DELIMITER);
    let mut next = |segment| {
        segments
            .next()
            .filter(|text| !text.is_empty())
            .ok_or(SessionTransferError::Missing(segment))
    };
    let domain = next(Segment::Domain)?;
    let version = next(Segment::Version)?;
    let dimensions = next(Segment::Dimensions)?;
    let payload = next(Segment::Payload)?;

    expect_segment(Segment::Domain, domain, SESSION_DOMAIN)?;
    expect_segment(Segment::Version, version, SESSION_VERSION)?;
    if !matches_grid(dimensions) {
        return Err(SessionTransferError::GridMismatch(dimensions.to_owned()));
    }

    let json = STANDARD_NO_PAD
        .decode(payload)
        .map_err(SessionTransferError::Encoding)?;
    serde_json::from_slice(&json).map_err(SessionTransferError::Payload)
}

fn expect_segment(
    segment: Segment,
    found: &str,
    expected: &str,
) -> Result<(), SessionTransferError> {
    if found == expected {
        return Ok(());
    }
    Err(SessionTransferError::Unsupported {
        segment,
        found: found.to_owned(),
    })
}

/// Accepts `4x4` (either case of `x`, surrounding spaces allowed) for a 4 by 4 grid.
fn matches_grid(dimensions: &str) -> bool {
    let side = |text: &str| text.trim().parse::<usize>().ok();
    dimensions
        .split_once(['x', 'X'])
        .and_then(|(columns, rows)| Some((side(columns)?, side(rows)?)))
        == Some((GRID_SIZE, GRID_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemerge_core::{CellCoord, GameState, TileValue};

    fn snapshot() -> SessionSnapshot {
        let mut rows = vec![vec![None; GRID_SIZE]; GRID_SIZE];
        rows[0][1] = TileValue::new(2);
        rows[2][3] = TileValue::new(1024);
        SessionSnapshot {
            rows,
            score: 4_096,
            last_spawned: Some(CellCoord::new(1, 0)),
            state: GameState::InPlay,
        }
    }

    #[test]
    fn encoded_session_decodes_to_the_same_snapshot() {
        let snapshot = snapshot();

        let encoded = encode(&snapshot).expect("snapshot encodes");
        assert!(encoded.starts_with("tilemerge:v1:4x4:"));
        assert!(!encoded.contains(char::is_whitespace));

        let decoded = decode(&format!("  {encoded}\n")).expect("snapshot decodes");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn foreign_prefix_and_version_are_rejected() {
        assert!(matches!(
            decode("puzzle:v1:4x4:e30"),
            Err(SessionTransferError::Unsupported { segment: Segment::Domain, found })
                if found == "puzzle"
        ));
        assert!(matches!(
            decode("tilemerge:v9:4x4:e30"),
            Err(SessionTransferError::Unsupported { segment: Segment::Version, found })
                if found == "v9"
        ));
    }

    #[test]
    fn missing_segments_are_named() {
        assert!(matches!(
            decode("   "),
            Err(SessionTransferError::Missing(Segment::Domain))
        ));
        assert!(matches!(
            decode("tilemerge:v1"),
            Err(SessionTransferError::Missing(Segment::Dimensions))
        ));
        assert!(matches!(
            decode("tilemerge:v1:4x4:"),
            Err(SessionTransferError::Missing(Segment::Payload))
        ));
    }

    #[test]
    fn other_grid_sizes_are_rejected() {
        for dimensions in ["5x5", "0x4", "4by4", "4x"] {
            assert!(matches!(
                decode(&format!("tilemerge:v1:{dimensions}:e30")),
                Err(SessionTransferError::GridMismatch(found)) if found == dimensions
            ));
        }
        assert!(matches!(
            decode("tilemerge:v1: 4X4 :e30"),
            Err(SessionTransferError::Payload(_))
        ));
    }

    #[test]
    fn broken_payload_is_reported_as_encoding_error() {
        assert!(matches!(
            decode("tilemerge:v1:4x4:@@@"),
            Err(SessionTransferError::Encoding(_))
        ));
    }

    #[test]
    fn tile_values_that_are_not_powers_of_two_are_rejected() {
        let mut rows: Vec<Vec<Option<u32>>> = vec![vec![None; GRID_SIZE]; GRID_SIZE];
        rows[0][0] = Some(3);
        let json = serde_json::json!({
            "rows": rows,
            "score": 0,
            "last_spawned": null,
            "state": "InPlay",
        });
        let payload = STANDARD_NO_PAD.encode(json.to_string());

        assert!(matches!(
            decode(&format!("tilemerge:v1:4x4:{payload}")),
            Err(SessionTransferError::Payload(_))
        ));
    }
}
