//! Point-level types: sides, serve metadata, outcomes and the append-only
//! `PointDetail` record.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One of the two competing sides. In doubles a side is a team; the engine
/// does not distinguish singles from doubles below this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "p1")]
    P1,
    #[serde(rename = "p2")]
    P2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    /// Both sides, in `p1`, `p2` order. Used by detectors that probe each
    /// side in turn.
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::P1 => write!(f, "p1"),
            Side::P2 => write!(f, "p2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ServeType {
    #[default]
    First,
    Second,
}

/// How the point ended. Closed enum: every consumer matches exhaustively so
/// a new outcome forces every classification site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum PointOutcome {
    Ace,
    Winner,
    UnforcedError,
    ForcedError,
    DoubleFault,
}

/// Which service box the point started from. Derived from the point parity
/// within the game, never caller-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtPosition {
    Deuce,
    Ad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Serve,
    Forehand,
    Backhand,
    Volley,
    Overhead,
    DropShot,
    Lob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServePlacement {
    Wide,
    Body,
    T,
}

/// The immutable record of a single played point. Appended to the match
/// point log by the lifecycle controller, one entry per awarded point.
///
/// The `is_*` flags are computed from score + format at creation time for
/// fast statistics lookups. They are re-derivable and must never disagree
/// with a fresh derivation against the pre-point score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDetail {
    pub winner: Side,
    /// Side that served this point. During a tiebreak this is the per-point
    /// server from the tiebreak rotation, not the tiebreak opener.
    pub server: Side,
    /// 1-based set counter, monotonically non-decreasing across the log.
    pub set_number: u8,
    /// 1-based game counter, cumulative across the whole match (a tiebreak
    /// counts as one game), so it is monotonically non-decreasing too.
    pub game_number: u32,
    pub serve_type: ServeType,
    pub outcome: PointOutcome,
    /// True when the point was played inside a tiebreak.
    #[serde(default)]
    pub is_tiebreak: bool,

    // Descriptive, non-authoritative metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shot_type: Option<ShotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shot_player: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_placement: Option<ServePlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_speed_kmh: Option<u16>,
    #[serde(default)]
    pub rally_length: u16,
    pub court_position: CourtPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // Derived flags, computed against the score the point was played under.
    #[serde(default)]
    pub is_break_point: bool,
    #[serde(default)]
    pub is_set_point: bool,
    #[serde(default)]
    pub is_match_point: bool,
    /// True when this point ended a game (or a tiebreak).
    #[serde(default)]
    pub is_game_winning: bool,
}

impl PointDetail {
    /// Enforce the outcome invariants: an ace is always won by the server,
    /// and a double fault is always a second-serve point lost by the server.
    pub fn validate(&self) -> Result<()> {
        match self.outcome {
            PointOutcome::Ace if self.winner != self.server => Err(EngineError::InvalidPoint(
                "ace must be won by the serving side".into(),
            )),
            PointOutcome::DoubleFault if self.winner == self.server => Err(
                EngineError::InvalidPoint("double fault cannot be won by the serving side".into()),
            ),
            PointOutcome::DoubleFault if self.serve_type != ServeType::Second => Err(
                EngineError::InvalidPoint("double fault requires a second serve".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Side that lost the point.
    pub fn loser(&self) -> Side {
        self.winner.opponent()
    }
}

/// Caller-supplied portion of a point. Everything the controller can derive
/// (server, counters, court position, critical-point flags) is filled in by
/// `MatchController::award_point`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointInput {
    pub serve_type: ServeType,
    pub outcome: PointOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shot_type: Option<ShotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shot_player: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_placement: Option<ServePlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_speed_kmh: Option<u16>,
    #[serde(default)]
    pub rally_length: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PointInput {
    pub fn new(serve_type: ServeType, outcome: PointOutcome) -> Self {
        Self {
            serve_type,
            outcome,
            last_shot_type: None,
            last_shot_player: None,
            serve_placement: None,
            serve_speed_kmh: None,
            rally_length: 0,
            notes: None,
        }
    }
}
