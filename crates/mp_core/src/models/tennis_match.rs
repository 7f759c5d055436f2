//! The match aggregate root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::format::MatchFormat;
use super::point::{PointDetail, Side};
use super::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementReason {
    Retired,
    Weather,
    Injury,
}

/// Aggregate root for one tracked match. `score` is always a pure function
/// of `point_log` (plus `format` and `initial_server`); the lifecycle
/// controller keeps that invariant by rebuilding the score via replay
/// instead of inverse mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TennisMatch {
    pub id: Uuid,
    /// External player/team references, used by the cross-match aggregator
    /// to resolve which side a player was on.
    pub player1_id: String,
    pub player2_id: String,
    pub format: MatchFormat,
    /// Server of game 1. Everything else about service order derives from
    /// this and the game counter.
    pub initial_server: Side,
    pub score: Score,
    pub point_log: Vec<PointDetail>,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Whole minutes per completed set.
    #[serde(default)]
    pub set_durations_min: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement_reason: Option<RetirementReason>,
}

impl TennisMatch {
    /// Create an empty match ready for scoring. When the format replaces the
    /// deciding set with a super tiebreak and the match is a single set, the
    /// score opens directly in tiebreak mode.
    pub fn new(
        player1_id: impl Into<String>,
        player2_id: impl Into<String>,
        format: MatchFormat,
        initial_server: Side,
    ) -> Self {
        let mut score = Score::new(initial_server);
        if format.is_super_tiebreak_set(1) {
            score.is_tiebreak = true;
        }
        Self {
            id: Uuid::new_v4(),
            player1_id: player1_id.into(),
            player2_id: player2_id.into(),
            format,
            initial_server,
            score,
            point_log: Vec::new(),
            status: MatchStatus::InProgress,
            winner: None,
            start_time: None,
            end_time: None,
            set_durations_min: Vec::new(),
            retirement_reason: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Resolve which side a player id refers to, if they took part at all.
    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        if self.player1_id == player_id {
            Some(Side::P1)
        } else if self.player2_id == player_id {
            Some(Side::P2)
        } else {
            None
        }
    }

    /// External id of the match winner, when decided.
    pub fn winner_id(&self) -> Option<&str> {
        self.winner.map(|side| match side {
            Side::P1 => self.player1_id.as_str(),
            Side::P2 => self.player2_id.as_str(),
        })
    }

    /// Chronological sort key for streak computation. Matches without any
    /// recorded time sort first.
    pub fn sort_time(&self) -> DateTime<Utc> {
        self.start_time
            .or(self.end_time)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
