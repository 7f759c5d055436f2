//! Persisted-record boundary.
//!
//! The external document store keeps matches in a loosely shaped JSON
//! payload: sets appear either as `[p1, p2]` pairs or `{player1, player2}`
//! objects, `games` is the single `[p1, p2]` pair of the set in progress
//! (never a per-set history array: completed sets arrive in `sets`, and the
//! point log carries everything else), game points are stored as call
//! strings (`"0"/"15"/"30"/"40"/"Ad"`), and each point-log entry is one
//! serialized string. Everything is normalized into the canonical internal
//! representation here, and only here. Malformed fragments are recovered
//! locally (zeroed defaults, skipped entries) and logged; they are never
//! fatal: every score field deserializes through a lenient path that
//! substitutes its default for a type-corrupt value, and hydration ends
//! with a replay reconciliation that makes the point log the source of
//! truth.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::MatchController;
use crate::error::Result;
use crate::models::{
    FinalSetTiebreak, MatchFormat, MatchStatus, PointDetail, RetirementReason, Score, Side,
    TennisMatch,
};

/// A completed set in either wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetScore {
    Pair([u8; 2]),
    Keyed { player1: u8, player2: u8 },
}

impl SetScore {
    pub fn as_pair(&self) -> (u8, u8) {
        match *self {
            SetScore::Pair([p1, p2]) => (p1, p2),
            SetScore::Keyed { player1, player2 } => (player1, player2),
        }
    }
}

/// Game points as traditional call strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCalls {
    pub player1: String,
    pub player2: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TiebreakCounts {
    pub player1: u16,
    pub player2: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePayload {
    #[serde(default, deserialize_with = "lenient_sets")]
    pub sets: Vec<SetScore>,
    /// Current set's game count, `[p1, p2]`.
    #[serde(default, deserialize_with = "lenient")]
    pub games: Option<[u8; 2]>,
    #[serde(default, deserialize_with = "lenient")]
    pub points: Option<PointCalls>,
    #[serde(rename = "isTiebreak", default, deserialize_with = "lenient")]
    pub is_tiebreak: bool,
    #[serde(
        rename = "tiebreakPoints",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub tiebreak_points: Option<TiebreakCounts>,
    #[serde(default = "default_server", deserialize_with = "lenient_server")]
    pub server: Side,
}

impl Default for ScorePayload {
    fn default() -> Self {
        Self {
            sets: Vec::new(),
            games: None,
            points: None,
            is_tiebreak: false,
            tiebreak_points: None,
            server: Side::P1,
        }
    }
}

fn default_server() -> Side {
    Side::P1
}

/// Deserialize a score fragment, falling back to the field's default when
/// the stored value has the wrong shape. The replay reconciliation repairs
/// whatever the default loses.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|error| {
        tracing::warn!(%error, "unparseable score fragment, substituting default");
        T::default()
    }))
}

fn lenient_server<'de, D>(deserializer: D) -> std::result::Result<Side, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Side::deserialize(value).unwrap_or_else(|error| {
        tracing::warn!(%error, "unparseable server fragment, defaulting to p1");
        Side::P1
    }))
}

/// Set entries are recovered one by one: a corrupt entry is dropped, the
/// parseable ones survive.
fn lenient_sets<'de, D>(deserializer: D) -> std::result::Result<Vec<SetScore>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(entries) => entries,
        other => {
            tracing::warn!(?other, "sets fragment is not an array, substituting empty");
            Vec::new()
        }
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match SetScore::deserialize(entry) {
            Ok(set) => Some(set),
            Err(error) => {
                tracing::warn!(index, %error, "dropping corrupt set entry");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatPayload {
    pub sets: u8,
    #[serde(rename = "noAd", default)]
    pub no_ad: bool,
    #[serde(default = "default_true")]
    pub tiebreak: bool,
    #[serde(rename = "finalSetTiebreak", default)]
    pub final_set_tiebreak: FinalSetTiebreak,
    #[serde(rename = "finalSetTiebreakAt", default = "default_super_target")]
    pub final_set_tiebreak_at: u16,
}

fn default_true() -> bool {
    true
}

fn default_super_target() -> u16 {
    10
}

impl From<&FormatPayload> for MatchFormat {
    fn from(payload: &FormatPayload) -> Self {
        MatchFormat {
            sets_to_play: payload.sets,
            no_ad: payload.no_ad,
            tiebreak_enabled: payload.tiebreak,
            final_set_tiebreak: payload.final_set_tiebreak,
            final_set_tiebreak_at: payload.final_set_tiebreak_at,
        }
    }
}

impl From<&MatchFormat> for FormatPayload {
    fn from(format: &MatchFormat) -> Self {
        FormatPayload {
            sets: format.sets_to_play,
            no_ad: format.no_ad,
            tiebreak: format.tiebreak_enabled,
            final_set_tiebreak: format.final_set_tiebreak,
            final_set_tiebreak_at: format.final_set_tiebreak_at,
        }
    }
}

/// The match document as the external store keeps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub score: ScorePayload,
    /// One serialized `PointDetail` per point, in order.
    #[serde(rename = "pointLog", default)]
    pub point_log: Vec<String>,
    #[serde(rename = "matchFormat")]
    pub match_format: FormatPayload,
    pub status: MatchStatus,
    #[serde(rename = "winnerId", default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    #[serde(rename = "player1Id", default, skip_serializing_if = "Option::is_none")]
    pub player1_id: Option<String>,
    #[serde(rename = "player2Id", default, skip_serializing_if = "Option::is_none")]
    pub player2_id: Option<String>,
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    /// Minutes per completed set.
    #[serde(rename = "setDurations", default)]
    pub set_durations: Vec<i64>,
    #[serde(
        rename = "retirementReason",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub retirement_reason: Option<RetirementReason>,
}

fn parse_call(call: &str) -> Option<u8> {
    match call {
        "0" => Some(0),
        "15" => Some(1),
        "30" => Some(2),
        "40" => Some(3),
        _ => None,
    }
}

/// Normalize point-call strings to raw counters. Anything unrecognized is
/// substituted with a zeroed game (the replay reconciliation repairs the
/// real value from the log).
fn parse_points(calls: &PointCalls) -> (u8, u8) {
    match (calls.player1.as_str(), calls.player2.as_str()) {
        ("Ad", other) if parse_call(other) == Some(3) => (4, 3),
        (other, "Ad") if parse_call(other) == Some(3) => (3, 4),
        (a, b) => match (parse_call(a), parse_call(b)) {
            (Some(p1), Some(p2)) => (p1, p2),
            _ => {
                tracing::warn!(player1 = %calls.player1, player2 = %calls.player2,
                    "unparseable point calls, substituting 0-0");
                (0, 0)
            }
        },
    }
}

fn normalize_score(payload: &ScorePayload) -> Score {
    Score {
        points: payload.points.as_ref().map(parse_points).unwrap_or((0, 0)),
        games: payload.games.map(|[p1, p2]| (p1, p2)).unwrap_or((0, 0)),
        sets: payload.sets.iter().map(SetScore::as_pair).collect(),
        is_tiebreak: payload.is_tiebreak,
        tiebreak_points: payload
            .tiebreak_points
            .map(|tb| (tb.player1, tb.player2))
            .unwrap_or((0, 0)),
        server: payload.server,
    }
}

/// Server of game 1, recovered from the current score: the game counter
/// parity tells how many times service has flipped.
fn derive_initial_server(score: &Score) -> Side {
    if score.game_number() % 2 == 1 {
        score.server
    } else {
        score.server.opponent()
    }
}

/// Parse a raw record document. The only way this fails is a document that
/// does not deserialize at all; individual malformed fragments inside a
/// well-formed document are recovered during `initialize_match`.
pub fn parse_record(json: &str) -> Result<MatchRecord> {
    serde_json::from_str(json)
        .map_err(|e| crate::error::EngineError::MalformedState(e.to_string()))
}

/// Hydrate a scoring session from a persisted record.
///
/// Corrupt point-log entries are dropped with a warning. The stored score is
/// taken as-is, then `reconcile` replays the log: on disagreement the
/// replayed score wins (logged, not raised).
pub fn initialize_match(record: &MatchRecord) -> Result<MatchController> {
    let format = MatchFormat::from(&record.match_format);
    let score = normalize_score(&record.score);

    let mut point_log: Vec<PointDetail> = Vec::with_capacity(record.point_log.len());
    for (index, raw) in record.point_log.iter().enumerate() {
        match serde_json::from_str::<PointDetail>(raw) {
            Ok(point) => point_log.push(point),
            Err(error) => {
                tracing::warn!(index, %error, "dropping corrupt point log entry");
            }
        }
    }

    let player1_id = record.player1_id.clone().unwrap_or_else(|| "p1".to_string());
    let player2_id = record.player2_id.clone().unwrap_or_else(|| "p2".to_string());
    let winner = record.winner_id.as_deref().and_then(|id| {
        if id == player1_id || id == "p1" {
            Some(Side::P1)
        } else if id == player2_id || id == "p2" {
            Some(Side::P2)
        } else {
            tracing::warn!(winner_id = id, "winner id matches neither player, ignoring");
            None
        }
    });

    // The first logged point carries the true game-1 server; fall back to
    // score parity when the log is empty.
    let initial_server = point_log
        .first()
        .filter(|p| p.game_number == 1)
        .map(|p| if p.is_tiebreak { derive_initial_server(&score) } else { p.server })
        .unwrap_or_else(|| derive_initial_server(&score));

    let tennis_match = TennisMatch {
        id: Uuid::new_v4(),
        player1_id,
        player2_id,
        format,
        initial_server,
        score,
        point_log,
        status: record.status,
        winner,
        start_time: record.start_time,
        end_time: record.end_time,
        set_durations_min: record.set_durations.clone(),
        retirement_reason: record.retirement_reason,
    };

    let mut controller = MatchController::new(tennis_match);
    controller.reconcile();
    Ok(controller)
}

/// Produce the persisted shape back from an aggregate (keyed set objects,
/// call strings for points).
pub fn to_record(m: &TennisMatch) -> MatchRecord {
    MatchRecord {
        score: ScorePayload {
            sets: m
                .score
                .sets
                .iter()
                .map(|&(p1, p2)| SetScore::Keyed { player1: p1, player2: p2 })
                .collect(),
            games: Some([m.score.games.0, m.score.games.1]),
            points: Some(PointCalls {
                player1: m.score.point_call(Side::P1),
                player2: m.score.point_call(Side::P2),
            }),
            is_tiebreak: m.score.is_tiebreak,
            tiebreak_points: m.score.is_tiebreak.then_some(TiebreakCounts {
                player1: m.score.tiebreak_points.0,
                player2: m.score.tiebreak_points.1,
            }),
            server: m.score.server,
        },
        point_log: m
            .point_log
            .iter()
            .map(|p| serde_json::to_string(p).unwrap_or_default())
            .collect(),
        match_format: FormatPayload::from(&m.format),
        status: m.status,
        winner_id: m.winner_id().map(str::to_string),
        player1_id: Some(m.player1_id.clone()),
        player2_id: Some(m.player2_id.clone()),
        start_time: m.start_time,
        end_time: m.end_time,
        set_durations: m.set_durations_min.clone(),
        retirement_reason: m.retirement_reason,
    }
}
