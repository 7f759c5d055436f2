//! Match Lifecycle Controller.
//!
//! Owns the single mutable `TennisMatch` aggregate for an active scoring
//! session. Every awarded point goes through the transition engine and
//! appends exactly one `PointDetail`; undo rebuilds the score by replaying
//! the remaining log from zero, never by inverse mutation, so the score is
//! always a pure function of the log. `award_point` and `undo` take
//! `&mut self`, which makes them mutually exclusive on the aggregate.
//!
//! The controller performs no I/O; persistence of the returned state is the
//! caller's responsibility and is not awaited here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{critical, rotation, transition};
use crate::engine::transition::GameEvent;
use crate::error::{EngineError, Result};
use crate::models::{
    CourtPosition, MatchFormat, MatchStatus, PointDetail, PointInput, RetirementReason, Score,
    Side, TennisMatch,
};

/// Everything a caller needs after awarding a point: the new authoritative
/// score, the appended log entry, and completion/timing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardResult {
    pub score: Score,
    pub point: PointDetail,
    pub event: GameEvent,
    pub is_match_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub set_durations_min: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoResult {
    pub score: Score,
    /// The entry removed from the log.
    pub removed: PointDetail,
    pub points_remaining: usize,
}

/// Drives one match from first point to completion.
pub struct MatchController {
    tennis_match: TennisMatch,
    /// Wall-clock start of every set begun so far, one entry per set; feeds
    /// `set_durations_min` and survives undo across a set boundary.
    set_starts: Vec<DateTime<Utc>>,
}

impl MatchController {
    /// Start scoring a brand-new match.
    pub fn start(
        player1_id: impl Into<String>,
        player2_id: impl Into<String>,
        format: MatchFormat,
        initial_server: Side,
    ) -> Self {
        Self::new(TennisMatch::new(player1_id, player2_id, format, initial_server))
    }

    /// Wrap an existing aggregate (e.g. one hydrated from a persisted
    /// record). Callers hydrating untrusted data should follow up with
    /// `reconcile`.
    pub fn new(tennis_match: TennisMatch) -> Self {
        Self { tennis_match, set_starts: Vec::new() }
    }

    pub fn match_state(&self) -> &TennisMatch {
        &self.tennis_match
    }

    pub fn into_match(self) -> TennisMatch {
        self.tennis_match
    }

    pub fn score(&self) -> &Score {
        &self.tennis_match.score
    }

    pub fn point_log(&self) -> &[PointDetail] {
        &self.tennis_match.point_log
    }

    /// Award a point using the current wall clock.
    pub fn award_point(&mut self, winner: Side, input: PointInput) -> Result<AwardResult> {
        self.award_point_at(winner, input, Utc::now())
    }

    /// Award a point at an explicit instant (injectable clock for tests and
    /// for replaying externally timestamped feeds).
    pub fn award_point_at(
        &mut self,
        winner: Side,
        input: PointInput,
        at: DateTime<Utc>,
    ) -> Result<AwardResult> {
        if self.tennis_match.is_complete() {
            return Err(EngineError::AlreadyComplete);
        }

        let format = self.tennis_match.format;
        let score = &self.tennis_match.score;
        let server = rotation::current_server(score);

        // Critical-point flags describe the situation the point was played
        // under, so they are derived before the transition is applied.
        let is_break_point = critical::break_point(score, &format).is_some();
        let is_set_point = critical::set_point(score, &format).is_some();
        let is_match_point = critical::match_point(score, &format).is_some();
        let court_position = if score.points_in_current_game() % 2 == 0 {
            CourtPosition::Deuce
        } else {
            CourtPosition::Ad
        };

        let mut point = PointDetail {
            winner,
            server,
            set_number: score.set_number(),
            game_number: score.game_number(),
            serve_type: input.serve_type,
            outcome: input.outcome,
            is_tiebreak: score.is_tiebreak,
            last_shot_type: input.last_shot_type,
            last_shot_player: input.last_shot_player,
            serve_placement: input.serve_placement,
            serve_speed_kmh: input.serve_speed_kmh,
            rally_length: input.rally_length,
            court_position,
            notes: input.notes,
            is_break_point,
            is_set_point,
            is_match_point,
            is_game_winning: false,
        };
        point.validate()?;

        let (new_score, event) = transition::apply_point(score, &format, winner);
        point.is_game_winning = event.ended_game();

        if self.tennis_match.point_log.is_empty() {
            self.tennis_match.start_time = Some(at);
        }
        if self.set_starts.is_empty() {
            self.set_starts.push(at);
        }
        match event {
            GameEvent::SetWon(_) | GameEvent::MatchWon(_) => {
                if let Some(&started) = self.set_starts.last() {
                    self.tennis_match
                        .set_durations_min
                        .push((at - started).num_minutes());
                }
                if matches!(event, GameEvent::SetWon(_)) {
                    self.set_starts.push(at);
                }
            }
            _ => {}
        }
        if let GameEvent::MatchWon(side) = event {
            self.tennis_match.status = MatchStatus::Completed;
            self.tennis_match.winner = Some(side);
            self.tennis_match.end_time = Some(at);
            log::debug!("match completed, winner {}", side);
        }

        self.tennis_match.score = new_score;
        self.tennis_match.point_log.push(point.clone());

        Ok(AwardResult {
            score: self.tennis_match.score.clone(),
            point,
            event,
            is_match_complete: self.tennis_match.is_complete(),
            winner: self.tennis_match.winner,
            start_time: self.tennis_match.start_time,
            end_time: self.tennis_match.end_time,
            set_durations_min: self.tennis_match.set_durations_min.clone(),
        })
    }

    /// Remove the last recorded point and rebuild the score by replaying the
    /// remaining log from zero. A match completed by natural progression is
    /// reopened when its clinching point is undone; a retired match stays
    /// closed (retirement is terminal).
    pub fn undo(&mut self) -> Result<UndoResult> {
        if self.tennis_match.retirement_reason.is_some() {
            return Err(EngineError::AlreadyComplete);
        }
        let removed = self
            .tennis_match
            .point_log
            .pop()
            .ok_or(EngineError::NothingToUndo)?;

        let (score, champion) = transition::replay(
            self.tennis_match.point_log.iter().map(|p| p.winner),
            &self.tennis_match.format,
            self.tennis_match.initial_server,
        );
        self.tennis_match.score = score;

        // Drop set durations and set starts for sets the replay no longer
        // contains; the start of the set now in progress is kept so a
        // re-awarded clincher measures from the set's first point.
        let sets_played = self.tennis_match.score.sets.len();
        while self.tennis_match.set_durations_min.len() > sets_played {
            self.tennis_match.set_durations_min.pop();
        }
        self.set_starts.truncate(sets_played + 1);
        if champion.is_none() && self.tennis_match.is_complete() {
            self.tennis_match.status = MatchStatus::InProgress;
            self.tennis_match.winner = None;
            self.tennis_match.end_time = None;
        }
        if self.tennis_match.point_log.is_empty() {
            self.tennis_match.start_time = None;
            self.set_starts.clear();
        }

        Ok(UndoResult {
            score: self.tennis_match.score.clone(),
            removed,
            points_remaining: self.tennis_match.point_log.len(),
        })
    }

    /// Force-complete the match (injury, weather, withdrawal) using the
    /// current wall clock.
    pub fn retire(&mut self, winner: Side, reason: RetirementReason) -> Result<()> {
        self.retire_at(winner, reason, Utc::now())
    }

    /// Force-complete at an explicit instant. Completed sets are preserved;
    /// when none exist yet a synthetic 1-0 set is recorded for the declared
    /// winner so every completed match carries a scoreline.
    pub fn retire_at(
        &mut self,
        winner: Side,
        reason: RetirementReason,
        at: DateTime<Utc>,
    ) -> Result<()> {
        if self.tennis_match.is_complete() {
            return Err(EngineError::AlreadyComplete);
        }
        if self.tennis_match.score.sets.is_empty() {
            let synthetic = match winner {
                Side::P1 => (1, 0),
                Side::P2 => (0, 1),
            };
            self.tennis_match.score.sets.push(synthetic);
        }
        self.tennis_match.status = MatchStatus::Completed;
        self.tennis_match.winner = Some(winner);
        self.tennis_match.retirement_reason = Some(reason);
        self.tennis_match.end_time = Some(at);
        log::debug!("match retired ({:?}), winner {}", reason, winner);
        Ok(())
    }

    /// Replay the full log and compare against the stored score. On
    /// disagreement the replayed value is authoritative: it replaces the
    /// stored score and the mismatch is logged, never raised. A completed
    /// status is only ever added (when the replay finds a champion), not
    /// removed, so retired matches stay closed. No-op on an empty log.
    pub fn reconcile(&mut self) {
        if self.tennis_match.point_log.is_empty() {
            return;
        }
        let (replayed, champion) = transition::replay(
            self.tennis_match.point_log.iter().map(|p| p.winner),
            &self.tennis_match.format,
            self.tennis_match.initial_server,
        );
        if replayed != self.tennis_match.score {
            log::warn!(
                "stored score {} disagrees with point-log replay {}; adopting replayed score",
                self.tennis_match.score,
                replayed
            );
            self.tennis_match.score = replayed;
        }
        if let Some(side) = champion {
            self.tennis_match.status = MatchStatus::Completed;
            self.tennis_match.winner = Some(side);
        }
    }
}
