//! # mp_core - Deterministic Tennis Match Scoring Engine
//!
//! This library converts a chronological sequence of point outcomes into
//! game/set/match state under the full rule set of tennis, and derives
//! per-player and cross-match statistics from the recorded point history.
//!
//! ## Features
//! - Traditional and no-ad scoring, standard and super tiebreaks,
//!   configurable best-of-N sets, retirement
//! - Append-only point log; undo rebuilds the score by pure replay,
//!   so the score is always a function of the log
//! - Single-pass statistics with zero-division-safe rates
//! - Cross-match aggregation from summed raw counts (never averaged
//!   percentages)
//! - JSON boundary for the external document store with lossy-input
//!   recovery

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod stats;

// Re-export the engine surface consumed by UI/persistence collaborators.
pub use api::{initialize_match, parse_record, to_record, MatchRecord};
pub use engine::{
    apply_point, initial_score, replay, AwardResult, GameEvent, MatchController, UndoResult,
};
pub use error::{EngineError, Result};

// Re-export the data model.
pub use models::{
    CourtPosition, FinalSetTiebreak, MatchFormat, MatchStatus, PointDetail, PointInput,
    PointOutcome, RetirementReason, Score, ServePlacement, ServeType, ShotType, Side, TennisMatch,
};

// Re-export the statistics engine.
pub use stats::{aggregate, compute_stats, AggregateStats, MatchStats, PlayerStats, Streak};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    fn rally(winner: Side) -> (Side, PointInput) {
        (winner, PointInput::new(ServeType::First, PointOutcome::Winner))
    }

    /// Drive a whole best-of-three match through the controller and check
    /// score, record shape and statistics line up end to end.
    #[test]
    fn test_full_match_end_to_end() {
        let mut ctl = MatchController::start("alice", "bob", MatchFormat::default(), Side::P1);

        // alice takes twelve straight games: 6-0 6-0.
        while !ctl.match_state().is_complete() {
            let (winner, input) = rally(Side::P1);
            ctl.award_point(winner, input).unwrap();
        }

        let m = ctl.match_state();
        assert_eq!(m.score.sets, vec![(6, 0), (6, 0)]);
        assert_eq!(m.winner, Some(Side::P1));
        assert_eq!(m.point_log.len(), 48);

        let stats = compute_stats(&m.point_log);
        assert_eq!(stats.side(Side::P1).points_won, 48);
        assert_eq!(stats.side(Side::P1).winners, 48);
        assert_eq!(stats.side(Side::P2).points_won, 0);

        let record = to_record(m);
        let hydrated = initialize_match(&record).unwrap();
        assert_eq!(hydrated.match_state().score, m.score);
        assert_eq!(hydrated.match_state().winner_id(), Some("alice"));
    }

    /// Replaying a recorded log from zero always reproduces the live score,
    /// whatever the sequence was.
    #[test]
    fn test_determinism_replay_equals_live_score() {
        let format = MatchFormat { no_ad: true, ..MatchFormat::default() };
        let mut ctl = MatchController::start("alice", "bob", format, Side::P2);

        // A deliberately scrappy sequence.
        let pattern = [Side::P1, Side::P1, Side::P2, Side::P1, Side::P2, Side::P2, Side::P2];
        for i in 0..311 {
            if ctl.match_state().is_complete() {
                break;
            }
            let (winner, input) = rally(pattern[i % pattern.len()]);
            ctl.award_point(winner, input).unwrap();
        }

        let (replayed, champion) = replay(
            ctl.point_log().iter().map(|p| p.winner),
            &format,
            Side::P2,
        );
        assert_eq!(&replayed, ctl.score());
        assert_eq!(champion, ctl.match_state().winner);
    }

    /// The dashboard path: many matches in, one aggregate out.
    #[test]
    fn test_aggregate_across_matches() {
        let mut matches = Vec::new();
        for (i, winner) in [Side::P1, Side::P1, Side::P2].into_iter().enumerate() {
            let played_at =
                chrono::DateTime::from_timestamp(1_700_000_000 + i as i64 * 86_400, 0).unwrap();
            let mut ctl =
                MatchController::start("alice", "bob", MatchFormat::default(), Side::P1);
            ctl.award_point_at(
                Side::P1,
                PointInput::new(ServeType::First, PointOutcome::Ace),
                played_at,
            )
            .unwrap();
            ctl.retire_at(winner, RetirementReason::Retired, played_at).unwrap();
            matches.push(ctl.into_match());
        }

        let agg = aggregate(&matches, "alice");
        assert_eq!(agg.matches_played, 3);
        assert_eq!(agg.wins, 2);
        assert_eq!(agg.losses, 1);
        assert_eq!(agg.totals.aces, 3);
        assert_eq!(agg.aces_per_match(), 1.0);
        assert_eq!(agg.current_streak, Some(Streak::Losses(1)));
    }
}
