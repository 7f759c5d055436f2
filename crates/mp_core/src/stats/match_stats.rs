//! Match Statistics Engine.
//!
//! One linear pass over a point log produces a symmetric per-player bundle
//! of raw counts. Percentages are derived on demand and are always safe:
//! a zero denominator reports 0, never NaN.

use serde::{Deserialize, Serialize};

use crate::models::{PointDetail, PointOutcome, ServeType, Side};

/// Raw per-player counters for one match (or, summed, for many matches;
/// see `stats::aggregate`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub points_played: u32,
    pub points_won: u32,

    pub aces: u32,
    pub double_faults: u32,
    pub winners: u32,
    pub unforced_errors: u32,
    pub forced_errors: u32,

    pub first_serve_points_played: u32,
    pub first_serve_points_won: u32,
    pub second_serve_points_played: u32,
    pub second_serve_points_won: u32,

    pub return_points_played: u32,
    pub return_points_won: u32,

    /// Regular service games only; tiebreaks are excluded.
    pub service_games_played: u32,
    pub service_games_won: u32,

    /// Break points faced/saved while serving.
    pub break_points_faced: u32,
    pub break_points_saved: u32,
    /// Break point chances/conversions while returning.
    pub break_point_chances: u32,
    pub break_points_converted: u32,
}

fn pct(count: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32 * 100.0
    }
}

impl PlayerStats {
    pub fn serve_points_played(&self) -> u32 {
        self.first_serve_points_played + self.second_serve_points_played
    }

    pub fn serve_points_won(&self) -> u32 {
        self.first_serve_points_won + self.second_serve_points_won
    }

    pub fn first_serve_win_pct(&self) -> f32 {
        pct(self.first_serve_points_won, self.first_serve_points_played)
    }

    pub fn second_serve_win_pct(&self) -> f32 {
        pct(self.second_serve_points_won, self.second_serve_points_played)
    }

    pub fn serve_win_pct(&self) -> f32 {
        pct(self.serve_points_won(), self.serve_points_played())
    }

    pub fn return_win_pct(&self) -> f32 {
        pct(self.return_points_won, self.return_points_played)
    }

    pub fn points_won_pct(&self) -> f32 {
        pct(self.points_won, self.points_played)
    }

    pub fn break_point_save_pct(&self) -> f32 {
        pct(self.break_points_saved, self.break_points_faced)
    }

    pub fn break_point_conversion_pct(&self) -> f32 {
        pct(self.break_points_converted, self.break_point_chances)
    }

    pub fn service_hold_pct(&self) -> f32 {
        pct(self.service_games_won, self.service_games_played)
    }

    /// Field-wise sum, used by the cross-match aggregator so rates are
    /// always derived from summed raw counts.
    pub fn merge(&mut self, other: &PlayerStats) {
        self.points_played += other.points_played;
        self.points_won += other.points_won;
        self.aces += other.aces;
        self.double_faults += other.double_faults;
        self.winners += other.winners;
        self.unforced_errors += other.unforced_errors;
        self.forced_errors += other.forced_errors;
        self.first_serve_points_played += other.first_serve_points_played;
        self.first_serve_points_won += other.first_serve_points_won;
        self.second_serve_points_played += other.second_serve_points_played;
        self.second_serve_points_won += other.second_serve_points_won;
        self.return_points_played += other.return_points_played;
        self.return_points_won += other.return_points_won;
        self.service_games_played += other.service_games_played;
        self.service_games_won += other.service_games_won;
        self.break_points_faced += other.break_points_faced;
        self.break_points_saved += other.break_points_saved;
        self.break_point_chances += other.break_point_chances;
        self.break_points_converted += other.break_points_converted;
    }
}

/// Symmetric per-player statistics bundle for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub player1: PlayerStats,
    pub player2: PlayerStats,
}

impl MatchStats {
    pub fn side(&self, side: Side) -> &PlayerStats {
        match side {
            Side::P1 => &self.player1,
            Side::P2 => &self.player2,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut PlayerStats {
        match side {
            Side::P1 => &mut self.player1,
            Side::P2 => &mut self.player2,
        }
    }
}

/// Classify every point of the log in a single pass.
pub fn compute_stats(point_log: &[PointDetail]) -> MatchStats {
    let mut stats = MatchStats::default();

    for point in point_log {
        let server = point.server;
        let returner = server.opponent();
        let loser = point.winner.opponent();

        for side in Side::BOTH {
            stats.side_mut(side).points_played += 1;
        }
        stats.side_mut(point.winner).points_won += 1;

        // Serve and return buckets.
        {
            let sv = stats.side_mut(server);
            match point.serve_type {
                ServeType::First => {
                    sv.first_serve_points_played += 1;
                    if point.winner == server {
                        sv.first_serve_points_won += 1;
                    }
                }
                ServeType::Second => {
                    sv.second_serve_points_played += 1;
                    if point.winner == server {
                        sv.second_serve_points_won += 1;
                    }
                }
            }
        }
        {
            let rt = stats.side_mut(returner);
            rt.return_points_played += 1;
            if point.winner == returner {
                rt.return_points_won += 1;
            }
        }

        // Shot-making: winners and errors are credited to whoever hit the
        // last shot; when the log did not record it, the point result
        // determines the only side it can have been.
        match point.outcome {
            PointOutcome::Ace => stats.side_mut(server).aces += 1,
            PointOutcome::DoubleFault => stats.side_mut(server).double_faults += 1,
            PointOutcome::Winner => {
                let hitter = point.last_shot_player.unwrap_or(point.winner);
                stats.side_mut(hitter).winners += 1;
            }
            PointOutcome::UnforcedError => {
                let hitter = point.last_shot_player.unwrap_or(loser);
                stats.side_mut(hitter).unforced_errors += 1;
            }
            PointOutcome::ForcedError => {
                let hitter = point.last_shot_player.unwrap_or(loser);
                stats.side_mut(hitter).forced_errors += 1;
            }
        }

        // Break points, cross-checked against the server: the server either
        // saves the point or the returner converts it. Hydrated logs can
        // carry flags that disagree with a fresh derivation; classification
        // still follows the break-point flag, the mismatch is only logged.
        if point.is_break_point {
            stats.side_mut(server).break_points_faced += 1;
            stats.side_mut(returner).break_point_chances += 1;
            if point.winner == server {
                stats.side_mut(server).break_points_saved += 1;
            } else {
                if !point.is_game_winning {
                    log::warn!(
                        "break point converted but the point is not flagged game-winning"
                    );
                }
                stats.side_mut(returner).break_points_converted += 1;
            }
        }

        if point.is_game_winning && !point.is_tiebreak {
            let sv = stats.side_mut(server);
            sv.service_games_played += 1;
            if point.winner == server {
                sv.service_games_won += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MatchController;
    use crate::models::{CourtPosition, MatchFormat, PointInput, ShotType};

    fn input(serve_type: ServeType, outcome: PointOutcome) -> PointInput {
        PointInput::new(serve_type, outcome)
    }

    #[test]
    fn empty_log_yields_all_zero_rates_not_nan() {
        let stats = compute_stats(&[]);
        let p1 = stats.side(Side::P1);
        assert_eq!(p1.first_serve_win_pct(), 0.0);
        assert_eq!(p1.second_serve_win_pct(), 0.0);
        assert_eq!(p1.return_win_pct(), 0.0);
        assert_eq!(p1.break_point_save_pct(), 0.0);
        assert_eq!(p1.break_point_conversion_pct(), 0.0);
        assert_eq!(p1.points_won_pct(), 0.0);
    }

    #[test]
    fn ace_credits_server_serve_bucket_and_ace_count() {
        let mut ctl = MatchController::start("a", "b", MatchFormat::default(), Side::P1);
        ctl.award_point(Side::P1, input(ServeType::First, PointOutcome::Ace)).unwrap();
        ctl.award_point(Side::P1, input(ServeType::Second, PointOutcome::Ace)).unwrap();

        let stats = compute_stats(ctl.point_log());
        let p1 = stats.side(Side::P1);
        assert_eq!(p1.aces, 2);
        assert_eq!(p1.first_serve_points_played, 1);
        assert_eq!(p1.first_serve_points_won, 1);
        assert_eq!(p1.second_serve_points_played, 1);
        assert_eq!(p1.second_serve_points_won, 1);
        let p2 = stats.side(Side::P2);
        assert_eq!(p2.return_points_played, 2);
        assert_eq!(p2.return_points_won, 0);
    }

    #[test]
    fn double_fault_credits_returner_with_the_point() {
        let mut ctl = MatchController::start("a", "b", MatchFormat::default(), Side::P1);
        ctl.award_point(Side::P2, input(ServeType::Second, PointOutcome::DoubleFault))
            .unwrap();

        let stats = compute_stats(ctl.point_log());
        assert_eq!(stats.side(Side::P1).double_faults, 1);
        assert_eq!(stats.side(Side::P1).second_serve_points_won, 0);
        assert_eq!(stats.side(Side::P2).points_won, 1);
        assert_eq!(stats.side(Side::P2).return_points_won, 1);
    }

    #[test]
    fn winners_and_errors_follow_the_last_shot_player() {
        let mut ctl = MatchController::start("a", "b", MatchFormat::default(), Side::P1);

        let mut i = input(ServeType::First, PointOutcome::Winner);
        i.last_shot_player = Some(Side::P2);
        i.last_shot_type = Some(ShotType::Backhand);
        ctl.award_point(Side::P2, i).unwrap();

        let mut i = input(ServeType::First, PointOutcome::UnforcedError);
        i.last_shot_player = Some(Side::P1);
        ctl.award_point(Side::P2, i).unwrap();

        // No last-shot metadata: a forced error must fall back to the side
        // that lost the point.
        ctl.award_point(Side::P1, input(ServeType::First, PointOutcome::ForcedError))
            .unwrap();

        let stats = compute_stats(ctl.point_log());
        assert_eq!(stats.side(Side::P2).winners, 1);
        assert_eq!(stats.side(Side::P1).unforced_errors, 1);
        assert_eq!(stats.side(Side::P2).forced_errors, 1);
    }

    #[test]
    fn break_points_split_into_saved_and_converted() {
        let mut ctl = MatchController::start("a", "b", MatchFormat::default(), Side::P1);
        // P1 serving runs to 0-40, saves one break point, then is broken.
        for _ in 0..3 {
            ctl.award_point(Side::P2, input(ServeType::First, PointOutcome::Winner)).unwrap();
        }
        ctl.award_point(Side::P1, input(ServeType::First, PointOutcome::Ace)).unwrap();
        ctl.award_point(Side::P2, input(ServeType::First, PointOutcome::Winner)).unwrap();

        let stats = compute_stats(ctl.point_log());
        let p1 = stats.side(Side::P1);
        let p2 = stats.side(Side::P2);
        assert_eq!(p1.break_points_faced, 2);
        assert_eq!(p1.break_points_saved, 1);
        assert_eq!(p2.break_point_chances, 2);
        assert_eq!(p2.break_points_converted, 1);
        assert_eq!(p1.service_games_played, 1);
        assert_eq!(p1.service_games_won, 0);
    }

    #[test]
    fn contradictory_stored_flags_are_tolerated() {
        // A wire-sourced entry flagged break point but not game-winning:
        // the pass still classifies it, it does not panic.
        let point = PointDetail {
            winner: Side::P2,
            server: Side::P1,
            set_number: 1,
            game_number: 1,
            serve_type: ServeType::First,
            outcome: PointOutcome::Winner,
            is_tiebreak: false,
            last_shot_type: None,
            last_shot_player: None,
            serve_placement: None,
            serve_speed_kmh: None,
            rally_length: 0,
            court_position: CourtPosition::Deuce,
            notes: None,
            is_break_point: true,
            is_set_point: false,
            is_match_point: false,
            is_game_winning: false,
        };
        let stats = compute_stats(&[point]);
        assert_eq!(stats.side(Side::P1).break_points_faced, 1);
        assert_eq!(stats.side(Side::P2).break_points_converted, 1);
    }

    #[test]
    fn tiebreak_points_do_not_count_as_service_games() {
        let mut ctl = MatchController::start("a", "b", MatchFormat::default(), Side::P1);
        // Alternate games to 6-6, then P1 sweeps the tiebreak 7-0.
        for game in 0..12 {
            let winner = if game % 2 == 0 { Side::P1 } else { Side::P2 };
            loop {
                let r = ctl
                    .award_point(winner, input(ServeType::First, PointOutcome::Winner))
                    .unwrap();
                if r.event.ended_game() {
                    break;
                }
            }
        }
        for _ in 0..7 {
            ctl.award_point(Side::P1, input(ServeType::First, PointOutcome::Winner)).unwrap();
        }

        let stats = compute_stats(ctl.point_log());
        let total_service_games = stats.side(Side::P1).service_games_played
            + stats.side(Side::P2).service_games_played;
        assert_eq!(total_service_games, 12, "the tiebreak is not a service game");
    }
}
