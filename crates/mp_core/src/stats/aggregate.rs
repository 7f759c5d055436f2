//! Cross-Match Aggregator.
//!
//! Combines per-match statistics bundles and outcomes across many matches
//! for one player. Raw counts are summed before any rate is derived;
//! averaging per-match percentages would bias toward small-sample matches.

use serde::{Deserialize, Serialize};

use crate::models::{Side, TennisMatch};

use super::match_stats::{compute_stats, PlayerStats};

/// Direction and length of a run of identical outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Streak {
    Wins(u32),
    Losses(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub player_id: String,
    /// Matches the player took part in (any status).
    pub matches_played: u32,
    /// Wins/losses over completed matches only.
    pub wins: u32,
    pub losses: u32,
    /// Raw counts summed across every match the player took part in.
    pub totals: PlayerStats,
    pub longest_win_streak: u32,
    pub longest_loss_streak: u32,
    /// The run the player is currently on, if any match has completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_streak: Option<Streak>,
}

impl AggregateStats {
    fn per_match(&self, count: u32) -> f32 {
        if self.matches_played == 0 {
            0.0
        } else {
            count as f32 / self.matches_played as f32
        }
    }

    pub fn aces_per_match(&self) -> f32 {
        self.per_match(self.totals.aces)
    }

    pub fn double_faults_per_match(&self) -> f32 {
        self.per_match(self.totals.double_faults)
    }

    pub fn win_pct(&self) -> f32 {
        let completed = self.wins + self.losses;
        if completed == 0 {
            0.0
        } else {
            self.wins as f32 / completed as f32 * 100.0
        }
    }
}

/// Combine statistics and outcomes for `player_id` across `matches`.
/// Matches the player did not take part in are ignored. Streaks consider
/// completed matches only, scanned in chronological order.
pub fn aggregate(matches: &[TennisMatch], player_id: &str) -> AggregateStats {
    let mut agg = AggregateStats {
        player_id: player_id.to_string(),
        ..AggregateStats::default()
    };

    // (sort time, won) per completed match.
    let mut outcomes: Vec<(chrono::DateTime<chrono::Utc>, bool)> = Vec::new();

    for m in matches {
        let Some(side) = m.side_of(player_id) else {
            continue;
        };
        agg.matches_played += 1;

        let stats = compute_stats(&m.point_log);
        agg.totals.merge(stats.side(side));

        if m.is_complete() {
            if let Some(winner) = m.winner {
                let won = winner == side;
                if won {
                    agg.wins += 1;
                } else {
                    agg.losses += 1;
                }
                outcomes.push((m.sort_time(), won));
            }
        }
    }

    outcomes.sort_by_key(|&(at, _)| at);

    let mut run: Option<(bool, u32)> = None;
    for &(_, won) in &outcomes {
        let (dir, len) = match run {
            Some((dir, len)) if dir == won => (dir, len + 1),
            _ => (won, 1),
        };
        if dir {
            agg.longest_win_streak = agg.longest_win_streak.max(len);
        } else {
            agg.longest_loss_streak = agg.longest_loss_streak.max(len);
        }
        run = Some((dir, len));
    }
    agg.current_streak = run.map(|(dir, len)| {
        if dir {
            Streak::Wins(len)
        } else {
            Streak::Losses(len)
        }
    });

    agg
}
