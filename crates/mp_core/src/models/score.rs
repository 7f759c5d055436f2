//! The canonical in-progress match score.

use serde::{Deserialize, Serialize};

use super::point::Side;

/// Current match state. Point counters are raw counts: 0-3 map onto the
/// traditional 0/15/30/40 calls; both counters >= 3 and equal is deuce, a
/// one-point lead past 3 is advantage. Counters are folded back to 3-3 after
/// a lost advantage so they stay bounded through long deuce battles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Points in the current game, `(p1, p2)`.
    pub points: (u8, u8),
    /// Games in the current set.
    pub games: (u8, u8),
    /// Completed sets, insertion-ordered and append-only.
    pub sets: Vec<(u8, u8)>,
    /// True while a tiebreak game (or a super tiebreak set) is in progress.
    pub is_tiebreak: bool,
    pub tiebreak_points: (u16, u16),
    /// Server of the current game. During a tiebreak: the side that served
    /// the first tiebreak point (the per-point server comes from
    /// `engine::rotation::tiebreak_server`).
    pub server: Side,
}

impl Score {
    pub fn new(initial_server: Side) -> Self {
        Self {
            points: (0, 0),
            games: (0, 0),
            sets: Vec::new(),
            is_tiebreak: false,
            tiebreak_points: (0, 0),
            server: initial_server,
        }
    }

    pub fn points_for(&self, side: Side) -> u8 {
        pair(self.points, side)
    }

    pub fn games_for(&self, side: Side) -> u8 {
        pair(self.games, side)
    }

    pub fn tiebreak_points_for(&self, side: Side) -> u16 {
        pair(self.tiebreak_points, side)
    }

    /// Number of completed sets won by `side`.
    pub fn sets_won(&self, side: Side) -> u8 {
        self.sets
            .iter()
            .filter(|&&set| pair(set, side) > pair(set, side.opponent()))
            .count() as u8
    }

    /// 1-based number of the set currently being played.
    pub fn set_number(&self) -> u8 {
        self.sets.len() as u8 + 1
    }

    /// 1-based number of the game currently being played, cumulative across
    /// the whole match. A completed tiebreak counts as one game.
    pub fn game_number(&self) -> u32 {
        let completed: u32 = self
            .sets
            .iter()
            .map(|&(a, b)| a as u32 + b as u32)
            .sum::<u32>()
            + self.games.0 as u32
            + self.games.1 as u32;
        completed + 1
    }

    /// Total points played in the current game (tiebreak points while a
    /// tiebreak is running). Drives court-position parity.
    pub fn points_in_current_game(&self) -> u32 {
        if self.is_tiebreak {
            self.tiebreak_points.0 as u32 + self.tiebreak_points.1 as u32
        } else {
            self.points.0 as u32 + self.points.1 as u32
        }
    }

    /// Traditional call for one side's game points: `0/15/30/40/Ad`. Deuce
    /// reads as `40` on both sides.
    pub fn point_call(&self, side: Side) -> String {
        const CALLS: [&str; 4] = ["0", "15", "30", "40"];
        let mine = self.points_for(side);
        let theirs = self.points_for(side.opponent());
        if mine >= 3 && theirs >= 3 && mine > theirs {
            "Ad".to_string()
        } else {
            CALLS[mine.min(3) as usize].to_string()
        }
    }
}

impl std::fmt::Display for Score {
    /// Completed sets, then current games, then the current game call,
    /// e.g. `6-4 3-2 40-Ad` or `6-6 TB 5-3`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for set in &self.sets {
            write!(f, "{}-{} ", set.0, set.1)?;
        }
        write!(f, "{}-{}", self.games.0, self.games.1)?;
        if self.is_tiebreak {
            write!(f, " TB {}-{}", self.tiebreak_points.0, self.tiebreak_points.1)?;
        } else if self.points != (0, 0) {
            write!(f, " {}-{}", self.point_call(Side::P1), self.point_call(Side::P2))?;
        }
        Ok(())
    }
}

pub(crate) fn pair<T: Copy>(pair: (T, T), side: Side) -> T {
    match side {
        Side::P1 => pair.0,
        Side::P2 => pair.1,
    }
}

pub(crate) fn pair_mut<T>(pair: &mut (T, T), side: Side) -> &mut T {
    match side {
        Side::P1 => &mut pair.0,
        Side::P2 => &mut pair.1,
    }
}
