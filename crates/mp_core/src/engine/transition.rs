//! Score Transition Engine.
//!
//! Pure functions from (score, format, point winner) to the next score plus
//! a completion event. All match progression flows through `apply_point`;
//! `replay` is the fold over a whole winner sequence used by undo and by
//! record hydration, which is what keeps the stored score a pure function
//! of the point log.

use serde::{Deserialize, Serialize};

use crate::models::score::{pair, pair_mut};
use crate::models::{MatchFormat, Score, Side};

/// What an applied point completed, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event", content = "side")]
pub enum GameEvent {
    PointOnly,
    GameWon(Side),
    SetWon(Side),
    MatchWon(Side),
}

impl GameEvent {
    /// True when the point ended a game, a set or the match.
    pub fn ended_game(&self) -> bool {
        !matches!(self, GameEvent::PointOnly)
    }
}

/// The score a match of this format starts from. A format whose first set
/// is already the deciding set under super mode (best-of-1) opens directly
/// in tiebreak mode.
pub fn initial_score(format: &MatchFormat, initial_server: Side) -> Score {
    let mut score = Score::new(initial_server);
    if format.is_super_tiebreak_set(1) {
        score.is_tiebreak = true;
    }
    score
}

/// Apply one point to the score. Pure: the input score is untouched.
pub fn apply_point(score: &Score, format: &MatchFormat, winner: Side) -> (Score, GameEvent) {
    let mut next = score.clone();
    let event = if next.is_tiebreak {
        apply_tiebreak_point(&mut next, format, winner)
    } else {
        apply_game_point(&mut next, format, winner)
    };
    (next, event)
}

fn apply_game_point(score: &mut Score, format: &MatchFormat, winner: Side) -> GameEvent {
    *pair_mut(&mut score.points, winner) += 1;

    let mine = pair(score.points, winner);
    let theirs = pair(score.points, winner.opponent());

    // Fold a lost advantage back to deuce so counters stay bounded.
    if mine == theirs && mine > 3 {
        score.points = (3, 3);
        return GameEvent::PointOnly;
    }

    let game_won = if format.no_ad {
        // Sudden death at deuce: the fourth point always takes the game.
        mine >= 4
    } else {
        mine >= 4 && mine - theirs >= 2
    };
    if !game_won {
        return GameEvent::PointOnly;
    }

    score.points = (0, 0);
    *pair_mut(&mut score.games, winner) += 1;
    score.server = score.server.opponent();

    let games_mine = pair(score.games, winner);
    let games_theirs = pair(score.games, winner.opponent());

    if games_mine >= 6 && games_mine - games_theirs >= 2 {
        return seal_set(score, format, winner);
    }
    if games_mine == 6 && games_theirs == 6 && format.tiebreak_enabled {
        // 6-6: enter the tiebreak, the set is not sealed yet. With
        // tiebreaks disabled play simply continues until a two-game lead.
        score.is_tiebreak = true;
        score.tiebreak_points = (0, 0);
    }
    GameEvent::GameWon(winner)
}

fn apply_tiebreak_point(score: &mut Score, format: &MatchFormat, winner: Side) -> GameEvent {
    *pair_mut(&mut score.tiebreak_points, winner) += 1;

    let target = format.tiebreak_target(score.set_number());
    let mine = pair(score.tiebreak_points, winner);
    let theirs = pair(score.tiebreak_points, winner.opponent());
    if mine < target || mine - theirs < 2 {
        return GameEvent::PointOnly;
    }

    // Tiebreak decided: it counts as one game for the winner (7-6 for a
    // 6-6 tiebreak, 1-0 for a super tiebreak standing in for a full set),
    // and the next set opens opposite the tiebreak opener.
    *pair_mut(&mut score.games, winner) += 1;
    score.server = score.server.opponent();
    score.is_tiebreak = false;
    score.tiebreak_points = (0, 0);
    seal_set(score, format, winner)
}

fn seal_set(score: &mut Score, format: &MatchFormat, winner: Side) -> GameEvent {
    score.sets.push(score.games);
    score.games = (0, 0);
    score.points = (0, 0);

    if score.sets_won(winner) >= format.sets_to_win() {
        return GameEvent::MatchWon(winner);
    }
    if format.is_super_tiebreak_set(score.set_number()) {
        score.is_tiebreak = true;
        score.tiebreak_points = (0, 0);
    }
    GameEvent::SetWon(winner)
}

/// Fold a winner sequence from the zero score. Returns the resulting score
/// and the match winner when the sequence completed the match; any points
/// past completion are ignored.
pub fn replay<I>(winners: I, format: &MatchFormat, initial_server: Side) -> (Score, Option<Side>)
where
    I: IntoIterator<Item = Side>,
{
    let mut score = initial_score(format, initial_server);
    let mut champion = None;
    for winner in winners {
        if champion.is_some() {
            break;
        }
        let (next, event) = apply_point(&score, format, winner);
        score = next;
        if let GameEvent::MatchWon(side) = event {
            champion = Some(side);
        }
    }
    (score, champion)
}
