//! Critical-Point Detector.
//!
//! Derives break-point / set-point / match-point status from the current
//! score and format. All detectors describe the point *about to be played*;
//! the lifecycle controller calls them before applying a point and stores
//! the answers on the resulting `PointDetail`.

use crate::models::{MatchFormat, Score, Side};

/// Whether `side` is exactly one point from winning the current game.
fn is_game_point_for(score: &Score, format: &MatchFormat, side: Side) -> bool {
    let mine = score.points_for(side);
    let theirs = score.points_for(side.opponent());
    if format.no_ad {
        // The fourth point always wins, so 3 of anything is a game point.
        mine >= 3
    } else {
        mine >= 3 && mine > theirs
    }
}

/// Side one point from winning the current game, if any. Not defined inside
/// a tiebreak (use `set_point` there). Under no-ad rules both sides hold a
/// game point at deuce; the receiver is reported since that situation is
/// also a break point.
pub fn game_point(score: &Score, format: &MatchFormat) -> Option<Side> {
    if score.is_tiebreak {
        return None;
    }
    let receiver = score.server.opponent();
    if is_game_point_for(score, format, receiver) {
        return Some(receiver);
    }
    if is_game_point_for(score, format, score.server) {
        return Some(score.server);
    }
    None
}

/// The receiving side, when it is one point from taking the server's game.
pub fn break_point(score: &Score, format: &MatchFormat) -> Option<Side> {
    if score.is_tiebreak {
        return None;
    }
    let receiver = score.server.opponent();
    is_game_point_for(score, format, receiver).then_some(receiver)
}

fn wins_set_with_next_game(score: &Score, side: Side) -> bool {
    let mine = score.games_for(side) + 1;
    let theirs = score.games_for(side.opponent());
    mine >= 6 && mine - theirs >= 2
}

fn wins_tiebreak_with_next_point(score: &Score, format: &MatchFormat, side: Side) -> bool {
    let target = format.tiebreak_target(score.set_number());
    let mine = score.tiebreak_points_for(side) + 1;
    let theirs = score.tiebreak_points_for(side.opponent());
    mine >= target && mine >= theirs + 2
}

/// Side that would win the current set by winning the current game (or, in
/// a tiebreak, the current point), if any.
pub fn set_point(score: &Score, format: &MatchFormat) -> Option<Side> {
    if score.is_tiebreak {
        return Side::BOTH
            .into_iter()
            .find(|&side| wins_tiebreak_with_next_point(score, format, side));
    }
    Side::BOTH.into_iter().find(|&side| {
        is_game_point_for(score, format, side) && wins_set_with_next_game(score, side)
    })
}

/// `set_point`'s side, but only when taking that set also takes the match.
pub fn match_point(score: &Score, format: &MatchFormat) -> Option<Side> {
    let side = set_point(score, format)?;
    (score.sets_won(side) + 1 >= format.sets_to_win()).then_some(side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FinalSetTiebreak;

    fn fmt() -> MatchFormat {
        MatchFormat::default()
    }

    fn score_at(games: (u8, u8), points: (u8, u8), server: Side) -> Score {
        Score {
            games,
            points,
            server,
            ..Score::new(server)
        }
    }

    #[test]
    fn break_point_is_the_receiver_one_point_from_the_game() {
        // P1 serving at 30-40: break point for P2.
        let score = score_at((2, 2), (2, 3), Side::P1);
        assert_eq!(break_point(&score, &fmt()), Some(Side::P2));

        // 40-30: game point for the server, no break point.
        let score = score_at((2, 2), (3, 2), Side::P1);
        assert_eq!(break_point(&score, &fmt()), None);
        assert_eq!(game_point(&score, &fmt()), Some(Side::P1));

        // Deuce under advantage rules: nobody is one point away.
        let score = score_at((2, 2), (3, 3), Side::P1);
        assert_eq!(break_point(&score, &fmt()), None);
        assert_eq!(game_point(&score, &fmt()), None);

        // Ad-out: break point again.
        let score = score_at((2, 2), (3, 4), Side::P1);
        assert_eq!(break_point(&score, &fmt()), Some(Side::P2));
    }

    #[test]
    fn no_ad_deuce_is_a_break_point() {
        let format = MatchFormat { no_ad: true, ..fmt() };
        let score = score_at((1, 1), (3, 3), Side::P1);
        assert_eq!(break_point(&score, &format), Some(Side::P2));
        // The receiver is reported even though the server also holds game
        // point under sudden death.
        assert_eq!(game_point(&score, &format), Some(Side::P2));
    }

    #[test]
    fn set_point_requires_game_point_plus_set_on_the_line() {
        // 5-2, 40-15 serving: set point.
        let score = score_at((5, 2), (3, 1), Side::P1);
        assert_eq!(set_point(&score, &fmt()), Some(Side::P1));

        // 4-2, 40-15: game point but the game does not seal the set.
        let score = score_at((4, 2), (3, 1), Side::P1);
        assert_eq!(set_point(&score, &fmt()), None);

        // 5-5, 40-15: winning reaches only 6-5.
        let score = score_at((5, 5), (3, 1), Side::P1);
        assert_eq!(set_point(&score, &fmt()), None);

        // 6-5, 40-15: 7-5 seals it.
        let score = score_at((6, 5), (3, 1), Side::P1);
        assert_eq!(set_point(&score, &fmt()), Some(Side::P1));
    }

    #[test]
    fn set_point_inside_a_tiebreak() {
        let mut score = score_at((6, 6), (0, 0), Side::P1);
        score.is_tiebreak = true;

        score.tiebreak_points = (6, 3);
        assert_eq!(set_point(&score, &fmt()), Some(Side::P1));

        score.tiebreak_points = (6, 6);
        assert_eq!(set_point(&score, &fmt()), None);

        score.tiebreak_points = (6, 7);
        assert_eq!(set_point(&score, &fmt()), Some(Side::P2));
    }

    #[test]
    fn match_point_needs_the_set_to_clinch_the_match() {
        // First set at 5-2, 40-15: set point but not match point.
        let score = score_at((5, 2), (3, 1), Side::P1);
        assert_eq!(match_point(&score, &fmt()), None);

        // One set up, 5-2, 40-15: match point.
        let mut score = score_at((5, 2), (3, 1), Side::P1);
        score.sets = vec![(6, 4)];
        assert_eq!(match_point(&score, &fmt()), Some(Side::P1));

        // One set DOWN, 5-2, 40-15: still only a set point.
        let mut score = score_at((5, 2), (3, 1), Side::P1);
        score.sets = vec![(4, 6)];
        assert_eq!(match_point(&score, &fmt()), None);
    }

    #[test]
    fn super_tiebreak_match_point_uses_the_super_target() {
        let format = MatchFormat {
            final_set_tiebreak: FinalSetTiebreak::Super,
            final_set_tiebreak_at: 10,
            ..fmt()
        };
        let mut score = score_at((0, 0), (0, 0), Side::P1);
        score.sets = vec![(6, 4), (4, 6)];
        score.is_tiebreak = true;

        // 6-5 would end a regular tiebreak but not a super one.
        score.tiebreak_points = (6, 5);
        assert_eq!(set_point(&score, &format), None);

        score.tiebreak_points = (9, 5);
        assert_eq!(set_point(&score, &format), Some(Side::P1));
        assert_eq!(match_point(&score, &format), Some(Side::P1));
    }
}
