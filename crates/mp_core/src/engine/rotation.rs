//! Server rotation rules.
//!
//! Game-level rotation is a simple parity alternation. Tiebreak service
//! order is a stricter, separate rule (one point for the opener, then two
//! points per side), so it gets its own function over the tiebreak point
//! index instead of reusing the game-level resolver.

use crate::models::{Score, Side};

/// Side serving the given game, 1-based and cumulative across the match.
/// Service alternates every game, including across set boundaries.
pub fn server_for_game(game_number: u32, initial_server: Side) -> Side {
    if game_number % 2 == 1 {
        initial_server
    } else {
        initial_server.opponent()
    }
}

/// Side serving the tiebreak point at `point_index` (0-based). The opener
/// serves one point, then service alternates every two points.
pub fn tiebreak_server(opener: Side, point_index: usize) -> Side {
    if ((point_index + 1) / 2) % 2 == 0 {
        opener
    } else {
        opener.opponent()
    }
}

/// Side serving the next point of the given score. Inside a tiebreak the
/// per-point rotation applies, relative to the side that opened it.
pub fn current_server(score: &Score) -> Side {
    if score.is_tiebreak {
        tiebreak_server(
            score.server,
            (score.tiebreak_points.0 + score.tiebreak_points.1) as usize,
        )
    } else {
        score.server
    }
}

/// Doubles rotation: teams alternate service games exactly as in singles,
/// and within a team the partners alternate on that team's successive
/// service games. Returns the serving side and the partner slot (0 or 1)
/// within that side.
pub fn doubles_server(game_number: u32, initial_server: Side) -> (Side, u8) {
    let side = server_for_game(game_number, initial_server);
    let slot = (((game_number.saturating_sub(1)) / 2) % 2) as u8;
    (side, slot)
}
