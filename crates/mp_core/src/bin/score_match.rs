//! Inspect a persisted match record from the command line: hydrate it,
//! print the scoreline and the per-player statistics bundle.

use anyhow::{Context, Result};

use mp_core::{compute_stats, initialize_match, parse_record, MatchStatus, Side};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: score_match <match-record.json>")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading record from {path}"))?;

    let record = parse_record(&raw).context("parsing match record")?;
    let controller = initialize_match(&record).context("hydrating match")?;
    let m = controller.match_state();

    println!("match: {} vs {}", m.player1_id, m.player2_id);
    println!("score: {}", m.score);
    match m.status {
        MatchStatus::InProgress => println!("status: in progress"),
        MatchStatus::Completed => {
            println!(
                "status: completed, winner {}{}",
                m.winner_id().unwrap_or("?"),
                m.retirement_reason
                    .map(|r| format!(" (by retirement: {r:?})"))
                    .unwrap_or_default()
            );
        }
    }
    if !m.set_durations_min.is_empty() {
        println!("set durations (min): {:?}", m.set_durations_min);
    }

    let stats = compute_stats(&m.point_log);
    let p1 = stats.side(Side::P1);
    let p2 = stats.side(Side::P2);
    println!("\n{:<22}{:>12}{:>12}", "", m.player1_id, m.player2_id);
    println!("{:<22}{:>12}{:>12}", "points won", p1.points_won, p2.points_won);
    println!("{:<22}{:>12}{:>12}", "aces", p1.aces, p2.aces);
    println!("{:<22}{:>12}{:>12}", "double faults", p1.double_faults, p2.double_faults);
    println!("{:<22}{:>12}{:>12}", "winners", p1.winners, p2.winners);
    println!("{:<22}{:>12}{:>12}", "unforced errors", p1.unforced_errors, p2.unforced_errors);
    println!(
        "{:<22}{:>11.1}%{:>11.1}%",
        "first serve win",
        p1.first_serve_win_pct(),
        p2.first_serve_win_pct()
    );
    println!(
        "{:<22}{:>12}{:>12}",
        "break points",
        format!("{}/{}", p1.break_points_converted, p1.break_point_chances),
        format!("{}/{}", p2.break_points_converted, p2.break_point_chances)
    );
    println!(
        "{:<22}{:>12}{:>12}",
        "service holds",
        format!("{}/{}", p1.service_games_won, p1.service_games_played),
        format!("{}/{}", p2.service_games_won, p2.service_games_played)
    );

    Ok(())
}
