pub mod aggregate;
pub mod match_stats;

pub use aggregate::{aggregate, AggregateStats, Streak};
pub use match_stats::{compute_stats, MatchStats, PlayerStats};
