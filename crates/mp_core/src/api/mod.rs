pub mod json_api;

pub use json_api::{
    initialize_match, parse_record, to_record, FormatPayload, MatchRecord, PointCalls,
    ScorePayload, SetScore, TiebreakCounts,
};
