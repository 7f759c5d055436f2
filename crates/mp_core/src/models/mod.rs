pub mod format;
pub mod point;
pub mod score;
pub mod tennis_match;

pub use format::{FinalSetTiebreak, MatchFormat};
pub use point::{
    CourtPosition, PointDetail, PointInput, PointOutcome, ServePlacement, ServeType, ShotType,
    Side,
};
pub use score::Score;
pub use tennis_match::{MatchStatus, RetirementReason, TennisMatch};
