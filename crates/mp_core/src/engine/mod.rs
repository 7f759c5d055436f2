pub mod controller;
pub mod critical;
pub mod rotation;
pub mod transition;

pub use controller::{AwardResult, MatchController, UndoResult};
pub use transition::{apply_point, initial_score, replay, GameEvent};
