//! Immutable match format configuration.

use serde::{Deserialize, Serialize};

/// How a deciding set is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FinalSetTiebreak {
    /// The deciding set is played like any other set (tiebreak at 6-6 when
    /// tiebreaks are enabled).
    #[default]
    Standard,
    /// The deciding set is replaced by a single super tiebreak to
    /// `final_set_tiebreak_at` points.
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFormat {
    /// Best-of-N sets; N is odd.
    pub sets_to_play: u8,
    /// No-ad scoring: at deuce the next point wins the game.
    pub no_ad: bool,
    /// Play a tiebreak at 6-6; when false, sets run until a two-game lead.
    pub tiebreak_enabled: bool,
    pub final_set_tiebreak: FinalSetTiebreak,
    /// Target of the super tiebreak; only consulted when the match reaches a
    /// deciding set and `final_set_tiebreak` is `Super`.
    pub final_set_tiebreak_at: u16,
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self {
            sets_to_play: 3,
            no_ad: false,
            tiebreak_enabled: true,
            final_set_tiebreak: FinalSetTiebreak::Standard,
            final_set_tiebreak_at: 10,
        }
    }
}

impl MatchFormat {
    /// Sets required to win the match: `ceil(sets_to_play / 2)`.
    pub fn sets_to_win(&self) -> u8 {
        self.sets_to_play / 2 + 1
    }

    /// A set is the deciding set only when every earlier set has been
    /// played, i.e. the set counter reached `sets_to_play`.
    pub fn is_deciding_set(&self, set_number: u8) -> bool {
        set_number == self.sets_to_play
    }

    /// Whether the given set is played as a super tiebreak in place of a
    /// full set.
    pub fn is_super_tiebreak_set(&self, set_number: u8) -> bool {
        self.is_deciding_set(set_number) && self.final_set_tiebreak == FinalSetTiebreak::Super
    }

    /// Points needed to win the tiebreak of the given set (two-point lead
    /// always required on top).
    pub fn tiebreak_target(&self, set_number: u8) -> u16 {
        if self.is_super_tiebreak_set(set_number) {
            self.final_set_tiebreak_at
        } else {
            7
        }
    }
}
