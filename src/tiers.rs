//! Tier Ladder
//!
//! Fixed, ordered ladder of 22 named tiers. The index is the only source of
//! ordering; names are display data.

use serde::Serialize;

use crate::progression::ProgressionError;

pub const TIER_COUNT: usize = 22;
pub const MAX_TIER_INDEX: usize = TIER_COUNT - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub name: &'static str,
    pub index: usize,
}

const fn tier(name: &'static str, index: usize) -> Tier {
    Tier { name, index }
}

pub static TIERS: [Tier; TIER_COUNT] = [
    tier("Dirt 1", 0),
    tier("Dirt 2", 1),
    tier("Dirt 3", 2),
    tier("Bronze 1", 3),
    tier("Bronze 2", 4),
    tier("Bronze 3", 5),
    tier("Silver 1", 6),
    tier("Silver 2", 7),
    tier("Silver 3", 8),
    tier("Platinum 1", 9),
    tier("Platinum 2", 10),
    tier("Platinum 3", 11),
    tier("Gold 1", 12),
    tier("Gold 2", 13),
    tier("Gold 3", 14),
    tier("Emerald 1", 15),
    tier("Emerald 2", 16),
    tier("Emerald 3", 17),
    tier("Diamond 1", 18),
    tier("Diamond 2", 19),
    tier("Diamond 3", 20),
    tier("Anti-matter", 21),
];

/// Look up a tier by index. Defined for 0..=21 only.
pub fn tier_at(index: usize) -> Result<Tier, ProgressionError> {
    TIERS
        .get(index)
        .copied()
        .ok_or(ProgressionError::TierIndexOutOfRange(index as i64))
}

impl Tier {
    pub fn is_top(&self) -> bool {
        self.index == MAX_TIER_INDEX
    }

    pub fn is_bottom(&self) -> bool {
        self.index == 0
    }

    /// Tier one step up, None at Anti-matter
    pub fn next(&self) -> Option<Tier> {
        TIERS.get(self.index + 1).copied()
    }

    /// Tier one step down, None at Dirt 1
    pub fn previous(&self) -> Option<Tier> {
        self.index.checked_sub(1).and_then(|i| TIERS.get(i).copied())
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
