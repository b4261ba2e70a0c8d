use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four daily duty periods.
///
/// Slots 1, 2 and 4 are headcount slots (any available person counts);
/// slot 3 is the standby slot staffed through crew roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    pub const STANDBY: Slot = Slot(3);
    pub const HEADCOUNT: [Slot; 3] = [Slot(1), Slot(2), Slot(4)];
    pub const ALL: [Slot; 4] = [Slot(1), Slot(2), Slot(3), Slot(4)];

    pub fn new(number: u8) -> Option<Slot> {
        (1..=4).contains(&number).then_some(Slot(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_standby(self) -> bool {
        self == Slot::STANDBY
    }

    pub fn is_headcount(self) -> bool {
        !self.is_standby()
    }

    /// Position of a headcount slot inside `Slot::HEADCOUNT`.
    pub(crate) fn headcount_index(self) -> Option<usize> {
        Slot::HEADCOUNT.iter().position(|s| *s == self)
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Slot::new(value).ok_or_else(|| format!("slot must be between 1 and 4, got {}", value))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
