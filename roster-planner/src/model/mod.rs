pub mod availability;
pub mod person;
pub mod priority;
pub mod role;
pub mod slot;
pub mod snapshot;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use availability::{AvailabilityEntry, AvailabilityMatrix};
pub use person::{Grade, Person, Qualification, Registry};
pub use priority::PriorityTable;
pub use role::Role;
pub use slot::Slot;
pub use snapshot::PlanningInput;

/// A staffing requirement key within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Headcount(Slot),
    Role(Role),
}

impl Requirement {
    pub fn slot(self) -> Slot {
        match self {
            Requirement::Headcount(slot) => slot,
            Requirement::Role(_) => Slot::STANDBY,
        }
    }

    pub fn role(self) -> Option<Role> {
        match self {
            Requirement::Headcount(_) => None,
            Requirement::Role(role) => Some(role),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Headcount(slot) => write!(f, "slot {}", slot),
            Requirement::Role(role) => write!(f, "slot {} role {}", Slot::STANDBY, role),
        }
    }
}
