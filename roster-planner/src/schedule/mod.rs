pub mod builder;
pub mod construction;
pub mod extract;
pub mod objective;
pub mod planner;
pub mod types;

pub use builder::RosterModel;
pub use construction::build_incumbent;
pub use extract::{quality_report, to_roster};
pub use objective::{compose, dominating_penalties, quality_bound};
pub use planner::{PlanOutcome, Planner};
pub use types::{Assignment, Category, DutyCount, QualityReport, Roster, RosterRow, ShortagePenalties};
