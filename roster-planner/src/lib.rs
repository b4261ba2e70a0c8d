//! Duty roster planning for volunteer fire stations.
//!
//! Personnel, availability and grade/role priorities go in; a
//! deterministic table of headcount seats, standby crew roles and
//! shortages comes out. The roster is solved as a mixed-integer model
//! behind the [`lp::SolverBackend`] seam.

pub mod config;
pub mod diagnostics;
pub mod display;
pub mod eligibility;
pub mod error;
pub mod export;
pub mod logging;
pub mod lp;
pub mod model;
pub mod parser;
pub mod sample;
pub mod schedule;

pub use config::PlannerConfig;
pub use error::{ConstraintMode, PlanError, Result};
pub use lp::{MilpBackend, SolveStatus, SolverBackend};
pub use model::PlanningInput;
pub use schedule::{PlanOutcome, Planner, Roster};
