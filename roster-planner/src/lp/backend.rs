use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::LinearModel;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Feasible but not proven optimal, e.g. cut short by the time budget.
    Feasible,
    Infeasible,
    /// Nothing usable: budget exhausted before any assignment was found.
    Unknown,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub time_budget: Duration,
    /// Thread count hint; backends may ignore it.
    pub workers: u32,
    /// Known feasible values, one per model variable, to start from.
    pub warm_start: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutput {
    pub status: SolveStatus,
    /// One value per model variable, present for `Optimal` and `Feasible`.
    pub values: Option<Vec<f64>>,
}

impl SolverOutput {
    pub fn solved(status: SolveStatus, values: Vec<f64>) -> Self {
        SolverOutput { status, values: Some(values) }
    }

    pub fn infeasible() -> Self {
        SolverOutput { status: SolveStatus::Infeasible, values: None }
    }

    pub fn unknown() -> Self {
        SolverOutput { status: SolveStatus::Unknown, values: None }
    }
}

/// A capability able to minimise a [`LinearModel`].
///
/// Implementations must treat the call as one blocking operation that
/// returns no later than (roughly) `options.time_budget` and leaves no
/// work running behind it.
pub trait SolverBackend {
    fn name(&self) -> &str;

    fn solve(&self, model: &LinearModel, options: &SolverOptions) -> Result<SolverOutput>;
}
