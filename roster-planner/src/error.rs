use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::Slot;

/// Whether staffing requirements may be left partially uncovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintMode {
    Soft,
    Hard,
}

impl std::fmt::Display for ConstraintMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintMode::Soft => write!(f, "soft"),
            ConstraintMode::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("personnel registry is empty")]
    EmptyRegistry,

    #[error("duplicate person id `{0}` in registry")]
    DuplicatePerson(String),

    #[error("planning horizon is empty: availability matrix holds no days")]
    EmptyHorizon,

    #[error("malformed availability entry for `{person_id}` on {day} slot {slot}: {reason}")]
    MalformedAvailability {
        person_id: String,
        day: NaiveDate,
        slot: Slot,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("model is infeasible in {mode} mode ({days} days, {persons} persons)")]
    Infeasible {
        mode: ConstraintMode,
        days: usize,
        persons: usize,
    },

    #[error("no acceptable assignment found within {budget:?} in {mode} mode")]
    NoSolution {
        mode: ConstraintMode,
        budget: Duration,
    },

    #[error("solver backend failure: {0}")]
    Solver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
