//! Supply-versus-demand checks run before the solver.
//!
//! A clear report guarantees nothing about role exclusivity: the same
//! person may be counted as supply for several roles on one day.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::eligibility::EligibilityTable;
use crate::model::{PlanningInput, Requirement, Role, Slot};

/// One requirement whose raw supply is below demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortfall {
    pub day: NaiveDate,
    pub requirement: Requirement,
    pub available: u32,
    pub required: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeasibilityReport {
    pub shortfalls: Vec<Shortfall>,
}

impl FeasibilityReport {
    pub fn is_clear(&self) -> bool {
        self.shortfalls.is_empty()
    }

    pub fn shortfalls_on(&self, day: NaiveDate) -> impl Iterator<Item = &Shortfall> {
        self.shortfalls.iter().filter(move |s| s.day == day)
    }

    pub fn log(&self) {
        if self.is_clear() {
            info!("staffing needs are covered by raw supply");
            return;
        }
        for s in &self.shortfalls {
            warn!(
                day = %s.day,
                requirement = %s.requirement,
                available = s.available,
                required = s.required,
                "supply below requirement"
            );
        }
        warn!(count = self.shortfalls.len(), "feasibility shortfalls detected");
    }
}

/// Persons available on `slot` that day.
pub fn count_available(input: &PlanningInput, day: NaiveDate, slot: Slot) -> u32 {
    input
        .registry
        .iter()
        .filter(|p| input.availability.is_available(&p.id, day, slot))
        .count() as u32
}

/// Persons both available on standby that day and eligible for `role`.
pub fn count_role_candidates(
    input: &PlanningInput,
    eligibility: &EligibilityTable,
    day: NaiveDate,
    role: Role,
) -> u32 {
    input
        .registry
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            eligibility.allows(*i, role) && input.availability.is_available(&p.id, day, Slot::STANDBY)
        })
        .count() as u32
}

/// Compares per-day supply with every non-zero requirement. Advisory only.
pub fn diagnose(
    input: &PlanningInput,
    eligibility: &EligibilityTable,
    days: &[NaiveDate],
    config: &PlannerConfig,
) -> FeasibilityReport {
    let mut shortfalls = Vec::new();

    for &day in days {
        for slot in Slot::HEADCOUNT {
            let required = config.required_headcount(slot);
            let available = count_available(input, day, slot);
            if available < required {
                shortfalls.push(Shortfall {
                    day,
                    requirement: Requirement::Headcount(slot),
                    available,
                    required,
                });
            }
        }
        for role in Role::ALL {
            let required = config.required_role(role);
            let available = count_role_candidates(input, eligibility, day, role);
            if available < required {
                shortfalls.push(Shortfall {
                    day,
                    requirement: Requirement::Role(role),
                    available,
                    required,
                });
            }
        }
    }

    FeasibilityReport { shortfalls }
}
