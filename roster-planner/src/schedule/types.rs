use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::lp::SolveStatus;
use crate::model::{Requirement, Role, Slot};

/// Solved decisions in registry/horizon index space.
///
/// Person and day fields are indexes into the registry and the sorted
/// horizon of the run that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// (person, day, headcount slot)
    pub headcount: BTreeSet<(usize, usize, Slot)>,
    /// (person, day, standby role)
    pub roles: BTreeSet<(usize, usize, Role)>,
    pub headcount_shortage: BTreeMap<(usize, Slot), u32>,
    pub role_shortage: BTreeMap<(usize, Role), u32>,
}

impl Assignment {
    /// Roles held by `person` on `day`; at most one in a valid assignment.
    pub fn roles_of(&self, person: usize, day: usize) -> impl Iterator<Item = Role> + '_ {
        self.roles
            .range((person, day, Role::ALL[0])..=(person, day, Role::ALL[5]))
            .map(|&(_, _, role)| role)
    }

    pub fn on_duty(&self, person: usize, day: usize) -> bool {
        self.roles_of(person, day).next().is_some()
    }

    /// Standby days worked by `person` over the horizon.
    pub fn duty_count(&self, person: usize, days: usize) -> u32 {
        (0..days).filter(|&d| self.on_duty(person, d)).count() as u32
    }

    pub fn filled_headcount(&self, day: usize, slot: Slot) -> u32 {
        self.headcount
            .iter()
            .filter(|&&(_, d, s)| d == day && s == slot)
            .count() as u32
    }

    pub fn filled_role(&self, day: usize, role: Role) -> u32 {
        self.roles
            .iter()
            .filter(|&&(_, d, r)| d == day && r == role)
            .count() as u32
    }
}

/// Kind of an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Headcount,
    Role,
    Shortage,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Headcount => "HEADCOUNT",
            Category::Role => "ROLE",
            Category::Shortage => "SHORTAGE",
        }
    }
}

/// One line of the assignment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    pub day: NaiveDate,
    pub slot: Slot,
    pub category: Category,
    pub role: Option<Role>,
    pub person_id: Option<String>,
    pub person_name: Option<String>,
    pub shortage_count: Option<u32>,
}

impl RosterRow {
    pub fn requirement(&self) -> Requirement {
        match self.role {
            Some(role) => Requirement::Role(role),
            None => Requirement::Headcount(self.slot),
        }
    }

    pub(crate) fn sort_key(&self) -> (NaiveDate, Slot, Category, Option<Role>, Option<&str>, Option<&str>) {
        (
            self.day,
            self.slot,
            self.category,
            self.role,
            self.person_name.as_deref(),
            self.person_id.as_deref(),
        )
    }
}

/// Ordered output table: day, slot, category, role, person name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub rows: Vec<RosterRow>,
}

impl Roster {
    pub fn from_rows(mut rows: Vec<RosterRow>) -> Self {
        rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Roster { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows_on(&self, day: NaiveDate) -> impl Iterator<Item = &RosterRow> {
        self.rows.iter().filter(move |r| r.day == day)
    }

    /// Seats filled by a person for the requirement on that day.
    pub fn filled(&self, day: NaiveDate, requirement: Requirement) -> u32 {
        self.rows_on(day)
            .filter(|r| r.category != Category::Shortage && r.requirement() == requirement)
            .count() as u32
    }

    pub fn shortage(&self, day: NaiveDate, requirement: Requirement) -> u32 {
        self.rows_on(day)
            .filter(|r| r.category == Category::Shortage && r.requirement() == requirement)
            .filter_map(|r| r.shortage_count)
            .sum()
    }

    pub fn roles_of(&self, person_id: &str, day: NaiveDate) -> Vec<Role> {
        self.rows_on(day)
            .filter(|r| r.category == Category::Role && r.person_id.as_deref() == Some(person_id))
            .filter_map(|r| r.role)
            .collect()
    }

    pub fn total_shortage(&self) -> u32 {
        self.rows.iter().filter_map(|r| r.shortage_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyCount {
    pub person_id: String,
    pub person_name: String,
    pub standby_days: u32,
}

/// Shortage weights actually used in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShortagePenalties {
    pub headcount: f64,
    pub role: f64,
}

/// Quality figures of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub status: SolveStatus,
    pub optimal: bool,
    pub objective: f64,
    pub spread: u32,
    /// Sorted by descending standby days, then name.
    pub duty_counts: Vec<DutyCount>,
    pub consecutive_overage: u32,
    pub priority_penalty: u32,
    pub preference_bonus: f64,
    pub headcount_shortage: u32,
    pub role_shortage: u32,
    pub penalties: ShortagePenalties,
}

impl QualityReport {
    pub fn total_shortage(&self) -> u32 {
        self.headcount_shortage + self.role_shortage
    }
}
