use chrono::NaiveDate;

use super::types::{Assignment, Category, DutyCount, QualityReport, Roster, RosterRow, ShortagePenalties};
use crate::config::PlannerConfig;
use crate::lp::SolveStatus;
use crate::model::{PlanningInput, Role, Slot};

/// Turns index-space decisions into the ordered output table.
pub fn to_roster(input: &PlanningInput, days: &[NaiveDate], assignment: &Assignment) -> Roster {
    let persons = input.registry.persons();
    let mut rows = Vec::with_capacity(assignment.headcount.len() + assignment.roles.len());

    for &(p, d, slot) in &assignment.headcount {
        rows.push(RosterRow {
            day: days[d],
            slot,
            category: Category::Headcount,
            role: None,
            person_id: Some(persons[p].id.clone()),
            person_name: Some(persons[p].name.clone()),
            shortage_count: None,
        });
    }
    for &(p, d, role) in &assignment.roles {
        rows.push(RosterRow {
            day: days[d],
            slot: Slot::STANDBY,
            category: Category::Role,
            role: Some(role),
            person_id: Some(persons[p].id.clone()),
            person_name: Some(persons[p].name.clone()),
            shortage_count: None,
        });
    }
    for (&(d, slot), &missing) in &assignment.headcount_shortage {
        if missing > 0 {
            rows.push(shortage_row(days[d], slot, None, missing));
        }
    }
    for (&(d, role), &missing) in &assignment.role_shortage {
        if missing > 0 {
            rows.push(shortage_row(days[d], Slot::STANDBY, Some(role), missing));
        }
    }

    Roster::from_rows(rows)
}

fn shortage_row(day: NaiveDate, slot: Slot, role: Option<Role>, missing: u32) -> RosterRow {
    RosterRow {
        day,
        slot,
        category: Category::Shortage,
        role,
        person_id: None,
        person_name: None,
        shortage_count: Some(missing),
    }
}

/// Quality figures recomputed from the decisions themselves, so solver
/// and incumbent results are reported the same way.
pub fn quality_report(
    input: &PlanningInput,
    days: &[NaiveDate],
    config: &PlannerConfig,
    assignment: &Assignment,
    status: SolveStatus,
    objective: f64,
    penalties: ShortagePenalties,
) -> QualityReport {
    let persons = input.registry.persons();
    let n_days = days.len();

    let mut duty_counts: Vec<DutyCount> = persons
        .iter()
        .enumerate()
        .map(|(p, person)| DutyCount {
            person_id: person.id.clone(),
            person_name: person.name.clone(),
            standby_days: assignment.duty_count(p, n_days),
        })
        .collect();
    let max = duty_counts.iter().map(|c| c.standby_days).max().unwrap_or(0);
    let min = duty_counts.iter().map(|c| c.standby_days).min().unwrap_or(0);
    duty_counts.sort_by(|a, b| {
        b.standby_days
            .cmp(&a.standby_days)
            .then_with(|| a.person_name.cmp(&b.person_name))
    });

    let k = config.max_consecutive_standby_days as usize;
    let mut consecutive_overage = 0;
    if n_days > k {
        for p in 0..persons.len() {
            for start in 0..=(n_days - k - 1) {
                let worked = (start..=start + k).filter(|&d| assignment.on_duty(p, d)).count();
                consecutive_overage += worked.saturating_sub(k) as u32;
            }
        }
    }

    let priority_penalty = assignment
        .roles
        .iter()
        .map(|&(p, _, role)| {
            input
                .priorities
                .malus(persons[p].grade, role, config.default_priority_score)
        })
        .sum();
    let preference_bonus = assignment
        .headcount
        .iter()
        .map(|&(p, d, slot)| input.availability.preference(&persons[p].id, days[d], slot))
        .sum();

    QualityReport {
        status,
        optimal: status == SolveStatus::Optimal,
        objective,
        spread: max - min,
        duty_counts,
        consecutive_overage,
        priority_penalty,
        preference_bonus,
        headcount_shortage: assignment.headcount_shortage.values().sum(),
        role_shortage: assignment.role_shortage.values().sum(),
        penalties,
    }
}
