use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::diagnostics::FeasibilityReport;
use crate::schedule::{Category, PlanOutcome, QualityReport, Roster, RosterRow};

const TOP_WORKLOADS: usize = 20;
const PREVIEW_DAYS: usize = 7;

/// Formats a person as `Name (id)`.
pub fn format_person(row: &RosterRow) -> String {
    match (&row.person_name, &row.person_id) {
        (Some(name), Some(id)) => format!("{} ({})", name, id),
        (Some(name), None) => name.clone(),
        (None, Some(id)) => id.clone(),
        (None, None) => "[EMPTY]".to_string(),
    }
}

pub fn print_diagnostics(report: &FeasibilityReport) {
    println!("\n=== Feasibility Diagnostics ===");
    if report.is_clear() {
        println!("Every requirement has enough available people.");
        return;
    }
    println!("⚠️  Requirements short of supply ({}):", report.shortfalls.len());
    for s in &report.shortfalls {
        println!(
            "  - {} {}: {} available, {} required",
            s.day, s.requirement, s.available, s.required
        );
    }
}

pub fn print_quality(report: &QualityReport) {
    println!("\n=== Solve Summary ===");
    let marker = if report.optimal { "optimal" } else { "non-optimal" };
    println!("Status: {} ({})", report.status, marker);
    println!("Objective: {:.2}", report.objective);
    println!("Workload spread: {}", report.spread);
    println!("Consecutive-duty overage: {}", report.consecutive_overage);
    println!("Priority penalty: {}", report.priority_penalty);
    println!("Preference bonus: {:.2}", report.preference_bonus);
    println!(
        "Shortage: {} headcount, {} role",
        report.headcount_shortage, report.role_shortage
    );

    println!("\nStandby workload (top {}):", TOP_WORKLOADS);
    for count in report.duty_counts.iter().take(TOP_WORKLOADS) {
        println!("  {:<28} {:>3} day(s)", format!("{} ({})", count.person_name, count.person_id), count.standby_days);
    }
}

/// Day-by-day listing of the first few days of the roster.
pub fn print_preview(roster: &Roster) {
    let days: BTreeSet<NaiveDate> = roster.rows.iter().map(|r| r.day).collect();
    println!("\n=== Roster Preview (first {} days) ===", PREVIEW_DAYS);
    for day in days.into_iter().take(PREVIEW_DAYS) {
        println!("\n{}", day.format("%A %Y-%m-%d"));
        for row in roster.rows_on(day) {
            match row.category {
                Category::Headcount => println!("  Slot {} -> {}", row.slot, format_person(row)),
                Category::Role => println!(
                    "  Slot {} {} -> {}",
                    row.slot,
                    row.role.map(|r| r.as_str()).unwrap_or("-"),
                    format_person(row)
                ),
                Category::Shortage => {}
            }
        }
    }
}

pub fn print_shortages(roster: &Roster) {
    let shortages: Vec<&RosterRow> = roster
        .rows
        .iter()
        .filter(|r| r.category == Category::Shortage)
        .collect();
    println!("\n=== Shortages ===");
    if shortages.is_empty() {
        println!("None, every seat is filled.");
        return;
    }
    for row in shortages {
        println!(
            "  {} slot {} {}: {} missing",
            row.day,
            row.slot,
            row.role.map(|r| r.as_str()).unwrap_or("headcount"),
            row.shortage_count.unwrap_or(0)
        );
    }
}

/// Full console report of a planning run.
pub fn print_outcome(outcome: &PlanOutcome) {
    print_diagnostics(&outcome.diagnostics);
    print_quality(&outcome.report);
    print_preview(&outcome.roster);
    print_shortages(&outcome.roster);
}
