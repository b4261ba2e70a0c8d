//! Reproducible synthetic station data for demos and load tests.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::Result;
use crate::model::{
    AvailabilityEntry, AvailabilityMatrix, Grade, Person, PlanningInput, PriorityTable, Qualification, Registry, Role,
    Slot,
};

/// Station size the grade distribution is calibrated on.
const REFERENCE_STATION: usize = 44;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleOptions {
    pub persons: usize,
    pub days: u32,
    pub start: NaiveDate,
    pub seed: u64,
}

impl Default for SampleOptions {
    fn default() -> Self {
        SampleOptions {
            persons: REFERENCE_STATION,
            days: 28,
            start: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or(NaiveDate::MIN),
            seed: 2026,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnMode {
    /// Independent draws per person.
    Drawn,
    AllYes,
    AllNo,
    /// Shuffled mix with at least two of each answer.
    Mixed,
}

/// Grade by position in the roll, scaled from a 44-strong station:
/// mostly sappers and corporals, a handful of officers.
fn grade_for(index: usize, persons: usize) -> Grade {
    let scaled = index * REFERENCE_STATION / persons.max(1);
    let rank = match scaled {
        0..=19 => 1,
        20..=29 => 2,
        30..=37 => 3,
        38..=41 => 4,
        42 => 5,
        _ => 6,
    };
    Grade::new(rank).unwrap_or(Grade::MIN)
}

fn qualifications_for(index: usize) -> Vec<Qualification> {
    let mut tags = Vec::new();
    if index % 3 == 0 {
        tags.push(Qualification::Suap);
    }
    if index % 2 == 0 {
        tags.push(Qualification::Inc);
    }
    if index % 5 == 0 {
        tags.push(Qualification::Cod0);
    }
    if index % 7 == 0 {
        tags.push(Qualification::Cod1);
    }
    if index % 4 == 0 {
        tags.push(Qualification::Pl);
    }
    if index % 2 == 1 {
        tags.push(Qualification::B);
    }
    tags
}

pub fn sample_registry(persons: usize) -> Result<Registry> {
    let roll = (0..persons)
        .map(|i| {
            Person::new(format!("P{:03}", i + 1), format!("POMPIER_{:02}", i + 1), grade_for(i, persons))
                .with_qualifications(qualifications_for(i))
        })
        .collect();
    Registry::new(roll)
}

/// Chiefs score best at their minimum rank; crew roles favour junior grades.
pub fn sample_priorities() -> PriorityTable {
    let mut table = PriorityTable::new();
    for rank in 1..=6u8 {
        let Some(grade) = Grade::new(rank) else { continue };
        for role in Role::ALL {
            let score = match role {
                Role::AmbulanceChief => rank.saturating_sub(2).max(1),
                Role::EngineChief => rank.saturating_sub(3).max(1),
                _ => rank.min(5),
            };
            table.insert(grade, role, score as i32);
        }
    }
    table
}

/// Builds a seeded snapshot: registry, availability over `days` days and
/// a priority table. The same options always yield the same snapshot.
pub fn generate(options: &SampleOptions) -> Result<PlanningInput> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let registry = sample_registry(options.persons)?;
    let n = registry.len();

    let mut columns = Vec::with_capacity(options.days as usize * Slot::ALL.len());
    for offset in 0..options.days {
        let day = options.start + Duration::days(offset as i64);
        for slot in Slot::ALL {
            columns.push((day, slot));
        }
    }

    // Override a few columns the way station planners do by hand.
    let mut modes = vec![ColumnMode::Drawn; columns.len()];
    let mut order: Vec<usize> = (0..columns.len()).collect();
    order.shuffle(&mut rng);
    let yes = rng.gen_range(3..=6);
    let no = rng.gen_range(3..=6);
    let mixed = rng.gen_range(5..=8);
    for (k, &column) in order.iter().enumerate() {
        modes[column] = if k < yes {
            ColumnMode::AllYes
        } else if k < yes + no {
            ColumnMode::AllNo
        } else if k < yes + no + mixed {
            ColumnMode::Mixed
        } else {
            break;
        };
    }

    let mut availability = AvailabilityMatrix::new();
    for (&(day, slot), &mode) in columns.iter().zip(&modes) {
        let answers: Vec<bool> = match mode {
            ColumnMode::AllYes => vec![true; n],
            ColumnMode::AllNo => vec![false; n],
            ColumnMode::Mixed => {
                let yes_count = if n >= 4 { rng.gen_range(2..=n - 2) } else { n / 2 };
                let mut answers: Vec<bool> = (0..n).map(|i| i < yes_count).collect();
                answers.shuffle(&mut rng);
                answers
            }
            ColumnMode::Drawn => {
                let p = if slot.is_standby() { 0.55 } else { 0.65 };
                (0..n).map(|_| rng.gen_bool(p)).collect()
            }
        };

        for (person, available) in registry.iter().zip(answers) {
            let entry = if !available {
                AvailabilityEntry::unavailable()
            } else if slot.is_headcount() && rng.gen_bool(0.2) {
                AvailabilityEntry::available(2.0)
            } else {
                AvailabilityEntry::available(1.0)
            };
            availability.insert(person.id.as_str(), day, slot, entry)?;
        }
    }

    info!(
        persons = n,
        days = options.days,
        seed = options.seed,
        entries = availability.len(),
        "sample station generated"
    );
    Ok(PlanningInput::new(registry, availability, sample_priorities()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::EligibilityTable;

    #[test]
    fn reference_station_has_the_calibrated_grades() {
        let registry = sample_registry(44).unwrap();
        let ranks: Vec<u8> = registry.iter().map(|p| p.grade.rank()).collect();
        assert_eq!(ranks.iter().filter(|&&r| r == 1).count(), 20);
        assert_eq!(ranks.iter().filter(|&&r| r == 3).count(), 8);
        assert_eq!(ranks[42], 5);
        assert_eq!(ranks[43], 6);

        let eligibility = EligibilityTable::build(&registry);
        for role in Role::ALL {
            assert!(eligibility.eligible_count(role) > 0, "{} has no candidate", role);
        }
    }

    #[test]
    fn same_seed_same_snapshot() {
        let options = SampleOptions { persons: 12, days: 5, ..SampleOptions::default() };
        let a = generate(&options).unwrap();
        let b = generate(&options).unwrap();
        assert_eq!(a.horizon().unwrap().len(), 5);
        assert_eq!(a.availability.len(), 12 * 5 * 4);
        for (key, entry) in a.availability.iter() {
            assert_eq!(b.availability.get(&key.0, key.1, key.2), Some(entry));
        }
    }

    #[test]
    fn empty_station_is_rejected() {
        let options = SampleOptions { persons: 0, ..SampleOptions::default() };
        assert!(generate(&options).is_err());
    }
}
