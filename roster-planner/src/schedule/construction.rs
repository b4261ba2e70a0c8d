use chrono::NaiveDate;
use tracing::debug;

use super::types::Assignment;
use crate::config::PlannerConfig;
use crate::eligibility::EligibilityTable;
use crate::model::{PlanningInput, Role, Slot};

/// Greedy day-by-day assignment used when the solver returns nothing.
///
/// Roles are staffed scarcest first; candidates are ranked by fewest
/// duties so far, lowest priority malus, then shortest running streak.
/// Headcount seats go to the highest preferences. Unfilled seats are
/// recorded as shortage, so the result always satisfies the soft model.
pub fn build_incumbent(
    input: &PlanningInput,
    eligibility: &EligibilityTable,
    days: &[NaiveDate],
    config: &PlannerConfig,
) -> Assignment {
    let persons = input.registry.persons();
    let mut assignment = Assignment::default();
    let mut duties = vec![0u32; persons.len()];
    let mut streak = vec![0u32; persons.len()];

    for (d, &day) in days.iter().enumerate() {
        let mut busy = vec![false; persons.len()];

        // Standby pool for the day
        let pool: Vec<usize> = persons
            .iter()
            .enumerate()
            .filter(|(_, person)| input.availability.is_available(&person.id, day, Slot::STANDBY))
            .map(|(p, _)| p)
            .collect();

        // Rank roles by how few candidates can hold them (scarcest first)
        let mut ranked_roles: Vec<(Role, usize)> = Role::ALL
            .into_iter()
            .filter(|&role| config.required_role(role) > 0)
            .map(|role| (role, pool.iter().filter(|&&p| eligibility.allows(p, role)).count()))
            .collect();
        ranked_roles.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        for (role, _supply) in ranked_roles {
            let required = config.required_role(role);
            // Free and eligible; one role per person per day
            let mut candidates: Vec<usize> = pool
                .iter()
                .copied()
                .filter(|&p| !busy[p] && eligibility.allows(p, role))
                .collect();
            candidates.sort_by_key(|&p| {
                let malus = input
                    .priorities
                    .malus(persons[p].grade, role, config.default_priority_score);
                (duties[p], malus, streak[p], p)
            });

            // Take the best ranked, the rest of the requirement becomes shortage
            let mut filled = 0;
            for p in candidates.into_iter().take(required as usize) {
                assignment.roles.insert((p, d, role));
                busy[p] = true;
                filled += 1;
            }
            if filled < required {
                assignment.role_shortage.insert((d, role), required - filled);
            }
        }

        // Carry workload and streaks into the next day
        for p in 0..persons.len() {
            if busy[p] {
                duties[p] += 1;
                streak[p] += 1;
            } else {
                streak[p] = 0;
            }
        }

        // Headcount seats ignore standby roles and each other
        for slot in Slot::HEADCOUNT {
            let required = config.required_headcount(slot);
            let mut candidates: Vec<(usize, f64)> = persons
                .iter()
                .enumerate()
                .filter(|(_, person)| input.availability.is_available(&person.id, day, slot))
                .map(|(p, person)| (p, input.availability.preference(&person.id, day, slot)))
                .collect();
            // Highest preference first, registry order on ties
            candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

            let mut filled = 0;
            for (p, _) in candidates.into_iter().take(required as usize) {
                assignment.headcount.insert((p, d, slot));
                filled += 1;
            }
            if filled < required {
                assignment.headcount_shortage.insert((d, slot), required - filled);
            }
        }
    }

    debug!(
        roles = assignment.roles.len(),
        seats = assignment.headcount.len(),
        "constructive incumbent built"
    );
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HeadcountRequirements, RoleRequirements};
    use crate::model::{AvailabilityEntry, AvailabilityMatrix, Grade, Person, PriorityTable, Qualification, Registry};
    use crate::schedule::builder::RosterModel;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn scenario() -> (PlanningInput, PlannerConfig) {
        let registry = Registry::new(vec![
            Person::new("a", "Ada", Grade::new(4).unwrap()).with_qualifications([Qualification::Inc]),
            Person::new("b", "Ben", Grade::new(3).unwrap()).with_qualifications([Qualification::Suap]),
            Person::new("c", "Cy", Grade::new(3).unwrap()),
        ])
        .unwrap();
        let mut availability = AvailabilityMatrix::new();
        for d in 1..=4 {
            for id in ["a", "b", "c"] {
                availability.insert(id, day(d), Slot::STANDBY, AvailabilityEntry::available(1.0)).unwrap();
            }
            availability
                .insert("a", day(d), Slot::new(2).unwrap(), AvailabilityEntry::available(0.5))
                .unwrap();
            availability
                .insert("c", day(d), Slot::new(2).unwrap(), AvailabilityEntry::available(3.0))
                .unwrap();
        }
        let mut roles = RoleRequirements::none();
        roles.set(Role::AmbulanceChief, 1);
        roles.set(Role::EngineChief, 1);
        roles.set(Role::AmbulanceCareEquipier, 2);
        let config = PlannerConfig {
            headcount: HeadcountRequirements { slot1: 0, slot2: 1, slot4: 0 },
            roles,
            ..PlannerConfig::default()
        };
        (PlanningInput::new(registry, availability, PriorityTable::new()), config)
    }

    #[test]
    fn incumbent_fits_the_soft_model() {
        let (input, config) = scenario();
        let days = input.horizon().unwrap();
        let eligibility = EligibilityTable::build(&input.registry);
        let assignment = build_incumbent(&input, &eligibility, &days, &config);

        let model = RosterModel::build(&input, &eligibility, &days, &config);
        let values = model.encode(&assignment);
        assert!(model.lp.check(&values, 1e-9).is_ok());
    }

    #[test]
    fn scarce_role_is_staffed_first_and_shortage_recorded() {
        let (input, config) = scenario();
        let days = input.horizon().unwrap();
        let eligibility = EligibilityTable::build(&input.registry);
        let assignment = build_incumbent(&input, &eligibility, &days, &config);

        for d in 0..days.len() {
            // Only Ada can be engine chief, so she never lands on the ambulance.
            assert!(assignment.roles.contains(&(0, d, Role::EngineChief)));
            // Ben is the only care equipier; one seat stays empty.
            assert!(assignment.roles.contains(&(1, d, Role::AmbulanceCareEquipier)));
            assert_eq!(assignment.role_shortage.get(&(d, Role::AmbulanceCareEquipier)), Some(&1));
            assert!(assignment.roles.contains(&(2, d, Role::AmbulanceChief)));
        }
    }

    #[test]
    fn headcount_prefers_the_strongest_preference() {
        let (input, config) = scenario();
        let days = input.horizon().unwrap();
        let eligibility = EligibilityTable::build(&input.registry);
        let assignment = build_incumbent(&input, &eligibility, &days, &config);

        let slot2 = Slot::new(2).unwrap();
        assert!(assignment.headcount.contains(&(2, 0, slot2)));
        assert!(!assignment.headcount.contains(&(0, 0, slot2)));
        assert!(assignment.headcount_shortage.is_empty());
    }
}
