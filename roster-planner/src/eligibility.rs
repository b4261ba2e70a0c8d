//! Role eligibility derived from grade and qualification tags.

use std::collections::BTreeSet;

use crate::model::{Grade, Person, Qualification, Registry, Role};

/// Whether a person of `grade` holding `qualifications` may fill `role`.
pub fn is_eligible(role: Role, grade: Grade, qualifications: &BTreeSet<Qualification>) -> bool {
    let has = |tag: Qualification| qualifications.contains(&tag);
    match role {
        Role::AmbulanceChief => grade.rank() >= 3,
        Role::AmbulanceDriver => (has(Qualification::Cod0) || has(Qualification::Cod1)) && has(Qualification::B),
        Role::AmbulanceCareEquipier => has(Qualification::Suap),
        Role::EngineChief => grade.rank() >= 4 && has(Qualification::Inc),
        Role::EngineDriver => has(Qualification::Pl) && has(Qualification::Cod1),
        Role::EngineFireEquipier => has(Qualification::Inc),
    }
}

/// Eligibility flags of one person for every role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleEligibility([bool; 6]);

impl RoleEligibility {
    pub fn allows(&self, role: Role) -> bool {
        self.0[role.index()]
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(move |r| self.allows(*r))
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|e| *e)
    }
}

pub fn resolve(person: &Person) -> RoleEligibility {
    let mut flags = [false; 6];
    for role in Role::ALL {
        flags[role.index()] = is_eligible(role, person.grade, &person.qualifications);
    }
    RoleEligibility(flags)
}

/// Eligibility of every registry member, indexed like the registry.
#[derive(Debug, Clone)]
pub struct EligibilityTable {
    rows: Vec<RoleEligibility>,
}

impl EligibilityTable {
    pub fn build(registry: &Registry) -> Self {
        EligibilityTable {
            rows: registry.iter().map(resolve).collect(),
        }
    }

    pub fn for_person(&self, person: usize) -> RoleEligibility {
        self.rows[person]
    }

    pub fn allows(&self, person: usize, role: Role) -> bool {
        self.rows[person].allows(role)
    }

    pub fn eligible_count(&self, role: Role) -> usize {
        self.rows.iter().filter(|row| row.allows(role)).count()
    }
}
