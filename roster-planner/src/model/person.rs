use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Ordinal rank, 1 (sapper) to 6 (captain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: Grade = Grade(1);
    pub const MAX: Grade = Grade(6);

    pub fn new(rank: u8) -> Option<Grade> {
        (1..=6).contains(&rank).then_some(Grade(rank))
    }

    pub fn rank(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Grade::new(value).ok_or_else(|| format!("grade must be between 1 and 6, got {}", value))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> u8 {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Grade {
    type Err = String;

    /// Accepts a numeric rank or a rank abbreviation ("SGT", "ADJ", ...).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s
            .trim()
            .to_ascii_uppercase()
            .replace('-', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if let Ok(rank) = key.parse::<u8>() {
            return Grade::try_from(rank);
        }
        let rank = match key.as_str() {
            "SAP" | "1CL" | "2CL" | "SAPEUR" | "SAPEUR 1CL" | "SAPEUR 2CL" => 1,
            "CPL" | "CCH" | "CAPORAL" | "CAPORAL CHEF" => 2,
            "SGT" | "SCH" | "SERGENT" | "SERGENT CHEF" => 3,
            "ADJ" | "ADC" | "ADJUDANT" | "ADJUDANT CHEF" => 4,
            "LTN" | "LIEUTENANT" => 5,
            "CNE" | "CAPITAINE" => 6,
            _ => return Err(format!("unknown grade `{}`", s.trim())),
        };
        Ok(Grade(rank))
    }
}

/// Qualification tags recorded on a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Qualification {
    /// Emergency care.
    #[serde(rename = "SUAP")]
    Suap,
    /// Fire fighting.
    #[serde(rename = "INC")]
    Inc,
    /// Emergency driving, light vehicles.
    #[serde(rename = "COD0")]
    Cod0,
    /// Emergency driving, heavy vehicles.
    #[serde(rename = "COD1")]
    Cod1,
    /// Heavy goods licence.
    #[serde(rename = "PL")]
    Pl,
    /// Car licence.
    #[serde(rename = "B")]
    B,
}

impl Qualification {
    pub fn as_str(self) -> &'static str {
        match self {
            Qualification::Suap => "SUAP",
            Qualification::Inc => "INC",
            Qualification::Cod0 => "COD0",
            Qualification::Cod1 => "COD1",
            Qualification::Pl => "PL",
            Qualification::B => "B",
        }
    }
}

impl FromStr for Qualification {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUAP" => Ok(Qualification::Suap),
            "INC" => Ok(Qualification::Inc),
            "COD0" => Ok(Qualification::Cod0),
            "COD1" => Ok(Qualification::Cod1),
            "PL" => Ok(Qualification::Pl),
            "B" => Ok(Qualification::B),
            other => Err(format!("unknown qualification `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub grade: Grade,
    #[serde(default)]
    pub qualifications: BTreeSet<Qualification>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>, grade: Grade) -> Self {
        Person {
            id: id.into(),
            name: name.into(),
            grade,
            qualifications: BTreeSet::new(),
        }
    }

    pub fn with_qualifications<I>(mut self, qualifications: I) -> Self
    where
        I: IntoIterator<Item = Qualification>,
    {
        self.qualifications.extend(qualifications);
        self
    }

    pub fn has(&self, qualification: Qualification) -> bool {
        self.qualifications.contains(&qualification)
    }
}

/// Ordered, immutable snapshot of the personnel taking part in one run.
#[derive(Debug, Clone)]
pub struct Registry {
    persons: Vec<Person>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Fails on an empty list or a repeated identifier.
    pub fn new(persons: Vec<Person>) -> Result<Self> {
        if persons.is_empty() {
            return Err(PlanError::EmptyRegistry);
        }
        let mut index = HashMap::with_capacity(persons.len());
        for (i, person) in persons.iter().enumerate() {
            if index.insert(person.id.clone(), i).is_some() {
                return Err(PlanError::DuplicatePerson(person.id.clone()));
            }
        }
        Ok(Registry { persons, index })
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.index.get(id).map(|&i| &self.persons[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_accepts_numbers_and_abbreviations() {
        assert_eq!("4".parse::<Grade>().map(Grade::rank), Ok(4));
        assert_eq!("sgt".parse::<Grade>().map(Grade::rank), Ok(3));
        assert_eq!("CNE".parse::<Grade>().map(Grade::rank), Ok(6));
        assert!("7".parse::<Grade>().is_err());
        assert!("general".parse::<Grade>().is_err());
    }

    #[test]
    fn grade_accepts_full_rank_names() {
        assert_eq!("Caporal-Chef".parse::<Grade>().map(Grade::rank), Ok(2));
        assert_eq!(" adjudant  chef ".parse::<Grade>().map(Grade::rank), Ok(4));
        assert_eq!("SAPEUR 1CL".parse::<Grade>().map(Grade::rank), Ok(1));
    }

    #[test]
    fn registry_rejects_empty_and_duplicates() {
        assert!(matches!(Registry::new(vec![]), Err(PlanError::EmptyRegistry)));

        let grade = Grade::new(2).unwrap();
        let dup = vec![Person::new("a", "Alice", grade), Person::new("a", "Again", grade)];
        match Registry::new(dup) {
            Err(PlanError::DuplicatePerson(id)) => assert_eq!(id, "a"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn registry_keeps_input_order() {
        let grade = Grade::new(1).unwrap();
        let registry = Registry::new(vec![
            Person::new("z", "Zoe", grade),
            Person::new("b", "Bob", grade),
        ])
        .unwrap();
        assert_eq!(registry.position("z"), Some(0));
        assert_eq!(registry.get("b").map(|p| p.name.as_str()), Some("Bob"));
        assert!(!registry.contains("c"));
    }
}
