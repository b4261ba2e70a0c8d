use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Slot;
use crate::error::{PlanError, Result};

/// What a person declared for one (day, slot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub available: bool,
    /// Non-negative bonus weight; only used on headcount slots.
    pub preference: f64,
}

impl AvailabilityEntry {
    pub fn available(preference: f64) -> Self {
        AvailabilityEntry { available: true, preference }
    }

    pub fn unavailable() -> Self {
        AvailabilityEntry { available: false, preference: 0.0 }
    }
}

/// Sparse (person, day, slot) -> availability map. Missing entries read as unavailable.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityMatrix {
    entries: HashMap<(String, NaiveDate, Slot), AvailabilityEntry>,
}

impl AvailabilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry, replacing any previous one for the same key.
    pub fn insert(
        &mut self,
        person_id: impl Into<String>,
        day: NaiveDate,
        slot: Slot,
        entry: AvailabilityEntry,
    ) -> Result<()> {
        let person_id = person_id.into();
        if !entry.preference.is_finite() || entry.preference < 0.0 {
            return Err(PlanError::MalformedAvailability {
                person_id,
                day,
                slot,
                reason: format!("preference must be a non-negative number, got {}", entry.preference),
            });
        }
        if person_id.trim().is_empty() {
            return Err(PlanError::MalformedAvailability {
                person_id,
                day,
                slot,
                reason: "empty person id".to_string(),
            });
        }
        self.entries.insert((person_id, day, slot), entry);
        Ok(())
    }

    pub fn get(&self, person_id: &str, day: NaiveDate, slot: Slot) -> Option<&AvailabilityEntry> {
        self.entries.get(&(person_id.to_string(), day, slot))
    }

    pub fn is_available(&self, person_id: &str, day: NaiveDate, slot: Slot) -> bool {
        self.get(person_id, day, slot).map(|e| e.available).unwrap_or(false)
    }

    /// Preference weight when available, zero otherwise.
    pub fn preference(&self, person_id: &str, day: NaiveDate, slot: Slot) -> f64 {
        match self.get(person_id, day, slot) {
            Some(entry) if entry.available => entry.preference,
            _ => 0.0,
        }
    }

    /// Sorted distinct days present in the matrix.
    pub fn horizon(&self) -> Vec<NaiveDate> {
        let days: BTreeSet<NaiveDate> = self.entries.keys().map(|(_, day, _)| *day).collect();
        days.into_iter().collect()
    }

    pub fn person_ids(&self) -> BTreeSet<&str> {
        self.entries.keys().map(|(id, _, _)| id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(String, NaiveDate, Slot), &AvailabilityEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
