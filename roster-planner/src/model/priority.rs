use std::collections::HashMap;

use super::{Grade, Role};

/// (grade, role) suitability scores; lower is better, 1 is ideal.
#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    scores: HashMap<(Grade, Role), i32>,
}

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, grade: Grade, role: Role, score: i32) {
        self.scores.insert((grade, role), score);
    }

    /// Score for the pair, or `default` when the table has none.
    pub fn score(&self, grade: Grade, role: Role, default: i32) -> i32 {
        self.scores.get(&(grade, role)).copied().unwrap_or(default)
    }

    /// Penalty units for placing `grade` in `role`: `max(0, score - 1)`.
    pub fn malus(&self, grade: Grade, role: Role, default: i32) -> u32 {
        (self.score(grade, role, default) - 1).max(0) as u32
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_pairs_use_the_default() {
        let mut table = PriorityTable::new();
        let sgt = Grade::new(3).unwrap();
        table.insert(sgt, Role::AmbulanceChief, 1);
        assert_eq!(table.malus(sgt, Role::AmbulanceChief, 3), 0);
        assert_eq!(table.malus(sgt, Role::EngineChief, 3), 2);
    }

    #[test]
    fn malus_never_goes_negative() {
        let mut table = PriorityTable::new();
        let grade = Grade::new(5).unwrap();
        table.insert(grade, Role::EngineDriver, -4);
        assert_eq!(table.malus(grade, Role::EngineDriver, 3), 0);
    }
}
