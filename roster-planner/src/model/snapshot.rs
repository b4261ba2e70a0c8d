use chrono::NaiveDate;
use tracing::warn;

use super::{AvailabilityMatrix, PriorityTable, Registry};
use crate::error::{PlanError, Result};

/// Immutable inputs of one planning run.
///
/// Each run owns its snapshot, so independent runs can proceed on
/// separate threads without sharing mutable state.
#[derive(Debug, Clone)]
pub struct PlanningInput {
    pub registry: Registry,
    pub availability: AvailabilityMatrix,
    pub priorities: PriorityTable,
}

impl PlanningInput {
    pub fn new(registry: Registry, availability: AvailabilityMatrix, priorities: PriorityTable) -> Self {
        PlanningInput { registry, availability, priorities }
    }

    /// Checks the snapshot and returns the planning horizon.
    pub fn horizon(&self) -> Result<Vec<NaiveDate>> {
        if self.registry.is_empty() {
            return Err(PlanError::EmptyRegistry);
        }
        let days = self.availability.horizon();
        if days.is_empty() {
            return Err(PlanError::EmptyHorizon);
        }
        let strangers: Vec<&str> = self
            .availability
            .person_ids()
            .into_iter()
            .filter(|id| !self.registry.contains(id))
            .collect();
        if !strangers.is_empty() {
            warn!(
                count = strangers.len(),
                first = strangers[0],
                "availability rows for persons missing from the registry are ignored"
            );
        }
        Ok(days)
    }
}
