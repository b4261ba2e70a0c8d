use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConstraintMode, PlanError, Result};
use crate::model::{Role, Slot};

/// Seats to fill on each headcount slot, every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadcountRequirements {
    pub slot1: u32,
    pub slot2: u32,
    pub slot4: u32,
}

impl Default for HeadcountRequirements {
    fn default() -> Self {
        HeadcountRequirements { slot1: 3, slot2: 8, slot4: 8 }
    }
}

impl HeadcountRequirements {
    /// Zero for the standby slot, which is staffed through roles.
    pub fn required(&self, slot: Slot) -> u32 {
        match slot.number() {
            1 => self.slot1,
            2 => self.slot2,
            4 => self.slot4,
            _ => 0,
        }
    }
}

/// Standby crew size per role, every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RoleRequirements {
    pub ambulance_chief: u32,
    pub ambulance_driver: u32,
    pub ambulance_care_equipier: u32,
    pub engine_chief: u32,
    pub engine_driver: u32,
    pub engine_fire_equipier: u32,
}

impl Default for RoleRequirements {
    fn default() -> Self {
        RoleRequirements {
            ambulance_chief: 2,
            ambulance_driver: 2,
            ambulance_care_equipier: 2,
            engine_chief: 1,
            engine_driver: 1,
            engine_fire_equipier: 1,
        }
    }
}

impl RoleRequirements {
    /// All roles set to zero; handy as a base for small scenarios.
    pub fn none() -> Self {
        RoleRequirements {
            ambulance_chief: 0,
            ambulance_driver: 0,
            ambulance_care_equipier: 0,
            engine_chief: 0,
            engine_driver: 0,
            engine_fire_equipier: 0,
        }
    }

    pub fn required(&self, role: Role) -> u32 {
        match role {
            Role::AmbulanceChief => self.ambulance_chief,
            Role::AmbulanceDriver => self.ambulance_driver,
            Role::AmbulanceCareEquipier => self.ambulance_care_equipier,
            Role::EngineChief => self.engine_chief,
            Role::EngineDriver => self.engine_driver,
            Role::EngineFireEquipier => self.engine_fire_equipier,
        }
    }

    pub fn set(&mut self, role: Role, count: u32) {
        let field = match role {
            Role::AmbulanceChief => &mut self.ambulance_chief,
            Role::AmbulanceDriver => &mut self.ambulance_driver,
            Role::AmbulanceCareEquipier => &mut self.ambulance_care_equipier,
            Role::EngineChief => &mut self.engine_chief,
            Role::EngineDriver => &mut self.engine_driver,
            Role::EngineFireEquipier => &mut self.engine_fire_equipier,
        };
        *field = count;
    }

    pub fn total(&self) -> u32 {
        Role::ALL.iter().map(|r| self.required(*r)).sum()
    }
}

/// Weights of the minimised objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub fairness: f64,
    pub rest: f64,
    pub priority: f64,
    pub preference: f64,
    pub headcount_shortage: f64,
    pub role_shortage: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        ObjectiveWeights {
            fairness: 10.0,
            rest: 8.0,
            priority: 5.0,
            preference: 1.0,
            headcount_shortage: 1000.0,
            role_shortage: 5000.0,
        }
    }
}

impl ObjectiveWeights {
    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("fairness", self.fairness),
            ("rest", self.rest),
            ("priority", self.priority),
            ("preference", self.preference),
            ("headcount_shortage", self.headcount_shortage),
            ("role_shortage", self.role_shortage),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Wall-clock budget for one solve.
    pub time_budget_secs: f64,
    /// Worker thread hint passed to the backend.
    pub workers: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings { time_budget_secs: 60.0, workers: 8 }
    }
}

impl SolverSettings {
    /// Saturates instead of panicking; [`PlannerConfig::validate`] rejects
    /// budgets that do not fit a [`Duration`].
    pub fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_budget_secs).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub headcount: HeadcountRequirements,
    pub roles: RoleRequirements,
    /// Allow shortage slack instead of failing on uncoverable demand.
    pub soft_constraints: bool,
    pub weights: ObjectiveWeights,
    pub max_consecutive_standby_days: u32,
    /// Score used for (grade, role) pairs missing from the priority table.
    pub default_priority_score: i32,
    pub solver: SolverSettings,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            headcount: HeadcountRequirements::default(),
            roles: RoleRequirements::default(),
            soft_constraints: true,
            weights: ObjectiveWeights::default(),
            max_consecutive_standby_days: 2,
            default_priority_score: 3,
            solver: SolverSettings::default(),
        }
    }
}

impl PlannerConfig {
    /// Reads a JSON file; absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.weights.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidConfig(format!(
                    "weight `{}` must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        let budget = self.solver.time_budget_secs;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "solver time budget must be positive, got {}",
                budget
            )));
        }
        if let Err(err) = Duration::try_from_secs_f64(budget) {
            return Err(PlanError::InvalidConfig(format!(
                "solver time budget of {} seconds is out of range: {}",
                budget, err
            )));
        }
        if self.solver.workers == 0 {
            return Err(PlanError::InvalidConfig("solver worker hint must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn mode(&self) -> ConstraintMode {
        if self.soft_constraints {
            ConstraintMode::Soft
        } else {
            ConstraintMode::Hard
        }
    }

    pub fn required_headcount(&self, slot: Slot) -> u32 {
        self.headcount.required(slot)
    }

    pub fn required_role(&self, role: Role) -> u32 {
        self.roles.required(role)
    }
}
