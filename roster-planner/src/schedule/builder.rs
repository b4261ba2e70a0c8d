use chrono::NaiveDate;
use tracing::debug;

use super::types::Assignment;
use crate::config::PlannerConfig;
use crate::eligibility::EligibilityTable;
use crate::error::ConstraintMode;
use crate::lp::{Comparison, LinearExpr, LinearModel, VarId};
use crate::model::{PlanningInput, Role, Slot};

const HEADCOUNT_SLOTS: usize = Slot::HEADCOUNT.len();
const ROLES: usize = Role::ALL.len();

/// Consecutive-duty window of one person: days `start..start + K + 1`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Window {
    pub person: usize,
    pub start: usize,
    pub overage: VarId,
}

/// The roster as a linear model, plus the handles needed to read it back.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub lp: LinearModel,
    pub(super) days: Vec<NaiveDate>,
    pub(super) persons: usize,
    pub(super) mode: ConstraintMode,
    pub(super) max_consecutive: usize,
    headcount: Vec<VarId>,
    roles: Vec<VarId>,
    on_duty: Vec<VarId>,
    pub(super) duty_count: Vec<VarId>,
    pub(super) duty_max: VarId,
    pub(super) duty_min: VarId,
    pub(super) spread: VarId,
    pub(super) windows: Vec<Window>,
    headcount_shortage: Vec<Option<VarId>>,
    role_shortage: Vec<Option<VarId>>,
    headcount_required: [u32; HEADCOUNT_SLOTS],
    role_required: [u32; ROLES],
}

impl RosterModel {
    /// Lays out variables and constraints for one horizon.
    ///
    /// Unavailable or ineligible decisions are fixed to zero rather than
    /// omitted, so every requirement row spans the full registry.
    pub fn build(
        input: &PlanningInput,
        eligibility: &EligibilityTable,
        days: &[NaiveDate],
        config: &PlannerConfig,
    ) -> Self {
        let mut lp = LinearModel::new();
        let persons = input.registry.len();
        let n_days = days.len();
        let soft = config.soft_constraints;
        let horizon = n_days as f64;

        let headcount_required = Slot::HEADCOUNT.map(|s| config.required_headcount(s));
        let role_required = Role::ALL.map(|r| config.required_role(r));

        // Headcount seats: one binary per person, day and slot 1/2/4.
        // Seats the person did not sign up for are pinned to zero.
        let mut headcount = Vec::with_capacity(persons * n_days * HEADCOUNT_SLOTS);
        for person in input.registry.iter() {
            for &day in days {
                for slot in Slot::HEADCOUNT {
                    let var = lp.add_binary(format!("seat_{}_{}_{}", person.id, day, slot));
                    if !input.availability.is_available(&person.id, day, slot) {
                        lp.fix(var, 0.0);
                    }
                    headcount.push(var);
                }
            }
        }

        // Standby role seats: needs slot 3 availability and eligibility.
        let mut roles = Vec::with_capacity(persons * n_days * ROLES);
        for (p, person) in input.registry.iter().enumerate() {
            for &day in days {
                let on_standby = input.availability.is_available(&person.id, day, Slot::STANDBY);
                for role in Role::ALL {
                    let var = lp.add_binary(format!("role_{}_{}_{}", person.id, day, role));
                    if !on_standby || !eligibility.allows(p, role) {
                        lp.fix(var, 0.0);
                    }
                    roles.push(var);
                }
            }
        }

        // Workload envelope, filled in once the per-person counts exist
        let duty_max = lp.add_integer("duties_max", 0.0, horizon);
        let duty_min = lp.add_integer("duties_min", 0.0, horizon);
        let spread = lp.add_integer("spread", 0.0, horizon);

        let mut model = RosterModel {
            lp,
            days: days.to_vec(),
            persons,
            mode: config.mode(),
            max_consecutive: config.max_consecutive_standby_days as usize,
            headcount,
            roles,
            on_duty: Vec::with_capacity(persons * n_days),
            duty_count: Vec::with_capacity(persons),
            duty_max,
            duty_min,
            spread,
            windows: Vec::new(),
            headcount_shortage: Vec::with_capacity(n_days * HEADCOUNT_SLOTS),
            role_shortage: Vec::with_capacity(n_days * ROLES),
            headcount_required,
            role_required,
        };

        // Coverage: seats + shortage == required.
        // Hard mode has no shortage variable, so the row forces full cover.
        for (d, day) in days.iter().enumerate() {
            for (h, slot) in Slot::HEADCOUNT.into_iter().enumerate() {
                let required = headcount_required[h];
                let mut expr = LinearExpr::sum((0..persons).map(|p| model.headcount_var(p, d, slot)));
                // Shortage never exceeds what was asked for
                let shortage = soft.then(|| {
                    let var = model
                        .lp
                        .add_integer(format!("short_{}_s{}", day, slot), 0.0, required as f64);
                    expr.add_term(var, 1.0);
                    var
                });
                model.headcount_shortage.push(shortage);
                model
                    .lp
                    .add_constraint(format!("cover_{}_s{}", day, slot), expr, Comparison::Equal, required as f64);
            }
            for role in Role::ALL {
                let required = role_required[role.index()];
                let mut expr = LinearExpr::sum((0..persons).map(|p| model.role_var(p, d, role)));
                let shortage = soft.then(|| {
                    let var = model
                        .lp
                        .add_integer(format!("short_{}_{}", day, role), 0.0, required as f64);
                    expr.add_term(var, 1.0);
                    var
                });
                model.role_shortage.push(shortage);
                model
                    .lp
                    .add_constraint(format!("cover_{}_{}", day, role), expr, Comparison::Equal, required as f64);
            }
        }

        // Exclusivity: one role per person and day; on_duty mirrors it.
        for p in 0..persons {
            let person_id = &input.registry.persons()[p].id;
            for (d, day) in days.iter().enumerate() {
                let held = LinearExpr::sum(Role::ALL.map(|r| model.role_var(p, d, r)));
                model
                    .lp
                    .add_constraint(format!("one_role_{}_{}", person_id, day), held.clone(), Comparison::LessEq, 1.0);

                // duty == Σ roles, so it is 1 exactly when a role is held
                let duty = model.lp.add_binary(format!("duty_{}_{}", person_id, day));
                let mut link = held;
                link.add_term(duty, -1.0);
                model
                    .lp
                    .add_constraint(format!("duty_link_{}_{}", person_id, day), link, Comparison::Equal, 0.0);
                model.on_duty.push(duty);
            }
        }

        // Workload totals and their spread.
        // The envelopes only bound max/min from the right side; minimising
        // the spread pulls them tight.
        for p in 0..persons {
            let person_id = &input.registry.persons()[p].id;
            let count = model.lp.add_integer(format!("duties_{}", person_id), 0.0, horizon);
            let mut link = LinearExpr::sum((0..n_days).map(|d| model.on_duty_var(p, d)));
            link.add_term(count, -1.0);
            model
                .lp
                .add_constraint(format!("duties_link_{}", person_id), link, Comparison::Equal, 0.0);
            model.duty_count.push(count);
        }
        let counts = model.duty_count.clone();
        model.lp.add_upper_envelope("duties_max", model.duty_max, &counts);
        model.lp.add_lower_envelope("duties_min", model.duty_min, &counts);
        let spread_def = LinearExpr::new()
            .with_term(model.spread, 1.0)
            .with_term(model.duty_max, -1.0)
            .with_term(model.duty_min, 1.0);
        model.lp.add_constraint("spread_def", spread_def, Comparison::Equal, 0.0);

        // Rest: overage per sliding window of K + 1 days, overage >= duties - K.
        // A horizon shorter than one window has nothing to check.
        let k = model.max_consecutive;
        let width = k + 1;
        if n_days >= width {
            for p in 0..persons {
                let person_id = &input.registry.persons()[p].id;
                for start in 0..=(n_days - width) {
                    let overage = model
                        .lp
                        .add_integer(format!("over_{}_{}", person_id, start), 0.0, 1.0);
                    let mut expr = LinearExpr::new().with_term(overage, 1.0);
                    for d in start..start + width {
                        expr.add_term(model.on_duty_var(p, d), -1.0);
                    }
                    model.lp.add_constraint(
                        format!("rest_{}_{}", person_id, start),
                        expr,
                        Comparison::GreaterEq,
                        -(k as f64),
                    );
                    model.windows.push(Window { person: p, start, overage });
                }
            }
        }

        debug!(
            vars = model.lp.num_vars(),
            constraints = model.lp.num_constraints(),
            windows = model.windows.len(),
            "roster model built"
        );
        model
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn mode(&self) -> ConstraintMode {
        self.mode
    }

    pub fn headcount_var(&self, person: usize, day: usize, slot: Slot) -> VarId {
        let h = slot.headcount_index().unwrap_or(0);
        self.headcount[(person * self.days.len() + day) * HEADCOUNT_SLOTS + h]
    }

    pub fn role_var(&self, person: usize, day: usize, role: Role) -> VarId {
        self.roles[(person * self.days.len() + day) * ROLES + role.index()]
    }

    pub fn on_duty_var(&self, person: usize, day: usize) -> VarId {
        self.on_duty[person * self.days.len() + day]
    }

    pub fn headcount_shortage_var(&self, day: usize, slot: Slot) -> Option<VarId> {
        let h = slot.headcount_index()?;
        self.headcount_shortage[day * HEADCOUNT_SLOTS + h]
    }

    pub fn role_shortage_var(&self, day: usize, role: Role) -> Option<VarId> {
        self.role_shortage[day * ROLES + role.index()]
    }

    pub fn required_headcount(&self, slot: Slot) -> u32 {
        slot.headcount_index().map(|h| self.headcount_required[h]).unwrap_or(0)
    }

    pub fn required_role(&self, role: Role) -> u32 {
        self.role_required[role.index()]
    }

    /// Whether the decision can be 1 at all (not pinned to zero).
    pub fn is_open(&self, var: VarId) -> bool {
        !self.lp.var(var).is_fixed()
    }

    /// Reads a solved value vector back into decisions.
    pub fn decode(&self, values: &[f64]) -> Assignment {
        let set = |var: VarId| values[var.index()] > 0.5;
        let count = |var: VarId| values[var.index()].round().max(0.0) as u32;
        let mut assignment = Assignment::default();

        for p in 0..self.persons {
            for d in 0..self.days.len() {
                for slot in Slot::HEADCOUNT {
                    if set(self.headcount_var(p, d, slot)) {
                        assignment.headcount.insert((p, d, slot));
                    }
                }
                for role in Role::ALL {
                    if set(self.role_var(p, d, role)) {
                        assignment.roles.insert((p, d, role));
                    }
                }
            }
        }
        for d in 0..self.days.len() {
            for slot in Slot::HEADCOUNT {
                if let Some(var) = self.headcount_shortage_var(d, slot) {
                    let missing = count(var);
                    if missing > 0 {
                        assignment.headcount_shortage.insert((d, slot), missing);
                    }
                }
            }
            for role in Role::ALL {
                if let Some(var) = self.role_shortage_var(d, role) {
                    let missing = count(var);
                    if missing > 0 {
                        assignment.role_shortage.insert((d, role), missing);
                    }
                }
            }
        }
        assignment
    }

    /// Full value vector for an assignment built outside the solver.
    ///
    /// Shortages are recomputed from the filled seats; auxiliary
    /// workload variables take their tightest values.
    pub fn encode(&self, assignment: &Assignment) -> Vec<f64> {
        let mut values = vec![0.0; self.lp.num_vars()];
        let n_days = self.days.len();

        for &(p, d, slot) in &assignment.headcount {
            values[self.headcount_var(p, d, slot).index()] = 1.0;
        }
        for &(p, d, role) in &assignment.roles {
            values[self.role_var(p, d, role).index()] = 1.0;
        }
        for d in 0..n_days {
            for slot in Slot::HEADCOUNT {
                if let Some(var) = self.headcount_shortage_var(d, slot) {
                    let filled = assignment.filled_headcount(d, slot);
                    values[var.index()] = self.required_headcount(slot).saturating_sub(filled) as f64;
                }
            }
            for role in Role::ALL {
                if let Some(var) = self.role_shortage_var(d, role) {
                    let filled = assignment.filled_role(d, role);
                    values[var.index()] = self.required_role(role).saturating_sub(filled) as f64;
                }
            }
        }

        let mut counts = Vec::with_capacity(self.persons);
        for p in 0..self.persons {
            let mut count = 0u32;
            for d in 0..n_days {
                if assignment.on_duty(p, d) {
                    values[self.on_duty_var(p, d).index()] = 1.0;
                    count += 1;
                }
            }
            values[self.duty_count[p].index()] = count as f64;
            counts.push(count);
        }
        let max = counts.iter().copied().max().unwrap_or(0);
        let min = counts.iter().copied().min().unwrap_or(0);
        values[self.duty_max.index()] = max as f64;
        values[self.duty_min.index()] = min as f64;
        values[self.spread.index()] = (max - min) as f64;

        for window in &self.windows {
            let worked = (window.start..window.start + self.max_consecutive + 1)
                .filter(|&d| assignment.on_duty(window.person, d))
                .count();
            values[window.overage.index()] = worked.saturating_sub(self.max_consecutive) as f64;
        }
        values
    }
}
