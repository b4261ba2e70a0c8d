use tracing::{debug, warn};

use super::builder::RosterModel;
use super::types::ShortagePenalties;
use crate::config::PlannerConfig;
use crate::error::ConstraintMode;
use crate::lp::LinearExpr;
use crate::model::{PlanningInput, Role, Slot};

/// Largest value the non-shortage terms can swing by on this model.
///
/// Spread is at most the horizon length, each window overage at most 1,
/// and a person holds at most one role per day.
pub fn quality_bound(model: &RosterModel, input: &PlanningInput, config: &PlannerConfig) -> f64 {
    let weights = &config.weights;
    let default_score = config.default_priority_score;
    let n_days = model.days().len();

    let mut worst_malus = 0.0;
    let mut preference_total = 0.0;
    for (p, person) in input.registry.iter().enumerate() {
        for (d, &day) in model.days().iter().enumerate() {
            worst_malus += Role::ALL
                .into_iter()
                .filter(|&role| model.is_open(model.role_var(p, d, role)))
                .map(|role| input.priorities.malus(person.grade, role, default_score))
                .max()
                .unwrap_or(0) as f64;
            for slot in Slot::HEADCOUNT {
                if model.is_open(model.headcount_var(p, d, slot)) {
                    preference_total += input.availability.preference(&person.id, day, slot);
                }
            }
        }
    }

    weights.fairness * n_days as f64
        + weights.rest * model.windows.len() as f64
        + weights.priority * worst_malus
        + weights.preference * preference_total
}

/// Scales both penalties by one factor so the smaller lands just above
/// `bound`, keeping the configured headcount:role ratio.
///
/// A zero penalty has no ratio to keep and is lifted on its own.
pub fn dominating_penalties(configured: ShortagePenalties, bound: f64) -> ShortagePenalties {
    let smallest = configured.headcount.min(configured.role);
    if smallest > bound {
        return configured;
    }
    let floor = bound.floor() + 1.0;
    let raised = if smallest > 0.0 {
        let factor = floor / smallest;
        ShortagePenalties {
            headcount: (configured.headcount * factor).max(floor),
            role: (configured.role * factor).max(floor),
        }
    } else {
        ShortagePenalties {
            headcount: configured.headcount.max(floor),
            role: configured.role.max(floor),
        }
    };
    warn!(
        configured_headcount = configured.headcount,
        configured_role = configured.role,
        headcount = raised.headcount,
        role = raised.role,
        bound,
        "shortage penalties do not dominate the quality terms, raising them"
    );
    raised
}

/// Writes the minimised objective into `model.lp` and returns the
/// shortage penalties it used.
///
/// In soft mode, penalties that could be outweighed by the quality terms
/// are raised above [`quality_bound`] through [`dominating_penalties`].
pub fn compose(model: &mut RosterModel, input: &PlanningInput, config: &PlannerConfig) -> ShortagePenalties {
    let weights = &config.weights;
    let default_score = config.default_priority_score;
    let bound = quality_bound(model, input, config);
    let configured = ShortagePenalties {
        headcount: weights.headcount_shortage,
        role: weights.role_shortage,
    };

    let penalties = match model.mode() {
        ConstraintMode::Soft => dominating_penalties(configured, bound),
        ConstraintMode::Hard => configured,
    };

    let mut objective = LinearExpr::new().with_term(model.spread, weights.fairness);
    for window in &model.windows {
        objective.add_term(window.overage, weights.rest);
    }

    for (p, person) in input.registry.iter().enumerate() {
        for (d, &day) in model.days().iter().enumerate() {
            for role in Role::ALL {
                let var = model.role_var(p, d, role);
                if model.is_open(var) {
                    let malus = input.priorities.malus(person.grade, role, default_score);
                    objective.add_term(var, weights.priority * malus as f64);
                }
            }
            for slot in Slot::HEADCOUNT {
                let var = model.headcount_var(p, d, slot);
                if model.is_open(var) {
                    let preference = input.availability.preference(&person.id, day, slot);
                    objective.add_term(var, -weights.preference * preference);
                }
            }
        }
    }

    for d in 0..model.days().len() {
        for slot in Slot::HEADCOUNT {
            if let Some(var) = model.headcount_shortage_var(d, slot) {
                objective.add_term(var, penalties.headcount);
            }
        }
        for role in Role::ALL {
            if let Some(var) = model.role_shortage_var(d, role) {
                objective.add_term(var, penalties.role);
            }
        }
    }

    debug!(terms = objective.terms.len(), bound, "objective composed");
    model.lp.set_objective(objective);
    penalties
}
