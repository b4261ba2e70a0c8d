use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::builder::RosterModel;
use super::construction::build_incumbent;
use super::extract::{quality_report, to_roster};
use super::objective::compose;
use super::types::{QualityReport, Roster};
use crate::config::PlannerConfig;
use crate::diagnostics::{self, FeasibilityReport};
use crate::eligibility::EligibilityTable;
use crate::error::{PlanError, Result};
use crate::lp::{SolveStatus, SolverBackend, SolverOptions};
use crate::model::PlanningInput;

const CHECK_TOLERANCE: f64 = 1e-6;

/// Everything one planning run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub roster: Roster,
    pub diagnostics: FeasibilityReport,
    pub report: QualityReport,
}

/// Single-shot roster engine: build, solve, extract.
///
/// Holds no per-run state; each call to [`Planner::plan`] builds its own
/// model from the snapshot it is given.
#[derive(Debug, Clone)]
pub struct Planner<B> {
    config: PlannerConfig,
    backend: B,
}

impl<B: SolverBackend> Planner<B> {
    pub fn new(config: PlannerConfig, backend: B) -> Result<Self> {
        config.validate()?;
        Ok(Planner { config, backend })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Supply-versus-demand check without solving.
    pub fn diagnose(&self, input: &PlanningInput) -> Result<FeasibilityReport> {
        let days = input.horizon()?;
        let eligibility = EligibilityTable::build(&input.registry);
        Ok(diagnostics::diagnose(input, &eligibility, &days, &self.config))
    }

    pub fn plan(&self, input: &PlanningInput) -> Result<PlanOutcome> {
        let days = input.horizon()?;
        let eligibility = EligibilityTable::build(&input.registry);

        let report = diagnostics::diagnose(input, &eligibility, &days, &self.config);
        report.log();

        let mut model = RosterModel::build(input, &eligibility, &days, &self.config);
        let penalties = compose(&mut model, input, &self.config);

        // Greedy incumbent: warm start for the solver and fallback if it yields nothing.
        let incumbent = build_incumbent(input, &eligibility, &days, &self.config);
        let seeded = model.encode(&incumbent);
        let incumbent_check = model.lp.check(&seeded, CHECK_TOLERANCE);
        if let Err(violation) = &incumbent_check {
            debug!(%violation, mode = %model.mode(), "incumbent does not satisfy the model");
        }

        let options = SolverOptions {
            time_budget: self.config.solver.time_budget(),
            workers: self.config.solver.workers,
            warm_start: incumbent_check.is_ok().then_some(seeded),
        };
        info!(
            backend = self.backend.name(),
            mode = %model.mode(),
            days = days.len(),
            persons = input.registry.len(),
            vars = model.lp.num_vars(),
            constraints = model.lp.num_constraints(),
            "solving roster model"
        );
        let started = Instant::now();
        let output = self.backend.solve(&model.lp, &options)?;
        info!(
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "solver returned"
        );

        let (status, assignment) = match (output.status, output.values) {
            (SolveStatus::Infeasible, _) => {
                error!(
                    mode = %model.mode(),
                    days = days.len(),
                    persons = input.registry.len(),
                    "roster model is infeasible"
                );
                return Err(PlanError::Infeasible {
                    mode: model.mode(),
                    days: days.len(),
                    persons: input.registry.len(),
                });
            }
            (status @ (SolveStatus::Optimal | SolveStatus::Feasible), Some(values)) => {
                (status, model.decode(&values))
            }
            (status, _) => {
                warn!(%status, "no assignment from the solver, falling back to the constructive incumbent");
                if let Err(violation) = incumbent_check {
                    error!(%violation, mode = %model.mode(), "incumbent rejected by the model");
                    return Err(PlanError::NoSolution {
                        mode: model.mode(),
                        budget: options.time_budget,
                    });
                }
                (SolveStatus::Feasible, incumbent)
            }
        };

        let objective = model.lp.evaluate(&model.encode(&assignment));
        let roster = to_roster(input, &days, &assignment);
        let quality = quality_report(input, &days, &self.config, &assignment, status, objective, penalties);
        info!(
            %status,
            objective,
            spread = quality.spread,
            headcount_shortage = quality.headcount_shortage,
            role_shortage = quality.role_shortage,
            rows = roster.len(),
            "roster planned"
        );

        Ok(PlanOutcome {
            roster,
            diagnostics: report,
            report: quality,
        })
    }
}
