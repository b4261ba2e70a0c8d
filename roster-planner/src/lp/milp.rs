//! `good_lp` adapter running the pure-Rust microlp branch-and-bound solver.

use std::time::{Duration, Instant};

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus,
    SolverModel, Variable, WithInitialSolution, WithTimeLimit,
};
use tracing::{debug, info, warn};

use super::backend::{SolveStatus, SolverBackend, SolverOptions, SolverOutput};
use super::model::{Comparison, LinearExpr, LinearModel, VarKind};
use crate::error::{PlanError, Result};

/// Longest limit handed to microlp, which converts it back from `f64` seconds.
const MAX_TIME_LIMIT: Duration = Duration::from_secs(365 * 24 * 3600);

/// Mixed-integer backend. The solve runs on the calling thread and
/// microlp stops itself when the budget runs out, keeping its best
/// incumbent. microlp is single-threaded, so the worker hint is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpBackend;

impl MilpBackend {
    pub fn new() -> Self {
        MilpBackend
    }
}

impl SolverBackend for MilpBackend {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, model: &LinearModel, options: &SolverOptions) -> Result<SolverOutput> {
        debug!(
            workers = options.workers,
            warm_start = options.warm_start.is_some(),
            "worker hint not used by microlp"
        );
        let started = Instant::now();
        let output = solve_within(model, options)?;
        if output.status == SolveStatus::Optimal {
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "microlp finished");
        } else {
            warn!(
                status = %output.status,
                budget = ?options.time_budget,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "microlp stopped at the time budget"
            );
        }
        Ok(output)
    }
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for &(var, coefficient) in &expr.terms {
        out.add_mul(coefficient, vars[var.index()]);
    }
    out
}

fn solve_within(model: &LinearModel, options: &SolverOptions) -> Result<SolverOutput> {
    let mut problem = ProblemVariables::new();
    let vars: Vec<Variable> = model
        .vars()
        .iter()
        .map(|def| {
            let definition = variable().min(def.lower).max(def.upper);
            match def.kind {
                VarKind::Binary | VarKind::Integer => problem.add(definition.integer()),
                VarKind::Continuous => problem.add(definition),
            }
        })
        .collect();

    let seconds = options.time_budget.min(MAX_TIME_LIMIT).as_secs_f64();
    let mut lp = problem
        .minimise(to_expression(model.objective(), &vars))
        .using(microlp)
        .with_time_limit(seconds);

    // microlp ignores a hint that breaks bounds or constraints.
    if let Some(values) = options.warm_start.as_deref().filter(|v| v.len() == vars.len()) {
        lp = lp.with_initial_solution(vars.iter().copied().zip(values.iter().copied()));
    }

    for c in model.constraints() {
        let lhs = to_expression(&c.expr, &vars);
        let rhs = Expression::from(c.rhs);
        lp = lp.with(match c.cmp {
            Comparison::LessEq => constraint!(lhs <= rhs),
            Comparison::GreaterEq => constraint!(lhs >= rhs),
            Comparison::Equal => constraint!(lhs == rhs),
        });
    }

    match lp.solve() {
        Ok(solution) => {
            let status = match solution.status() {
                SolutionStatus::Optimal => SolveStatus::Optimal,
                SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::Feasible,
            };
            let values = vars.iter().map(|v| solution.value(*v)).collect();
            Ok(SolverOutput::solved(status, values))
        }
        Err(ResolutionError::Infeasible) => Ok(SolverOutput::infeasible()),
        // Budget exhausted before any feasible point.
        Err(ResolutionError::Other(_)) => Ok(SolverOutput::unknown()),
        Err(other) => Err(PlanError::Solver(other.to_string())),
    }
}
