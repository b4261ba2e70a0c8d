//! Minimal linear-model layer the roster engine is written against.

pub mod backend;
pub mod milp;
pub mod model;

pub use backend::{SolveStatus, SolverBackend, SolverOptions, SolverOutput};
pub use milp::MilpBackend;
pub use model::{Comparison, LinearConstraint, LinearExpr, LinearModel, VarDef, VarId, VarKind, Violation};
