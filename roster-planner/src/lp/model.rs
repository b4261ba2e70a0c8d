use std::fmt;

/// Handle of a variable inside a [`LinearModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Binary,
    Integer,
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
}

impl VarDef {
    pub fn is_fixed(&self) -> bool {
        self.lower == self.upper
    }
}

/// `constant + Σ coefficient * var`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        LinearExpr {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
    }

    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn add_scaled(&mut self, other: &LinearExpr, scale: f64) {
        if scale == 0.0 {
            return;
        }
        for &(var, c) in &other.terms {
            self.add_term(var, c * scale);
        }
        self.constant += other.constant * scale;
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.constant == 0.0
    }

    pub fn eval(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, c)| c * values[var.index()])
            .sum::<f64>()
            + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessEq,
    GreaterEq,
    Equal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Comparison::LessEq => "<=",
            Comparison::GreaterEq => ">=",
            Comparison::Equal => "==",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub cmp: Comparison,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn holds(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.eval(values);
        match self.cmp {
            Comparison::LessEq => lhs <= self.rhs + tolerance,
            Comparison::GreaterEq => lhs >= self.rhs - tolerance,
            Comparison::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// First violation found by [`LinearModel::check`].
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Shape { expected: usize, got: usize },
    Bounds { var: String, value: f64 },
    Integrality { var: String, value: f64 },
    Constraint { name: String, lhs: f64, cmp: Comparison, rhs: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Shape { expected, got } => write!(f, "expected {} values, got {}", expected, got),
            Violation::Bounds { var, value } => write!(f, "`{}` = {} is out of bounds", var, value),
            Violation::Integrality { var, value } => write!(f, "`{}` = {} is not integral", var, value),
            Violation::Constraint { name, lhs, cmp, rhs } => {
                write!(f, "constraint `{}` violated: {} {} {}", name, lhs, cmp, rhs)
            }
        }
    }
}

/// Solver-agnostic minimisation model: bounded variables, linear
/// constraints and a linear objective.
#[derive(Debug, Clone, Default)]
pub struct LinearModel {
    vars: Vec<VarDef>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl LinearModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_var(&mut self, name: String, kind: VarKind, lower: f64, upper: f64) -> VarId {
        self.vars.push(VarDef { name, kind, lower, upper });
        VarId(self.vars.len() - 1)
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push_var(name.into(), VarKind::Binary, 0.0, 1.0)
    }

    pub fn add_integer(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.push_var(name.into(), VarKind::Integer, lower, upper)
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.push_var(name.into(), VarKind::Continuous, lower, upper)
    }

    /// Pins a variable to a single value through its bounds.
    pub fn fix(&mut self, var: VarId, value: f64) {
        let def = &mut self.vars[var.index()];
        def.lower = value;
        def.upper = value;
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, expr: LinearExpr, cmp: Comparison, rhs: f64) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            expr,
            cmp,
            rhs,
        });
    }

    /// `target >= var` for every var. Together with a minimised
    /// `target` this yields the maximum.
    pub fn add_upper_envelope(&mut self, name: &str, target: VarId, vars: &[VarId]) {
        for (i, &var) in vars.iter().enumerate() {
            let expr = LinearExpr::new().with_term(target, 1.0).with_term(var, -1.0);
            self.add_constraint(format!("{}_{}", name, i), expr, Comparison::GreaterEq, 0.0);
        }
    }

    /// `target <= var` for every var; the mirror of [`Self::add_upper_envelope`].
    pub fn add_lower_envelope(&mut self, name: &str, target: VarId, vars: &[VarId]) {
        for (i, &var) in vars.iter().enumerate() {
            let expr = LinearExpr::new().with_term(target, 1.0).with_term(var, -1.0);
            self.add_constraint(format!("{}_{}", name, i), expr, Comparison::LessEq, 0.0);
        }
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn vars(&self) -> &[VarDef] {
        &self.vars
    }

    pub fn var(&self, id: VarId) -> &VarDef {
        &self.vars[id.index()]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of a full assignment.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.eval(values)
    }

    /// Verifies bounds, integrality and every constraint.
    pub fn check(&self, values: &[f64], tolerance: f64) -> Result<(), Violation> {
        if values.len() != self.vars.len() {
            return Err(Violation::Shape { expected: self.vars.len(), got: values.len() });
        }

        for (def, &value) in self.vars.iter().zip(values) {
            if value < def.lower - tolerance || value > def.upper + tolerance {
                return Err(Violation::Bounds { var: def.name.clone(), value });
            }
            if def.kind != VarKind::Continuous && (value - value.round()).abs() > tolerance {
                return Err(Violation::Integrality { var: def.name.clone(), value });
            }
        }
        for constraint in &self.constraints {
            if !constraint.holds(values, tolerance) {
                return Err(Violation::Constraint {
                    name: constraint.name.clone(),
                    lhs: constraint.expr.eval(values),
                    cmp: constraint.cmp,
                    rhs: constraint.rhs,
                });
            }
        }
        Ok(())
    }
}
