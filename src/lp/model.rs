//! Linear model: variables, constraints, objective.

use serde::{Deserialize, Serialize};

/// Handle to a variable in a [`LinearModel`] (its position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    /// Position of the variable in the model.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Integer in {0, 1}.
    Binary,
    /// Real-valued within `[lower, upper]`.
    Continuous,
}

/// A decision variable definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDef {
    /// Variable name (for debugging and export).
    pub name: String,
    /// Variable domain.
    pub kind: VarKind,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound (`None` = unbounded above).
    pub upper: Option<f64>,
}

/// Affine expression `Σ coef·var + constant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    /// `(variable, coefficient)` terms.
    pub terms: Vec<(VarId, f64)>,
    /// Constant offset.
    pub constant: f64,
}

impl LinearExpr {
    /// Creates an empty (zero) expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `coef · var`.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Whether the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression for a full assignment of variable values.
    ///
    /// Missing values count as 0.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    /// Whether the expression references `var`.
    pub fn references(&self, var: VarId) -> bool {
        self.terms.iter().any(|(v, _)| *v == var)
    }
}

/// Constraint relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
    /// `expr == rhs`
    Eq,
}

/// A linear constraint `expr (<=|>=|==) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Constraint name.
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Whether the constraint holds for `values`, within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tolerance,
            Sense::Ge => lhs >= self.rhs - tolerance,
            Sense::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A minimization mixed-integer linear program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Model name.
    pub name: String,
    variables: Vec<VarDef>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl LinearModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a binary variable.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push_var(VarDef {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: Some(1.0),
        })
    }

    /// Adds a continuous variable with lower bound `lower` and no upper bound.
    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64) -> VarId {
        self.push_var(VarDef {
            name: name.into(),
            kind: VarKind::Continuous,
            lower,
            upper: None,
        })
    }

    fn push_var(&mut self, def: VarDef) -> VarId {
        self.variables.push(def);
        VarId(self.variables.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        });
    }

    /// Sets the expression to minimize.
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Variable definitions, indexed by [`VarId`].
    pub fn variables(&self) -> &[VarDef] {
        &self.variables
    }

    /// Variable definition by handle.
    pub fn variable(&self, id: VarId) -> Option<&VarDef> {
        self.variables.get(id.0)
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Constraint by name.
    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Objective expression (minimized).
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Objective value for a full assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Validates model consistency.
    ///
    /// Checks that every referenced variable exists, bounds are ordered,
    /// and all coefficients are finite.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.variables.len();

        for v in &self.variables {
            if !v.lower.is_finite() {
                return Err(format!("Variable '{}' has non-finite lower bound", v.name));
            }
            if let Some(upper) = v.upper {
                if !upper.is_finite() || upper < v.lower {
                    return Err(format!("Variable '{}' has invalid upper bound", v.name));
                }
            }
        }

        let check_expr = |expr: &LinearExpr, owner: &str| -> Result<(), String> {
            if !expr.constant.is_finite() {
                return Err(format!("{owner} has non-finite constant"));
            }
            for (v, c) in &expr.terms {
                if v.0 >= n {
                    return Err(format!("{owner} references unknown variable #{}", v.0));
                }
                if !c.is_finite() {
                    return Err(format!("{owner} has non-finite coefficient"));
                }
            }
            Ok(())
        };

        for c in &self.constraints {
            check_expr(&c.expr, &format!("Constraint '{}'", c.name))?;
            if !c.rhs.is_finite() {
                return Err(format!("Constraint '{}' has non-finite rhs", c.name));
            }
        }
        check_expr(&self.objective, "Objective")?;

        Ok(())
    }

    /// Whether `values` satisfies every bound, integrality requirement,
    /// and constraint within `tolerance`.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }
        let bounds_ok = self.variables.iter().zip(values).all(|(def, &x)| {
            let in_range = x >= def.lower - tolerance
                && def.upper.map_or(true, |u| x <= u + tolerance);
            let integral = match def.kind {
                VarKind::Binary => (x - x.round()).abs() <= tolerance,
                VarKind::Continuous => true,
            };
            in_range && integral
        });
        bounds_ok
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }
}
