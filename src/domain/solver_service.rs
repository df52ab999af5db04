// Domain service interface for solving the production-plan integer model.
// Defines the contract that any MILP backend must follow, keeping backend
// crates out of the planning logic.

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Kind of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Integer,
    Binary,
}

/// One decision variable of the model. Variables are addressed by the index
/// returned from [`MipProblem::add_variable`].
#[derive(Debug, Clone)]
pub struct MipVariable {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

/// A sparse linear constraint: `Σ coeff·var  (≤ | = | ≥)  rhs`.
#[derive(Debug, Clone)]
pub struct MipConstraint {
    pub name: String,
    pub terms: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// A minimization MILP over sparse linear constraints.
#[derive(Debug, Clone, Default)]
pub struct MipProblem {
    pub name: String,
    pub variables: Vec<MipVariable>,
    pub constraints: Vec<MipConstraint>,
    /// Sparse objective, always minimized.
    pub objective: Vec<(usize, f64)>,
    /// Wall-clock budget for one solve, in seconds.
    pub time_limit: Option<f64>,
}

impl MipProblem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_variable(&mut self, variable: MipVariable) -> usize {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> usize {
        self.add_variable(MipVariable {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: Some(1.0),
        })
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: Option<f64>) -> usize {
        self.add_variable(MipVariable {
            name: name.into(),
            kind: VarKind::Continuous,
            lower,
            upper,
        })
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(usize, f64)>,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(MipConstraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| matches!(v.kind, VarKind::Integer | VarKind::Binary))
            .count()
    }
}

/// Outcome status of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    TimeLimit,
}

impl MipStatus {
    /// Whether the solve produced usable variable values.
    pub fn has_solution(&self) -> bool {
        matches!(self, MipStatus::Optimal | MipStatus::Feasible)
    }
}

/// Result of one solve: status plus, when feasible, one value per variable.
#[derive(Debug, Clone)]
pub struct MipSolution {
    pub status: MipStatus,
    pub objective_value: Option<f64>,
    pub values: Vec<f64>,
}

impl MipSolution {
    pub fn without_values(status: MipStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
        }
    }

    pub fn value(&self, var: usize) -> f64 {
        self.values.get(var).copied().unwrap_or(0.0)
    }
}

/// Domain service interface for MILP backends.
///
/// This trait defines the contract all solver implementations must follow,
/// so the planner never depends on a concrete solver crate.
pub trait MipSolver: Send + Sync + std::fmt::Debug {
    /// Solve a minimization problem.
    fn solve(&self, problem: &MipProblem) -> Result<MipSolution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &MipProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        if num_vars == 0 {
            errors.push("Model must have at least one variable".to_string());
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper {
                if var.lower > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower, upper
                    ));
                }
            }
        }

        for constraint in &problem.constraints {
            for &(var, _) in &constraint.terms {
                if var >= num_vars {
                    errors.push(format!(
                        "Constraint '{}' references unknown variable index {}",
                        constraint.name, var
                    ));
                }
            }
        }

        for &(var, _) in &problem.objective {
            if var >= num_vars {
                errors.push(format!("Objective references unknown variable index {}", var));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidModel(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
