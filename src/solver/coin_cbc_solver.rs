// COIN-OR CBC adapter, going through good_lp's modelling layer.

use crate::domain::solver_service::{
    MipProblem, MipSolution, MipSolver, MipStatus, Result, Sense, SolverError, VarKind,
};
use good_lp::{
    solvers::coin_cbc::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolution, SolverModel, Variable as GoodLpVariable,
};

#[derive(Debug)]
pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MipSolver for CoinCbcSolver {
    fn solve(&self, problem: &MipProblem) -> Result<MipSolution> {
        self.validate(problem)?;

        let num_vars = problem.num_variables();
        let mut objective = vec![0.0; num_vars];
        for &(var, coeff) in &problem.objective {
            objective[var] += coeff;
        }

        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(num_vars);
        for def in &problem.variables {
            let upper = def.upper.unwrap_or(f64::INFINITY);
            let var = match def.kind {
                VarKind::Integer | VarKind::Binary => {
                    vars.add(variable().integer().min(def.lower).max(upper))
                }
                VarKind::Continuous => vars.add(variable().min(def.lower).max(upper)),
            };
            lp_variables.push(var);
        }

        let mut objective_expr: Expression = 0.into();
        for (i, &coeff) in objective.iter().enumerate() {
            if coeff != 0.0 {
                objective_expr += coeff * lp_variables[i];
            }
        }

        let mut model = vars.minimise(objective_expr).using(coin_cbc);
        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for &(var, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    lhs += coeff * lp_variables[var];
                }
            }
            model = match constraint.sense {
                Sense::LessOrEqual => model.with(lhs.leq(constraint.rhs)),
                Sense::Equal => model.with(lhs.eq(constraint.rhs)),
                Sense::GreaterOrEqual => model.with(lhs.geq(constraint.rhs)),
            };
        }

        model.set_parameter("log", "0");
        if let Some(limit) = problem.time_limit {
            model.set_parameter("seconds", &format!("{:.3}", limit.max(0.01)));
        }

        match model.solve() {
            Ok(solution) => {
                let values: Vec<f64> = lp_variables
                    .iter()
                    .map(|&var| solution.value(var))
                    .collect();
                let objective_value = objective
                    .iter()
                    .zip(&values)
                    .map(|(c, v)| c * v)
                    .sum::<f64>();
                Ok(MipSolution {
                    status: MipStatus::Optimal,
                    objective_value: Some(objective_value),
                    values,
                })
            }
            Err(ResolutionError::Infeasible) => {
                Ok(MipSolution::without_values(MipStatus::Infeasible))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(MipSolution::without_values(MipStatus::Unbounded))
            }
            Err(error) => Err(SolverError::ExecutionFailed(format!("{:?}", error))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_small_covering_mip() {
        let mut problem = MipProblem::new("cover");
        let x = problem.add_binary("x");
        let y = problem.add_binary("y");
        problem.objective = vec![(x, 3.0), (y, 2.0)];
        problem.add_constraint("cover", vec![(x, 1.0), (y, 1.0)], Sense::GreaterOrEqual, 1.0);

        let solution = CoinCbcSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, MipStatus::Optimal);
        assert_eq!(solution.objective_value, Some(2.0));
        assert!(solution.value(y) > 0.5);
    }

    #[test]
    fn reports_infeasibility() {
        let mut problem = MipProblem::new("impossible");
        let x = problem.add_binary("x");
        problem.objective = vec![(x, 1.0)];
        problem.add_constraint("too_much", vec![(x, 1.0)], Sense::GreaterOrEqual, 2.0);

        let solution = CoinCbcSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, MipStatus::Infeasible);
    }
}
