// HiGHS solver adapter: translates the domain MIP model to the HiGHS API.

use crate::domain::solver_service::{
    MipProblem, MipSolution, MipSolver, MipStatus, Result, Sense as RowSense, SolverError,
    VarKind,
};
use highs::{HighsModelStatus, RowProblem, Sense};

#[derive(Debug)]
pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MipSolver for HighsSolver {
    fn solve(&self, problem: &MipProblem) -> Result<MipSolution> {
        self.validate(problem)?;

        let num_vars = problem.num_variables();
        let mut objective = vec![0.0; num_vars];
        for &(var, coeff) in &problem.objective {
            objective[var] += coeff;
        }

        // RowProblem: add variables first, then constraints.
        let mut pb = RowProblem::default();
        let mut columns = Vec::with_capacity(num_vars);
        for (i, var) in problem.variables.iter().enumerate() {
            let upper = var.upper.unwrap_or(f64::INFINITY);
            let column = match var.kind {
                VarKind::Integer | VarKind::Binary => {
                    pb.add_integer_column(objective[i], var.lower..upper)
                }
                VarKind::Continuous => pb.add_column(objective[i], var.lower..upper),
            };
            columns.push(column);
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|&&(_, coeff)| coeff != 0.0)
                .map(|&(var, coeff)| (columns[var], coeff))
                .collect();
            match constraint.sense {
                RowSense::LessOrEqual => pb.add_row(..=constraint.rhs, &terms),
                RowSense::Equal => pb.add_row(constraint.rhs..=constraint.rhs, &terms),
                RowSense::GreaterOrEqual => pb.add_row(constraint.rhs.., &terms),
            };
        }

        let mut model = pb.optimise(Sense::Minimise);
        model.set_option("output_flag", false);
        if let Some(limit) = problem.time_limit {
            model.set_option("time_limit", limit.max(0.01));
        }

        let solved = model.solve();
        match solved.status() {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective_value = dot(&objective, &values);
                Ok(MipSolution {
                    status: MipStatus::Optimal,
                    objective_value: Some(objective_value),
                    values,
                })
            }
            HighsModelStatus::Infeasible => {
                Ok(MipSolution::without_values(MipStatus::Infeasible))
            }
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(MipSolution::without_values(MipStatus::Unbounded))
            }
            HighsModelStatus::ReachedTimeLimit => {
                // An incumbent may or may not exist; pass on whatever HiGHS
                // kept so the caller can decide.
                let values = solved.get_solution().columns().to_vec();
                if values.len() == num_vars {
                    let objective_value = dot(&objective, &values);
                    Ok(MipSolution {
                        status: MipStatus::TimeLimit,
                        objective_value: Some(objective_value),
                        values,
                    })
                } else {
                    Ok(MipSolution::without_values(MipStatus::TimeLimit))
                }
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

fn dot(coefficients: &[f64], values: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(values)
        .map(|(c, v)| c * v)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solver_service::Sense;

    #[test]
    fn solves_a_small_covering_mip() {
        // min 3x + 2y  s.t.  x + y >= 1,  x,y binary  ->  y = 1, cost 2.
        let mut problem = MipProblem::new("cover");
        let x = problem.add_binary("x");
        let y = problem.add_binary("y");
        problem.objective = vec![(x, 3.0), (y, 2.0)];
        problem.add_constraint("cover", vec![(x, 1.0), (y, 1.0)], Sense::GreaterOrEqual, 1.0);

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, MipStatus::Optimal);
        assert_eq!(solution.objective_value, Some(2.0));
        assert!(solution.value(x) < 0.5);
        assert!(solution.value(y) > 0.5);
    }

    #[test]
    fn reports_infeasibility() {
        let mut problem = MipProblem::new("impossible");
        let x = problem.add_binary("x");
        problem.objective = vec![(x, 1.0)];
        problem.add_constraint("too_much", vec![(x, 1.0)], Sense::GreaterOrEqual, 2.0);

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, MipStatus::Infeasible);
    }

    #[test]
    fn honors_equality_rows_with_continuous_vars() {
        // min c  s.t.  c = 5x, x = 1  ->  c = 5.
        let mut problem = MipProblem::new("tie");
        let x = problem.add_binary("x");
        let c = problem.add_continuous("c", 0.0, Some(10.0));
        problem.objective = vec![(c, 1.0)];
        problem.add_constraint("def", vec![(c, 1.0), (x, -5.0)], Sense::Equal, 0.0);
        problem.add_constraint("force", vec![(x, 1.0)], Sense::GreaterOrEqual, 1.0);

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, MipStatus::Optimal);
        assert!((solution.value(c) - 5.0).abs() < 1e-6);
    }
}
