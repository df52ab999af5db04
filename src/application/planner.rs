// Phase 3: select the cheapest set of priced layouts covering every job's
// demand. The selection model is a MILP: binary layout choices, per-resource
// indicator variables, and diversity penalties expressed as percent of total
// cost via exact product linearization.

use super::generator::CandidateLayout;
use super::Deadline;
use crate::costing::{into_priced_layout, price_layout};
use crate::domain::solver_service::{MipProblem, MipSolver, MipStatus, Result, Sense};
use crate::domain::{Job, PricedLayout, SolveRequest};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// One plan the solver produced: the selected layouts and their summed cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSolution {
    pub cost_cents: i64,
    pub layout_ids: Vec<String>,
}

/// Builds the pool the plan model selects from: every baseline layout plus
/// every candidate priced on every machine that admits its sheet. Candidates
/// that cannot be priced on a machine are dropped.
pub fn assemble_priced_layouts(
    request: &SolveRequest,
    jobs: &BTreeMap<&str, &Job>,
    baseline: &[PricedLayout],
    candidates: &[CandidateLayout],
) -> BTreeMap<String, PricedLayout> {
    let mut pool: BTreeMap<String, PricedLayout> = baseline
        .iter()
        .map(|layout| (layout.layout_id.clone(), layout.clone()))
        .collect();

    for (index, candidate) in candidates.iter().enumerate() {
        for machine in &request.machines {
            if !machine.admits_sheet(&candidate.printing_sheet) {
                continue;
            }
            let Some(price) = price_layout(
                &candidate.jobs,
                candidate.printing_sheet,
                jobs,
                machine,
                request.dollar_rate,
            ) else {
                continue;
            };
            let layout_id = format!("ganging_{}_{}", index, machine.id);
            pool.insert(
                layout_id.clone(),
                into_priced_layout(
                    layout_id,
                    candidate.jobs.clone(),
                    candidate.printing_sheet,
                    machine,
                    price,
                    candidate.placements.clone(),
                ),
            );
        }
    }

    pool
}

/// Solves the selection model repeatedly, excluding each found cost level,
/// until `number_of_solutions` plans are collected, the model turns
/// infeasible, or the deadline expires.
pub fn solve_plan(
    request: &SolveRequest,
    jobs: &BTreeMap<&str, &Job>,
    pool: &BTreeMap<String, PricedLayout>,
    deadline: &Deadline,
    solver: &dyn MipSolver,
) -> Result<Vec<PlanSolution>> {
    if pool.is_empty() {
        return Ok(Vec::new());
    }

    info!(layouts = pool.len(), "phase 3: solving the production plan");
    let layouts: Vec<&PricedLayout> = pool.values().collect();
    let (mut problem, use_vars, total_cost_var) = build_model(request, jobs, &layouts);

    let mut solutions = Vec::new();
    for round in 0..request.options.number_of_solutions {
        let remaining = deadline.remaining_seconds();
        if remaining <= 0.0 {
            info!("deadline reached before plan solve round {round}");
            break;
        }
        problem.time_limit = Some(remaining);

        let solution = solver.solve(&problem)?;
        let out_of_time = solution.status == MipStatus::TimeLimit;
        if !(solution.status.has_solution() || out_of_time) {
            debug!(round, status = ?solution.status, "no further plans");
            break;
        }

        let selected: Vec<usize> = (0..layouts.len())
            .filter(|&i| solution.value(use_vars[i]) > 0.5)
            .collect();
        if selected.is_empty() || !covers_demand(&selected, &layouts, jobs) {
            break;
        }

        let cost_cents: i64 = selected.iter().map(|&i| layouts[i].cost_cents).sum();
        info!(round, cost = cost_cents as f64 / 100.0, "plan found");
        solutions.push(PlanSolution {
            cost_cents,
            layout_ids: selected
                .iter()
                .map(|&i| layouts[i].layout_id.clone())
                .collect(),
        });

        if out_of_time {
            break;
        }
        // The next plan must be strictly more expensive than this one.
        problem.add_constraint(
            format!("exclude_cost_le_{cost_cents}"),
            vec![(total_cost_var, 1.0)],
            Sense::GreaterOrEqual,
            (cost_cents + 1) as f64,
        );
    }

    Ok(solutions)
}

/// Lays the selection MILP out: returns the problem, the per-layout binary
/// variable indices (aligned with `layouts`), and the total-cost variable.
fn build_model(
    request: &SolveRequest,
    jobs: &BTreeMap<&str, &Job>,
    layouts: &[&PricedLayout],
) -> (MipProblem, Vec<usize>, usize) {
    let mut problem = MipProblem::new("production_plan");

    let use_vars: Vec<usize> = layouts
        .iter()
        .map(|layout| problem.add_binary(format!("use_{}", layout.layout_id)))
        .collect();

    // Demand: what the selected layouts produce covers each job's quantity.
    for (job_id, job) in jobs {
        let terms: Vec<(usize, f64)> = layouts
            .iter()
            .enumerate()
            .filter_map(|(i, layout)| {
                let produced = layout.produced(job_id);
                (produced > 0).then_some((use_vars[i], produced as f64))
            })
            .collect();
        if !terms.is_empty() {
            problem.add_constraint(
                format!("demand_{job_id}"),
                terms,
                Sense::GreaterOrEqual,
                job.quantity as f64,
            );
        }
    }

    // Total cost in cents, tied to the selection.
    let cost_ceiling: i64 = layouts.iter().map(|layout| layout.cost_cents).sum();
    let total_cost_var = problem.add_continuous("total_cost", 0.0, Some(cost_ceiling as f64));
    let mut definition = vec![(total_cost_var, 1.0)];
    for (i, layout) in layouts.iter().enumerate() {
        if layout.cost_cents != 0 {
            definition.push((use_vars[i], -(layout.cost_cents as f64)));
        }
    }
    problem.add_constraint("total_cost_def", definition, Sense::Equal, 0.0);

    let mut objective = vec![(total_cost_var, 1.0)];
    add_penalties(
        request,
        layouts,
        &use_vars,
        total_cost_var,
        cost_ceiling as f64,
        &mut problem,
        &mut objective,
    );
    problem.objective = objective;

    (problem, use_vars, total_cost_var)
}

/// Adds the diversity penalty: for each penalized resource kind, an
/// indicator variable per distinct resource and the product
/// `w = total_cost * used` linearized with big-M bounds, so that
/// `100 * penalty = sum over kinds of p * (sum(w) - total_cost)`. That
/// charges exactly p% of the total cost per resource beyond the first.
#[allow(clippy::too_many_arguments)]
fn add_penalties(
    request: &SolveRequest,
    layouts: &[&PricedLayout],
    use_vars: &[usize],
    total_cost_var: usize,
    cost_ceiling: f64,
    problem: &mut MipProblem,
    objective: &mut Vec<(usize, f64)>,
) {
    let penalties = request.options.penalties;
    let kinds: [(&str, u32, fn(&PricedLayout) -> String); 3] = [
        ("machine", penalties.different_machine, |l| l.machine_id.clone()),
        ("ps", penalties.different_press_sheet, |l| {
            l.printing_sheet.to_string()
        }),
        ("fs", penalties.different_factory_sheet, |l| {
            l.factory_sheet_key()
        }),
    ];

    let mut penalty_terms: Vec<(usize, f64)> = Vec::new();
    let mut cost_coefficient = 0.0;

    for (prefix, percent, key_of) in kinds {
        if percent == 0 {
            continue;
        }
        let keys: BTreeSet<String> = layouts.iter().map(|l| key_of(l)).collect();
        let mut indicator_by_key = BTreeMap::new();
        for key in &keys {
            let used = problem.add_binary(format!("uses_{prefix}_{key}"));
            let product = problem.add_continuous(
                format!("cost_if_{prefix}_{key}"),
                0.0,
                Some(cost_ceiling),
            );
            // product = total_cost when the resource is used, else 0.
            problem.add_constraint(
                format!("{prefix}_{key}_prod_ub_sel"),
                vec![(product, 1.0), (used, -cost_ceiling)],
                Sense::LessOrEqual,
                0.0,
            );
            problem.add_constraint(
                format!("{prefix}_{key}_prod_ub_cost"),
                vec![(product, 1.0), (total_cost_var, -1.0)],
                Sense::LessOrEqual,
                0.0,
            );
            problem.add_constraint(
                format!("{prefix}_{key}_prod_lb"),
                vec![(product, 1.0), (total_cost_var, -1.0), (used, -cost_ceiling)],
                Sense::GreaterOrEqual,
                -cost_ceiling,
            );
            penalty_terms.push((product, -f64::from(percent)));
            indicator_by_key.insert(key.clone(), used);
        }
        cost_coefficient += f64::from(percent);

        for (i, layout) in layouts.iter().enumerate() {
            let used = indicator_by_key[&key_of(layout)];
            problem.add_constraint(
                format!("{}_implies_{prefix}", layout.layout_id),
                vec![(use_vars[i], 1.0), (used, -1.0)],
                Sense::LessOrEqual,
                0.0,
            );
        }
    }

    if penalty_terms.is_empty() {
        return;
    }

    let penalty_var = problem.add_continuous("penalty", 0.0, None);
    let mut definition = vec![(penalty_var, 100.0), (total_cost_var, cost_coefficient)];
    definition.extend(penalty_terms);
    problem.add_constraint("penalty_def", definition, Sense::Equal, 0.0);
    objective.push((penalty_var, 1.0));
}

fn covers_demand(
    selected: &[usize],
    layouts: &[&PricedLayout],
    jobs: &BTreeMap<&str, &Job>,
) -> bool {
    jobs.iter().all(|(job_id, job)| {
        let produced: u64 = selected.iter().map(|&i| layouts[i].produced(job_id)).sum();
        produced >= job.quantity
    })
}
