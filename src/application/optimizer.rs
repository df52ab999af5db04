// Orchestration of the three phases: baseline, candidate generation and the
// plan solve, followed by ranking against the baseline.

use super::baseline::{solve_baseline, BaselineSolution};
use super::generator::generate_candidates;
use super::planner::{assemble_priced_layouts, solve_plan};
use super::{Deadline, OptimizeError};
use crate::domain::{PricedLayout, SolveRequest, SolverBackend};
use crate::solver::SolverFactory;
use std::collections::BTreeMap;
use tracing::info;

/// One ganged plan that beats the baseline.
#[derive(Debug, Clone)]
pub struct GangedSolution {
    pub cost_cents: i64,
    pub production_plan: Vec<PlanItem>,
    /// The selected layouts, keyed by layout id.
    pub layouts: BTreeMap<String, PricedLayout>,
}

#[derive(Debug, Clone)]
pub struct PlanItem {
    pub layout_id: String,
    pub sheets: u64,
    pub cost: f64,
}

/// Everything one optimization run produces.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub baseline: BaselineSolution,
    /// Ganged plans strictly cheaper than the baseline, ascending by cost.
    pub ganged: Vec<GangedSolution>,
}

/// The ganging optimizer. Stateless between requests; each call owns its
/// intermediates and drops them when the solve finishes.
#[derive(Debug, Clone, Default)]
pub struct GangingOptimizer {
    backend: SolverBackend,
}

impl GangingOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(backend: SolverBackend) -> Self {
        Self { backend }
    }

    /// Runs the full pipeline on a validated request.
    pub fn optimize(&self, request: &SolveRequest) -> Result<SolveOutcome, OptimizeError> {
        let deadline = Deadline::from_seconds(request.options.timeout_seconds);
        let jobs = request.jobs_by_id();
        info!(
            jobs = request.jobs.len(),
            machines = request.machines.len(),
            "starting optimization"
        );

        let baseline = solve_baseline(request, &jobs)?;
        let candidates = generate_candidates(request, &deadline);

        let mut ganged = Vec::new();
        if !candidates.is_empty() {
            let solver = SolverFactory::create(self.backend)?;
            let pool = assemble_priced_layouts(request, &jobs, &baseline.layouts, &candidates);
            let mut plans = solve_plan(request, &jobs, &pool, &deadline, solver.as_ref())?;

            // Only plans strictly cheaper than printing every job on its own
            // are worth reporting.
            plans.retain(|plan| plan.cost_cents < baseline.total_cents);
            plans.sort_by_key(|plan| plan.cost_cents);
            plans.truncate(request.options.number_of_solutions as usize);

            for plan in plans {
                let production_plan = plan
                    .layout_ids
                    .iter()
                    .map(|id| {
                        let layout = &pool[id];
                        PlanItem {
                            layout_id: id.clone(),
                            sheets: layout.net_sheets,
                            cost: layout.total_cost,
                        }
                    })
                    .collect();
                let layouts = plan
                    .layout_ids
                    .iter()
                    .map(|id| (id.clone(), pool[id].clone()))
                    .collect();
                ganged.push(GangedSolution {
                    cost_cents: plan.cost_cents,
                    production_plan,
                    layouts,
                });
            }
        } else {
            info!("no ganging candidates; reporting baseline only");
        }

        info!(
            baseline = baseline.total_cost,
            ganged = ganged.len(),
            "optimization finished"
        );
        Ok(SolveOutcome { baseline, ganged })
    }
}
