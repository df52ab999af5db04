// Phase 1: the best single-job layout for every job. Its total is the bound
// any ganged plan has to beat.

use super::OptimizeError;
use crate::costing::{into_priced_layout, price_layout, LayoutPrice};
use crate::domain::{Job, Machine, Placement, PricedLayout, Size, SolveRequest};
use crate::geometry::grid_layout;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The no-ganging solution: one dedicated layout per job.
#[derive(Debug, Clone)]
pub struct BaselineSolution {
    pub layouts: Vec<PricedLayout>,
    pub total_cost: f64,
    pub total_cents: i64,
}

/// Finds, for each job independently, the cheapest
/// (machine, factory sheet, printing sheet) combination.
///
/// A job that fits nowhere fails the whole request: demand for it could never
/// be satisfied by any plan.
pub fn solve_baseline(
    request: &SolveRequest,
    jobs: &BTreeMap<&str, &Job>,
) -> Result<BaselineSolution, OptimizeError> {
    info!("phase 1: computing baseline (single-job layouts)");

    let mut layouts = Vec::with_capacity(request.jobs.len());
    let mut total_cost = 0.0;
    let mut total_cents = 0i64;

    for job in &request.jobs {
        let best = best_single_job_layout(job, request, jobs).ok_or_else(|| {
            OptimizeError::JobCannotBePlaced {
                job_id: job.id.clone(),
            }
        })?;

        debug!(
            job = %job.id,
            net_sheets = best.net_sheets,
            cost = best.total_cost,
            "baseline option selected"
        );
        total_cost += best.total_cost;
        total_cents += best.cost_cents;
        layouts.push(best);
    }

    info!(total = total_cost, "baseline total cost");
    Ok(BaselineSolution {
        layouts,
        total_cost,
        total_cents,
    })
}

fn best_single_job_layout(
    job: &Job,
    request: &SolveRequest,
    jobs: &BTreeMap<&str, &Job>,
) -> Option<PricedLayout> {
    let mut best: Option<(LayoutPrice, &Machine, Size, u64)> = None;

    for machine in &request.machines {
        for factory_size in &job.material.factory_sizes {
            for cut in request.cuts.cuts_for(&factory_size.size) {
                if !machine.admits_sheet(cut) {
                    continue;
                }
                let plan = grid_layout(*cut, job.size());
                if plan.cuts_per_sheet == 0 {
                    continue;
                }
                let counts: BTreeMap<String, u64> =
                    [(job.id.clone(), plan.cuts_per_sheet)].into_iter().collect();
                let Some(price) =
                    price_layout(&counts, *cut, jobs, machine, request.dollar_rate)
                else {
                    continue;
                };
                let improves = best
                    .as_ref()
                    .map(|(incumbent, _, _, _)| price.total_cost < incumbent.total_cost)
                    .unwrap_or(true);
                if improves {
                    best = Some((price, machine, *cut, plan.cuts_per_sheet));
                }
            }
        }
    }

    let (price, machine, sheet, cuts_per_sheet) = best?;
    let placements = grid_layout(sheet, job.size())
        .positions
        .into_iter()
        .map(|rect| Placement {
            job_id: job.id.clone(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            length: rect.length,
        })
        .collect();
    let counts: BTreeMap<String, u64> = [(job.id.clone(), cuts_per_sheet)].into_iter().collect();

    Some(into_priced_layout(
        format!("base_{}", job.id),
        counts,
        sheet,
        machine,
        price,
        placements,
    ))
}
