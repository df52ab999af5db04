// Application layer: the three pipeline phases (baseline, candidate
// generation, plan solving), their orchestration, and the I/O adapters.

pub mod baseline;
pub mod dto;
pub mod generator;
pub mod mappers;
pub mod optimizer;
pub mod planner;

pub use baseline::{solve_baseline, BaselineSolution};
pub use generator::{generate_candidates, CandidateLayout};
pub use mappers::InputError;
pub use optimizer::{GangedSolution, GangingOptimizer, PlanItem, SolveOutcome};
pub use planner::PlanSolution;

use crate::domain::SolverError;
use std::time::{Duration, Instant};

/// Request-level failure. Infeasibility of the ganging model is not an error
/// (the baseline is still reported); these are.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// No machine/printing-sheet combination can hold the job at all.
    #[error("job '{job_id}' does not fit on any available machine and printing sheet")]
    JobCannotBePlaced { job_id: String },

    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}

/// Wall-clock budget shared by the whole request. The generator polls it
/// between units of work; each plan solve receives what is left as its own
/// time limit.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.budget
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }

    pub fn remaining_seconds(&self) -> f64 {
        self.remaining().as_secs_f64()
    }
}
