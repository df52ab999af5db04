// Domain layer: ganging entities and the solver-service contract
pub mod domain;

// Geometry: grid cutting and rectangle packing
pub mod geometry;

// Cost model: printing needs, press charges and paper purchase
pub mod costing;

// Application layer: pipeline phases and I/O adapters
pub mod application;

// Solver adapters: concrete implementations of MipSolver
pub mod solver;

// Re-export commonly used types
pub use application::{
    BaselineSolution, CandidateLayout, Deadline, GangedSolution, GangingOptimizer, InputError,
    OptimizeError, PlanItem, SolveOutcome,
};
pub use domain::{
    CutCatalog, Job, Machine, Material, MipProblem, MipSolution, MipSolver, MipStatus,
    Penalties, PricedLayout, Size, SolveRequest, SolverBackend, SolverError,
};
pub use solver::SolverFactory;

#[cfg(feature = "coin-cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
