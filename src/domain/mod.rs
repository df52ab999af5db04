pub mod models;
pub mod solver_service;
pub mod value_objects;

pub use models::{
    CostBreakdown, CutCatalog, CutMap, FactorySize, Job, Machine, Material, MaterialNeeds, Options,
    Placement, PricedLayout, PrintingCost, PrintingNeeds, SolveRequest,
};
pub use solver_service::{
    MipConstraint, MipProblem, MipSolution, MipSolver, MipStatus, MipVariable, Sense, SolverError,
    VarKind,
};
pub use value_objects::{CostInfo, Overage, Penalties, Size, SolverBackend, Technique};
