// Solver adapters: concrete implementations of the MipSolver contract.

#[cfg(feature = "coin-cbc")]
mod coin_cbc_solver;
mod factory;
#[cfg(feature = "highs")]
mod highs_solver;

#[cfg(feature = "coin-cbc")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;
