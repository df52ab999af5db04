use crate::domain::solver_service::{MipSolver, Result, SolverError};
use crate::domain::SolverBackend;
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    pub fn create(backend: SolverBackend) -> Result<Arc<dyn MipSolver>> {
        match backend {
            SolverBackend::Auto => Self::auto(),
            SolverBackend::CoinCbc => Self::coin_cbc(),
            SolverBackend::Highs => Self::highs(),
        }
    }

    /// Get the default solver (HiGHS when available)
    pub fn default_solver() -> Result<Arc<dyn MipSolver>> {
        Self::auto()
    }

    #[allow(unreachable_code)]
    fn auto() -> Result<Arc<dyn MipSolver>> {
        #[cfg(feature = "highs")]
        return Ok(Arc::new(super::HighsSolver::new()));
        #[cfg(feature = "coin-cbc")]
        return Ok(Arc::new(super::CoinCbcSolver::new()));
        Err(SolverError::SolverNotAvailable(
            "no MILP backend compiled in; enable the `highs` or `coin-cbc` feature".to_string(),
        ))
    }

    #[allow(unreachable_code)]
    fn coin_cbc() -> Result<Arc<dyn MipSolver>> {
        #[cfg(feature = "coin-cbc")]
        return Ok(Arc::new(super::CoinCbcSolver::new()));
        Err(SolverError::SolverNotAvailable(
            "built without the `coin-cbc` feature".to_string(),
        ))
    }

    #[allow(unreachable_code)]
    fn highs() -> Result<Arc<dyn MipSolver>> {
        #[cfg(feature = "highs")]
        return Ok(Arc::new(super::HighsSolver::new()));
        Err(SolverError::SolverNotAvailable(
            "built without the `highs` feature".to_string(),
        ))
    }
}
