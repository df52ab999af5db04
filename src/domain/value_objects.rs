// Domain value objects representing core business concepts

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular dimension in integer millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub length: u32,
}

impl Size {
    pub fn new(width: u32, length: u32) -> Self {
        Self { width, length }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.length)
    }

    pub fn rotated(&self) -> Self {
        Self {
            width: self.length,
            length: self.width,
        }
    }

    pub fn longer_side(&self) -> u32 {
        self.width.max(self.length)
    }

    pub fn shorter_side(&self) -> u32 {
        self.width.min(self.length)
    }

    /// Two sizes are equivalent when their `{width, length}` multisets match,
    /// i.e. one is the other possibly rotated by 90 degrees.
    pub fn matches_rotated(&self, other: &Size) -> bool {
        self.longer_side() == other.longer_side() && self.shorter_side() == other.shorter_side()
    }

    /// Whether a sheet of this size can be handled by equipment whose maximum
    /// sheet is `max`, allowing either orientation.
    pub fn fits_within(&self, max: &Size) -> bool {
        self.longer_side() <= max.longer_side() && self.shorter_side() <= max.shorter_side()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.length)
    }
}

/// One-sided or two-sided printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Technique {
    Simplex,
    Duplex,
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Technique::Simplex => write!(f, "SIMPLEX"),
            Technique::Duplex => write!(f, "DUPLEX"),
        }
    }
}

/// Extra sheets printed on top of the net run to absorb setup waste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overage {
    pub amount: u32,
    /// When set, the amount is charged once per plate instead of once per run.
    pub per_ink: bool,
}

/// One cost line of a machine's price list.
///
/// For setup and wash the price is per plate (`per_ink`) or per pass; for
/// impressions it is per thousand sheets. `per_ink_pass` is carried from the
/// price list but currently has no effect on costing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostInfo {
    pub price: f64,
    pub per_ink: bool,
    pub per_ink_pass: bool,
}

impl CostInfo {
    /// Picks the multiplier this cost line applies to.
    pub fn units(&self, total_plates: u32, passes: u32) -> u32 {
        if self.per_ink {
            total_plates
        } else {
            passes
        }
    }
}

/// Percent-of-total-cost surcharges applied per extra resource of a kind used
/// by a production plan. All default to zero (no diversity penalty).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Penalties {
    pub different_press_sheet: u32,
    pub different_factory_sheet: u32,
    pub different_machine: u32,
}

/// Solver backend to use for the production-plan model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolverBackend {
    /// Automatically select the best available solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}
