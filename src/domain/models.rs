// Domain entities for the ganging optimizer: jobs, machines, materials and
// the priced layouts the pipeline derives from them.

use super::value_objects::{CostInfo, Overage, Penalties, Size, Technique};
use crate::geometry::GridPlan;
use std::collections::BTreeMap;

/// A stock sheet size a paper mill can deliver, with its price per ton.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorySize {
    pub size: Size,
    pub usd_per_ton: f64,
}

/// A paper stock: grammage plus the factory sheet sizes it comes in.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub grammage: u32,
    pub is_special: bool,
    pub factory_sizes: Vec<FactorySize>,
}

/// A printing job: one rectangular piece with a demanded quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub width: u32,
    pub length: u32,
    pub quantity: u64,
    /// Carried from the order but not honored by the ganging packer.
    pub rotatable: bool,
    pub material: Material,
    pub front_inks: u32,
    pub back_inks: u32,
    pub is_duplex: bool,
    pub same_plates_for_back: bool,
}

impl Job {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.length)
    }

    pub fn area(&self) -> u64 {
        self.size().area()
    }
}

/// A printing press with its geometric limits and cost structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    pub id: String,
    pub name: String,
    /// Number of ink stations; `None` (or zero) makes the machine unusable.
    pub printing_bodies: Option<u32>,
    pub max_sheet_size: Size,
    pub overage: Overage,
    pub min_impressions_charge: Option<u64>,
    pub setup_cost: CostInfo,
    pub wash_cost: CostInfo,
    pub impression_cost: CostInfo,
}

impl Machine {
    /// Whether this press accepts the given printing sheet in any orientation.
    pub fn admits_sheet(&self, sheet: &Size) -> bool {
        sheet.fits_within(&self.max_sheet_size)
    }
}

/// One entry of the cutting catalog: the printing sheets that may be cut from
/// a given factory sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CutMap {
    pub for_paper_size: Size,
    pub sheet_sizes: Vec<Size>,
}

/// The whole cutting catalog. Lookups treat factory sizes as equivalent under
/// rotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutCatalog {
    pub entries: Vec<CutMap>,
}

impl CutCatalog {
    pub fn new(entries: Vec<CutMap>) -> Self {
        Self { entries }
    }

    /// Printing sheets permissible for `factory`, or an empty slice when the
    /// catalog has no entry for that factory size.
    pub fn cuts_for(&self, factory: &Size) -> &[Size] {
        self.entries
            .iter()
            .find(|entry| entry.for_paper_size.matches_rotated(factory))
            .map(|entry| entry.sheet_sizes.as_slice())
            .unwrap_or(&[])
    }
}

/// Request-level solve options.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub timeout_seconds: u64,
    pub number_of_solutions: u32,
    pub penalties: Penalties,
}

/// A fully validated optimization request.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    pub options: Options,
    pub dollar_rate: f64,
    pub jobs: Vec<Job>,
    pub machines: Vec<Machine>,
    pub cuts: CutCatalog,
}

impl SolveRequest {
    /// Index of jobs by id, ordered for deterministic iteration.
    pub fn jobs_by_id(&self) -> BTreeMap<&str, &Job> {
        self.jobs.iter().map(|job| (job.id.as_str(), job)).collect()
    }
}

/// One job rectangle placed on a printing sheet. Origin is the sheet's
/// top-left corner, y grows downwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub job_id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub length: u32,
}

/// Plates and passes a layout requires on a given machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintingNeeds {
    pub technique: Technique,
    pub total_plates: u32,
    pub passes: u32,
}

/// Setup, wash and impression charges for one print run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintingCost {
    pub setup_cost: f64,
    pub wash_cost: f64,
    pub impression_cost: f64,
    pub total: f64,
}

/// The paper purchase a layout requires: chosen factory sheet, how many of
/// them, and how each is cut down to printing sheets.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialNeeds {
    pub total_material_cost: f64,
    pub factory_size: FactorySize,
    pub quantity_needed: u64,
    pub cutting_plan: GridPlan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub printing_cost: PrintingCost,
}

/// A layout bound to a machine and fully costed: the unit the plan solver
/// selects from.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLayout {
    pub layout_id: String,
    /// Per-sheet count of every job on this layout, keyed by job id.
    pub jobs_in_layout: BTreeMap<String, u64>,
    pub printing_sheet: Size,
    pub machine_id: String,
    pub machine_name: String,
    /// Print run before overage.
    pub net_sheets: u64,
    pub total_cost: f64,
    /// `total_cost` in integer cents, the unit the plan solver works in.
    pub cost_cents: i64,
    pub breakdown: CostBreakdown,
    pub material_needs: MaterialNeeds,
    pub print_needs: PrintingNeeds,
    pub placements: Vec<Placement>,
}

impl PricedLayout {
    /// Sheets of each job this layout yields over its whole run.
    pub fn produced(&self, job_id: &str) -> u64 {
        self.jobs_in_layout
            .get(job_id)
            .map(|count| count * self.net_sheets)
            .unwrap_or(0)
    }

    /// Key identifying the factory sheet this layout consumes.
    pub fn factory_sheet_key(&self) -> String {
        self.material_needs.factory_size.size.to_string()
    }
}
