// Wire types for the structured JSON request and response. Kept separate
// from the domain so field spelling and optionality of the wire format never
// leak into business logic.

use crate::domain::{Size, Technique};
use crate::geometry::GridPlan;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDto {
    pub options: OptionsDto,
    pub common_details: CommonDetailsDto,
    pub jobs: Vec<JobDto>,
    pub machines: Vec<MachineDto>,
    pub available_cuts: Vec<AvailableCutDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsDto {
    pub timeout_seconds: u64,
    #[serde(default = "default_number_of_solutions")]
    pub number_of_solutions: u32,
    #[serde(default)]
    pub penalties: PenaltiesDto,
}

fn default_number_of_solutions() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltiesDto {
    #[serde(default)]
    pub different_press_sheet_penalty: u32,
    #[serde(default)]
    pub different_factory_sheet_penalty: u32,
    #[serde(default)]
    pub different_machine_penalty: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonDetailsDto {
    pub dollar_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorySizeDto {
    pub width: u32,
    pub length: u32,
    pub usd_per_ton: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDto {
    pub id: i64,
    pub name: String,
    pub grammage: u32,
    #[serde(default, alias = "isSpecialMaterial")]
    pub is_special: bool,
    pub factory_sizes: Vec<FactorySizeDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub id: String,
    pub width: u32,
    pub length: u32,
    pub quantity: u64,
    #[serde(default)]
    pub rotatable: bool,
    pub material: MaterialDto,
    #[serde(default)]
    pub front_inks: u32,
    #[serde(default)]
    pub back_inks: u32,
    #[serde(default)]
    pub is_duplex: bool,
    #[serde(default)]
    pub same_plates_for_back: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverageDto {
    pub amount: u32,
    #[serde(default)]
    pub per_ink: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostInfoDto {
    pub price: f64,
    #[serde(default)]
    pub per_ink: bool,
    #[serde(default)]
    pub per_ink_pass: bool,
}

/// Impression pricing is quoted per thousand sheets, hence the distinct key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpressionCostDto {
    pub price_per_thousand: f64,
    #[serde(default)]
    pub per_ink: bool,
    #[serde(default)]
    pub per_ink_pass: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineDto {
    pub id: String,
    pub name: String,
    pub printing_bodies: Option<u32>,
    pub max_sheet_size: Size,
    pub overage: OverageDto,
    pub min_impressions_charge: Option<u64>,
    pub setup_cost: CostInfoDto,
    pub wash_cost: CostInfoDto,
    pub impression_cost: ImpressionCostDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableCutDto {
    pub for_paper_size: Size,
    pub sheet_sizes: Vec<Size>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDto {
    pub summary: SummaryOut,
    pub baseline_solution: BaselineSolutionOut,
    pub ganged_solutions: Vec<GangedSolutionOut>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOut {
    pub baseline_total_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaselineSolutionOut {
    // Historical spelling, kept for consumers of the original service.
    pub total_cost: f64,
    pub layouts: BTreeMap<String, LayoutOut>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GangedSolutionOut {
    pub summary: GangedSummaryOut,
    pub production_plan: Vec<PlanItemOut>,
    pub layouts: BTreeMap<String, LayoutOut>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GangedSummaryOut {
    pub ganged_total_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItemOut {
    pub id: String,
    pub sheets: u64,
    pub cost_for_this_plan_item: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOut {
    pub layout_id: String,
    pub sheets_to_print: u64,
    pub machine: MachineRefOut,
    pub printing_sheet: Size,
    pub cost_breakdown: CostBreakdownOut,
    pub material_needs: MaterialNeedsOut,
    pub print_needs: PrintNeedsOut,
    pub jobs_in_layout: Vec<JobInLayoutOut>,
    pub placements: Vec<PlacementOut>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRefOut {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdownOut {
    pub material_cost: f64,
    pub printing_cost: PrintingCostOut,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintingCostOut {
    pub setup_cost: f64,
    pub wash_cost: f64,
    pub impression_cost: f64,
    pub total_printing_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialNeedsOut {
    pub total_material_cost: f64,
    pub factory_sheets: FactorySheetsOut,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorySheetsOut {
    pub size: FactorySizeOut,
    pub quantity_needed: u64,
    pub cutting_plan: GridPlan,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorySizeOut {
    pub width: u32,
    pub length: u32,
    pub usd_per_ton: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintNeedsOut {
    pub technique: Technique,
    pub total_plates: u32,
    pub passes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInLayoutOut {
    pub id: String,
    pub quantity_per_sheet: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOut {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub length: u32,
}
