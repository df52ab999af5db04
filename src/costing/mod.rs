// Cost model: printing needs, press charges and paper purchase for a layout
// run on a given machine. All functions are pure; a `None` means the layout
// is infeasible on that machine and the caller drops it.

use crate::domain::{
    CostBreakdown, Job, Machine, Material, MaterialNeeds, PricedLayout, PrintingCost,
    PrintingNeeds, Size, Technique,
};
use crate::geometry::grid_layout;
use std::collections::BTreeMap;

/// Price of one layout before it is given an id: run length, money and the
/// supporting breakdowns.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPrice {
    pub net_sheets: u64,
    pub total_cost: f64,
    pub cost_cents: i64,
    pub breakdown: CostBreakdown,
    pub material_needs: MaterialNeeds,
    pub print_needs: PrintingNeeds,
}

/// Plates and passes required to print the given ink counts on `machine`.
/// A machine without ink stations cannot print anything.
pub fn printing_needs(
    front_inks: u32,
    back_inks: u32,
    is_duplex: bool,
    machine: &Machine,
) -> Option<PrintingNeeds> {
    let bodies = machine.printing_bodies.unwrap_or(0);
    if bodies == 0 {
        return None;
    }

    let (technique, total_plates, passes) = if is_duplex {
        (
            Technique::Duplex,
            front_inks + back_inks,
            front_inks.div_ceil(bodies) + back_inks.div_ceil(bodies),
        )
    } else {
        (Technique::Simplex, front_inks, front_inks.div_ceil(bodies))
    };

    Some(PrintingNeeds {
        technique,
        total_plates,
        passes,
    })
}

/// Setup, wash and impression charges for a run of `net_sheets`.
pub fn printing_cost(machine: &Machine, needs: &PrintingNeeds, net_sheets: u64) -> PrintingCost {
    let setup_cost =
        machine.setup_cost.price * f64::from(machine.setup_cost.units(needs.total_plates, needs.passes));
    let wash_cost =
        machine.wash_cost.price * f64::from(machine.wash_cost.units(needs.total_plates, needs.passes));

    let chargeable_sheets = net_sheets.max(machine.min_impressions_charge.unwrap_or(0));
    let runs_through_press = match needs.technique {
        // One impression for the front, one for the back.
        Technique::Duplex => 2,
        Technique::Simplex => needs.passes,
    };
    let impression_cost = (chargeable_sheets as f64 / 1000.0)
        * machine.impression_cost.price
        * f64::from(runs_through_press);

    PrintingCost {
        setup_cost,
        wash_cost,
        impression_cost,
        total: setup_cost + wash_cost + impression_cost,
    }
}

/// Chooses the factory sheet that covers `total_printing_sheets` printing
/// sheets with the fewest stock sheets (ties prefer the smaller sheet) and
/// prices the purchase.
pub fn material_needs(
    material: &Material,
    printing_sheet: Size,
    total_printing_sheets: u64,
    dollar_rate: f64,
) -> Option<MaterialNeeds> {
    let mut best: Option<(u64, &crate::domain::FactorySize, crate::geometry::GridPlan)> = None;

    for factory_size in &material.factory_sizes {
        let plan = grid_layout(factory_size.size, printing_sheet);
        if plan.cuts_per_sheet == 0 {
            continue;
        }
        let sheets_needed = total_printing_sheets.div_ceil(plan.cuts_per_sheet);
        let better = match &best {
            None => true,
            Some((best_sheets, best_fs, _)) => {
                sheets_needed < *best_sheets
                    || (sheets_needed == *best_sheets
                        && factory_size.size.area() < best_fs.size.area())
            }
        };
        if better {
            best = Some((sheets_needed, factory_size, plan));
        }
    }

    let (quantity_needed, factory_size, cutting_plan) = best?;

    let width_m = f64::from(factory_size.size.width) / 1000.0;
    let length_m = f64::from(factory_size.size.length) / 1000.0;
    let tons_per_sheet = width_m * length_m * f64::from(material.grammage) / 1000.0 / 1000.0;
    let cost_per_sheet = tons_per_sheet * factory_size.usd_per_ton;
    let total_material_cost = quantity_needed as f64 * cost_per_sheet * dollar_rate;

    Some(MaterialNeeds {
        total_material_cost,
        factory_size: factory_size.clone(),
        quantity_needed,
        cutting_plan,
    })
}

/// Prices a layout (job-id → count per sheet) on `machine`.
///
/// The run length is driven by the most demanding job; ink needs aggregate as
/// the maximum over jobs and duplex infects the whole sheet. All jobs on a
/// layout share the first job's material (generation only gangs jobs of the
/// same material).
pub fn price_layout(
    jobs_in_layout: &BTreeMap<String, u64>,
    printing_sheet: Size,
    jobs: &BTreeMap<&str, &Job>,
    machine: &Machine,
    dollar_rate: f64,
) -> Option<LayoutPrice> {
    let mut net_sheets: u64 = 0;
    let mut front_inks: u32 = 0;
    let mut back_inks: u32 = 0;
    let mut is_duplex = false;
    let mut material: Option<&Material> = None;

    for (job_id, &count) in jobs_in_layout {
        if count == 0 {
            continue;
        }
        let job = jobs.get(job_id.as_str())?;
        net_sheets = net_sheets.max(job.quantity.div_ceil(count));
        front_inks = front_inks.max(job.front_inks);
        back_inks = back_inks.max(job.back_inks);
        is_duplex = is_duplex || job.is_duplex;
        material.get_or_insert(&job.material);
    }

    let material = material?;
    if net_sheets == 0 {
        return None;
    }

    let print_needs = printing_needs(front_inks, back_inks, is_duplex, machine)?;

    let overage_sheets = u64::from(machine.overage.amount)
        * if machine.overage.per_ink {
            u64::from(print_needs.total_plates)
        } else {
            1
        };
    let total_printing_sheets = net_sheets + overage_sheets;

    let material_needs = material_needs(material, printing_sheet, total_printing_sheets, dollar_rate)?;
    let printing = printing_cost(machine, &print_needs, net_sheets);
    let total_cost = material_needs.total_material_cost + printing.total;

    Some(LayoutPrice {
        net_sheets,
        total_cost,
        cost_cents: (total_cost * 100.0).round() as i64,
        breakdown: CostBreakdown {
            material_cost: material_needs.total_material_cost,
            printing_cost: printing,
        },
        material_needs,
        print_needs,
    })
}

/// Attaches identity, machine and placements to a price, producing the unit
/// the plan solver works with.
pub fn into_priced_layout(
    layout_id: String,
    jobs_in_layout: BTreeMap<String, u64>,
    printing_sheet: Size,
    machine: &Machine,
    price: LayoutPrice,
    placements: Vec<crate::domain::Placement>,
) -> PricedLayout {
    PricedLayout {
        layout_id,
        jobs_in_layout,
        printing_sheet,
        machine_id: machine.id.clone(),
        machine_name: machine.name.clone(),
        net_sheets: price.net_sheets,
        total_cost: price.total_cost,
        cost_cents: price.cost_cents,
        breakdown: price.breakdown,
        material_needs: price.material_needs,
        print_needs: price.print_needs,
        placements,
    }
}
