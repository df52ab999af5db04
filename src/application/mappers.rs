// Mappers: convert between wire DTOs and domain models, and validate the
// request on the way in. Keeps serde spelling concerns isolated from
// business logic.

use super::dto::{
    AvailableCutDto, BaselineSolutionOut, CostBreakdownOut, CostInfoDto, FactorySheetsOut,
    FactorySizeOut, GangedSolutionOut, GangedSummaryOut, InputDto, JobInLayoutOut, LayoutOut,
    MachineDto, MachineRefOut, MaterialDto, MaterialNeedsOut, OutputDto, PlacementOut,
    PlanItemOut, PrintNeedsOut, PrintingCostOut, SummaryOut,
};
use super::optimizer::SolveOutcome;
use crate::domain::{
    CostInfo, CutCatalog, CutMap, FactorySize, Job, Machine, Material, Options, Overage,
    Penalties, PricedLayout, SolveRequest,
};
use std::collections::BTreeSet;

/// Validation failure: the whole request is rejected, no partial output.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("options: {0}")]
    InvalidOptions(String),

    #[error("request contains no machines")]
    NoMachines,

    #[error("job '{0}' appears more than once")]
    DuplicateJobId(String),

    #[error("job '{job_id}': {reason}")]
    InvalidJob { job_id: String, reason: String },

    #[error("machine '{machine_id}': {reason}")]
    InvalidMachine { machine_id: String, reason: String },
}

/// Builds a validated domain request out of the parsed wire object.
pub fn request_from_dto(dto: InputDto) -> Result<SolveRequest, InputError> {
    if dto.options.timeout_seconds == 0 {
        return Err(InputError::InvalidOptions(
            "timeoutSeconds must be at least 1".to_string(),
        ));
    }
    if dto.options.number_of_solutions == 0 {
        return Err(InputError::InvalidOptions(
            "numberOfSolutions must be at least 1".to_string(),
        ));
    }
    let penalties = &dto.options.penalties;
    for (name, value) in [
        ("differentPressSheetPenalty", penalties.different_press_sheet_penalty),
        ("differentFactorySheetPenalty", penalties.different_factory_sheet_penalty),
        ("differentMachinePenalty", penalties.different_machine_penalty),
    ] {
        if value > 100 {
            return Err(InputError::InvalidOptions(format!(
                "{name} must be a percentage in 0..=100, got {value}"
            )));
        }
    }
    if !(dto.common_details.dollar_rate > 0.0) {
        return Err(InputError::InvalidOptions(
            "dollarRate must be positive".to_string(),
        ));
    }
    if dto.machines.is_empty() {
        return Err(InputError::NoMachines);
    }

    let machines = dto
        .machines
        .into_iter()
        .map(machine_from_dto)
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen_ids = BTreeSet::new();
    let mut jobs = Vec::with_capacity(dto.jobs.len());
    for job_dto in dto.jobs {
        if !seen_ids.insert(job_dto.id.clone()) {
            return Err(InputError::DuplicateJobId(job_dto.id));
        }
        jobs.push(job_from_dto(job_dto)?);
    }

    let cuts = CutCatalog::new(
        dto.available_cuts
            .into_iter()
            .map(|AvailableCutDto { for_paper_size, sheet_sizes }| CutMap {
                for_paper_size,
                sheet_sizes,
            })
            .collect(),
    );

    Ok(SolveRequest {
        options: Options {
            timeout_seconds: dto.options.timeout_seconds,
            number_of_solutions: dto.options.number_of_solutions,
            penalties: Penalties {
                different_press_sheet: penalties.different_press_sheet_penalty,
                different_factory_sheet: penalties.different_factory_sheet_penalty,
                different_machine: penalties.different_machine_penalty,
            },
        },
        dollar_rate: dto.common_details.dollar_rate,
        jobs,
        machines,
        cuts,
    })
}

fn job_from_dto(dto: super::dto::JobDto) -> Result<Job, InputError> {
    let invalid = |reason: &str| InputError::InvalidJob {
        job_id: dto.id.clone(),
        reason: reason.to_string(),
    };

    if dto.id.is_empty() {
        return Err(InputError::InvalidJob {
            job_id: "<empty>".to_string(),
            reason: "id must not be empty".to_string(),
        });
    }
    if dto.width == 0 || dto.length == 0 {
        return Err(invalid("width and length must be at least 1 mm"));
    }
    if dto.quantity == 0 {
        return Err(invalid("quantity must be at least 1"));
    }
    if dto.material.grammage == 0 {
        return Err(invalid("material grammage must be at least 1"));
    }
    if dto.material.factory_sizes.is_empty() {
        return Err(invalid("material has no factory sizes"));
    }
    for fs in &dto.material.factory_sizes {
        if fs.width == 0 || fs.length == 0 {
            return Err(invalid("material factory size has a zero dimension"));
        }
    }

    Ok(Job {
        id: dto.id,
        width: dto.width,
        length: dto.length,
        quantity: dto.quantity,
        rotatable: dto.rotatable,
        material: material_from_dto(dto.material),
        front_inks: dto.front_inks,
        back_inks: dto.back_inks,
        is_duplex: dto.is_duplex,
        same_plates_for_back: dto.same_plates_for_back,
    })
}

fn material_from_dto(dto: MaterialDto) -> Material {
    Material {
        id: dto.id,
        name: dto.name,
        grammage: dto.grammage,
        is_special: dto.is_special,
        factory_sizes: dto
            .factory_sizes
            .into_iter()
            .map(|fs| FactorySize {
                size: crate::domain::Size::new(fs.width, fs.length),
                usd_per_ton: fs.usd_per_ton,
            })
            .collect(),
    }
}

fn machine_from_dto(dto: MachineDto) -> Result<Machine, InputError> {
    let invalid = |reason: &str| InputError::InvalidMachine {
        machine_id: dto.id.clone(),
        reason: reason.to_string(),
    };

    if dto.max_sheet_size.width == 0 || dto.max_sheet_size.length == 0 {
        return Err(invalid("maxSheetSize must have positive dimensions"));
    }
    for (name, price) in [
        ("setupCost", dto.setup_cost.price),
        ("washCost", dto.wash_cost.price),
        ("impressionCost", dto.impression_cost.price_per_thousand),
    ] {
        if price < 0.0 {
            return Err(invalid(&format!("{name} price must not be negative")));
        }
    }

    Ok(Machine {
        id: dto.id,
        name: dto.name,
        printing_bodies: dto.printing_bodies,
        max_sheet_size: dto.max_sheet_size,
        overage: Overage {
            amount: dto.overage.amount,
            per_ink: dto.overage.per_ink,
        },
        min_impressions_charge: dto.min_impressions_charge,
        setup_cost: cost_info_from_dto(&dto.setup_cost),
        wash_cost: cost_info_from_dto(&dto.wash_cost),
        impression_cost: CostInfo {
            price: dto.impression_cost.price_per_thousand,
            per_ink: dto.impression_cost.per_ink,
            per_ink_pass: dto.impression_cost.per_ink_pass,
        },
    })
}

fn cost_info_from_dto(dto: &CostInfoDto) -> CostInfo {
    CostInfo {
        price: dto.price,
        per_ink: dto.per_ink,
        per_ink_pass: dto.per_ink_pass,
    }
}

/// Money leaves the system rounded to cents.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats the solve outcome as the wire response.
pub fn output_from_outcome(outcome: &SolveOutcome) -> OutputDto {
    OutputDto {
        summary: SummaryOut {
            baseline_total_cost: round2(outcome.baseline.total_cost),
        },
        baseline_solution: BaselineSolutionOut {
            total_cost: round2(outcome.baseline.total_cost),
            layouts: outcome
                .baseline
                .layouts
                .iter()
                .map(|layout| (layout.layout_id.clone(), layout_out(layout)))
                .collect(),
        },
        ganged_solutions: outcome
            .ganged
            .iter()
            .map(|solution| GangedSolutionOut {
                summary: GangedSummaryOut {
                    ganged_total_cost: solution.cost_cents as f64 / 100.0,
                },
                production_plan: solution
                    .production_plan
                    .iter()
                    .map(|item| PlanItemOut {
                        id: item.layout_id.clone(),
                        sheets: item.sheets,
                        cost_for_this_plan_item: round2(item.cost),
                    })
                    .collect(),
                layouts: solution
                    .layouts
                    .iter()
                    .map(|(id, layout)| (id.clone(), layout_out(layout)))
                    .collect(),
            })
            .collect(),
    }
}

fn layout_out(layout: &PricedLayout) -> LayoutOut {
    LayoutOut {
        layout_id: layout.layout_id.clone(),
        sheets_to_print: layout.net_sheets,
        machine: MachineRefOut {
            id: layout.machine_id.clone(),
            name: layout.machine_name.clone(),
        },
        printing_sheet: layout.printing_sheet,
        cost_breakdown: CostBreakdownOut {
            material_cost: round2(layout.breakdown.material_cost),
            printing_cost: PrintingCostOut {
                setup_cost: round2(layout.breakdown.printing_cost.setup_cost),
                wash_cost: round2(layout.breakdown.printing_cost.wash_cost),
                impression_cost: round2(layout.breakdown.printing_cost.impression_cost),
                total_printing_cost: round2(layout.breakdown.printing_cost.total),
            },
        },
        material_needs: MaterialNeedsOut {
            total_material_cost: round2(layout.material_needs.total_material_cost),
            factory_sheets: FactorySheetsOut {
                size: FactorySizeOut {
                    width: layout.material_needs.factory_size.size.width,
                    length: layout.material_needs.factory_size.size.length,
                    usd_per_ton: layout.material_needs.factory_size.usd_per_ton,
                },
                quantity_needed: layout.material_needs.quantity_needed,
                cutting_plan: layout.material_needs.cutting_plan.clone(),
            },
        },
        print_needs: PrintNeedsOut {
            technique: layout.print_needs.technique,
            total_plates: layout.print_needs.total_plates,
            passes: layout.print_needs.passes,
        },
        jobs_in_layout: layout
            .jobs_in_layout
            .iter()
            .map(|(id, &count)| JobInLayoutOut {
                id: id.clone(),
                quantity_per_sheet: count,
            })
            .collect(),
        placements: layout
            .placements
            .iter()
            .map(|p| PlacementOut {
                id: p.job_id.clone(),
                x: p.x,
                y: p.y,
                width: p.width,
                length: p.length,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Size;

    fn sample_input() -> serde_json::Value {
        serde_json::json!({
            "options": {
                "timeoutSeconds": 30,
                "numberOfSolutions": 2,
                "penalties": {
                    "differentPressSheetPenalty": 5,
                    "differentFactorySheetPenalty": 0,
                    "differentMachinePenalty": 10
                }
            },
            "commonDetails": { "dollarRate": 1.0 },
            "jobs": [
                {
                    "id": "card-a",
                    "width": 100,
                    "length": 150,
                    "quantity": 1000,
                    "rotatable": false,
                    "material": {
                        "id": 1,
                        "name": "Coated 300",
                        "grammage": 300,
                        "isSpecialMaterial": false,
                        "factorySizes": [
                            { "width": 720, "length": 1020, "usdPerTon": 800.0 }
                        ]
                    },
                    "frontInks": 1,
                    "backInks": 0,
                    "isDuplex": false,
                    "samePlatesForBack": false
                }
            ],
            "machines": [
                {
                    "id": "m1",
                    "name": "Press 1",
                    "printingBodies": 4,
                    "maxSheetSize": { "width": 720, "length": 1020 },
                    "overage": { "amount": 50, "perInk": false },
                    "minImpressionsCharge": 500,
                    "setupCost": { "price": 30.0, "perInk": false },
                    "washCost": { "price": 10.0, "perInk": false },
                    "impressionCost": { "pricePerThousand": 20.0 }
                }
            ],
            "availableCuts": [
                {
                    "forPaperSize": { "width": 720, "length": 1020 },
                    "sheetSizes": [ { "width": 720, "length": 1020 } ]
                }
            ]
        })
    }

    #[test]
    fn parses_and_maps_a_full_request() {
        let dto: InputDto = serde_json::from_value(sample_input()).unwrap();
        let request = request_from_dto(dto).unwrap();

        assert_eq!(request.options.number_of_solutions, 2);
        assert_eq!(request.options.penalties.different_machine, 10);
        assert_eq!(request.jobs.len(), 1);
        assert_eq!(request.jobs[0].material.grammage, 300);
        assert_eq!(request.machines[0].impression_cost.price, 20.0);
        assert_eq!(
            request.cuts.cuts_for(&Size::new(1020, 720)),
            &[Size::new(720, 1020)]
        );
    }

    #[test]
    fn rejects_zero_quantity() {
        let mut input = sample_input();
        input["jobs"][0]["quantity"] = serde_json::json!(0);
        let dto: InputDto = serde_json::from_value(input).unwrap();
        assert!(matches!(
            request_from_dto(dto),
            Err(InputError::InvalidJob { .. })
        ));
    }

    #[test]
    fn rejects_negative_dimensions_at_parse_time() {
        let mut input = sample_input();
        input["jobs"][0]["width"] = serde_json::json!(-5);
        assert!(serde_json::from_value::<InputDto>(input).is_err());
    }

    #[test]
    fn rejects_duplicate_job_ids() {
        let mut input = sample_input();
        let job = input["jobs"][0].clone();
        input["jobs"].as_array_mut().unwrap().push(job);
        let dto: InputDto = serde_json::from_value(input).unwrap();
        assert!(matches!(
            request_from_dto(dto),
            Err(InputError::DuplicateJobId(id)) if id == "card-a"
        ));
    }

    #[test]
    fn rejects_out_of_range_penalty() {
        let mut input = sample_input();
        input["options"]["penalties"]["differentMachinePenalty"] = serde_json::json!(150);
        let dto: InputDto = serde_json::from_value(input).unwrap();
        assert!(matches!(
            request_from_dto(dto),
            Err(InputError::InvalidOptions(_))
        ));
    }

    #[test]
    fn rejects_missing_machines() {
        let mut input = sample_input();
        input["machines"] = serde_json::json!([]);
        let dto: InputDto = serde_json::from_value(input).unwrap();
        assert!(matches!(request_from_dto(dto), Err(InputError::NoMachines)));
    }

    #[test]
    fn number_of_solutions_defaults_to_one() {
        let mut input = sample_input();
        input["options"].as_object_mut().unwrap().remove("numberOfSolutions");
        let dto: InputDto = serde_json::from_value(input).unwrap();
        let request = request_from_dto(dto).unwrap();
        assert_eq!(request.options.number_of_solutions, 1);
    }
}
