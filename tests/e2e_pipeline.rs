// End-to-end scenarios through the public pipeline: parse -> validate ->
// optimize -> format. These need a MILP backend, so they are only built when
// the HiGHS feature (the default) is enabled.

#![cfg(feature = "highs")]

use gangplan::application::dto::InputDto;
use gangplan::application::mappers;
use gangplan::{GangingOptimizer, OptimizeError, SolveRequest};
use serde_json::json;

fn parse(input: serde_json::Value) -> SolveRequest {
    let dto: InputDto = serde_json::from_value(input).expect("input parses");
    mappers::request_from_dto(dto).expect("input validates")
}

fn machine(id: &str, setup: f64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Press {id}"),
        "printingBodies": 4,
        "maxSheetSize": { "width": 720, "length": 1020 },
        "overage": { "amount": 0, "perInk": false },
        "minImpressionsCharge": null,
        "setupCost": { "price": setup, "perInk": false },
        "washCost": { "price": 50.0, "perInk": false },
        "impressionCost": { "pricePerThousand": 20.0 }
    })
}

fn coated_300() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "Coated 300",
        "grammage": 300,
        "isSpecial": false,
        "factorySizes": [ { "width": 720, "length": 1020, "usdPerTon": 800.0 } ]
    })
}

fn job(id: &str, width: u32, length: u32, quantity: u64) -> serde_json::Value {
    json!({
        "id": id,
        "width": width,
        "length": length,
        "quantity": quantity,
        "rotatable": false,
        "material": coated_300(),
        "frontInks": 1,
        "backInks": 0,
        "isDuplex": false,
        "samePlatesForBack": false
    })
}

fn two_job_input(penalties: serde_json::Value, number_of_solutions: u32) -> serde_json::Value {
    json!({
        "options": {
            "timeoutSeconds": 60,
            "numberOfSolutions": number_of_solutions,
            "penalties": penalties
        },
        "commonDetails": { "dollarRate": 1.0 },
        "jobs": [ job("a", 100, 150, 500), job("b", 150, 200, 500) ],
        "machines": [ machine("m1", 100.0), machine("m2", 120.0) ],
        "availableCuts": [
            {
                "forPaperSize": { "width": 720, "length": 1020 },
                "sheetSizes": [ { "width": 720, "length": 1020 } ]
            }
        ]
    })
}

fn zero_penalties() -> serde_json::Value {
    json!({
        "differentPressSheetPenalty": 0,
        "differentFactorySheetPenalty": 0,
        "differentMachinePenalty": 0
    })
}

// E1: a single job; known baseline numbers, no ganging possible.
#[test]
fn single_job_baseline_matches_hand_computation() {
    let input = json!({
        "options": { "timeoutSeconds": 60, "numberOfSolutions": 1, "penalties": zero_penalties() },
        "commonDetails": { "dollarRate": 1.0 },
        "jobs": [ job("card", 100, 150, 1000) ],
        "machines": [ {
            "id": "m1",
            "name": "Press m1",
            "printingBodies": 4,
            "maxSheetSize": { "width": 720, "length": 1020 },
            "overage": { "amount": 50, "perInk": false },
            "minImpressionsCharge": 500,
            "setupCost": { "price": 30.0, "perInk": false },
            "washCost": { "price": 10.0, "perInk": false },
            "impressionCost": { "pricePerThousand": 20.0 }
        } ],
        "availableCuts": [ {
            "forPaperSize": { "width": 720, "length": 1020 },
            "sheetSizes": [ { "width": 720, "length": 1020 } ]
        } ]
    });
    let request = parse(input);
    let outcome = GangingOptimizer::new().optimize(&request).unwrap();

    assert!(outcome.ganged.is_empty());
    let layout = &outcome.baseline.layouts[0];
    assert_eq!(layout.layout_id, "base_card");
    assert_eq!(layout.jobs_in_layout["card"], 42);
    assert_eq!(layout.net_sheets, 24);
    // Printing: 30 setup + 10 wash + (500/1000)*20 = 50.
    assert!((layout.breakdown.printing_cost.total - 50.0).abs() < 1e-9);
    // Material: 24 + 50 overage = 74 factory sheets.
    assert_eq!(layout.material_needs.quantity_needed, 74);
    let per_sheet = 0.72 * 1.02 * 300.0 / 1000.0 / 1000.0 * 800.0;
    let expected = 50.0 + 74.0 * per_sheet;
    assert!((outcome.baseline.total_cost - expected).abs() < 1e-9);

    let output = mappers::output_from_outcome(&outcome);
    let rendered = serde_json::to_value(&output).unwrap();
    assert_eq!(rendered["summary"]["baselineTotalCost"], json!(63.04));
    assert_eq!(rendered["baselineSolution"]["total_cost"], json!(63.04));
    assert_eq!(
        rendered["baselineSolution"]["layouts"]["base_card"]["sheetsToPrint"],
        json!(24)
    );
    assert_eq!(rendered["gangedSolutions"], json!([]));
}

// E2: two jobs of the same material; ganging amortizes the setup and beats
// the baseline.
#[test]
fn ganging_beats_the_baseline_when_setup_dominates() {
    let request = parse(two_job_input(zero_penalties(), 1));
    let outcome = GangingOptimizer::new().optimize(&request).unwrap();

    assert_eq!(outcome.ganged.len(), 1);
    let best = &outcome.ganged[0];
    assert!((best.cost_cents as f64 / 100.0) < outcome.baseline.total_cost);

    // Demand is covered by what the selected layouts produce.
    for job in &request.jobs {
        let produced: u64 = best
            .layouts
            .values()
            .map(|layout| layout.produced(&job.id))
            .sum();
        assert!(produced >= job.quantity, "job {} underproduced", job.id);
    }

    // Every placement stays inside its sheet, pairwise disjoint.
    for layout in best.layouts.values() {
        for p in &layout.placements {
            assert!(p.x + p.width <= layout.printing_sheet.width);
            assert!(p.y + p.length <= layout.printing_sheet.length);
        }
        for (i, p) in layout.placements.iter().enumerate() {
            for q in layout.placements.iter().skip(i + 1) {
                let overlap = p.x < q.x + q.width
                    && q.x < p.x + p.width
                    && p.y < q.y + q.length
                    && q.y < p.y + p.length;
                assert!(!overlap);
            }
        }
    }
}

// E3: duplex doubles the impression charge and counts both plate sets.
#[test]
fn duplex_needs_show_up_in_the_baseline_layout() {
    let mut duplex_job = job("dup", 100, 150, 1000);
    duplex_job["frontInks"] = json!(2);
    duplex_job["backInks"] = json!(2);
    duplex_job["isDuplex"] = json!(true);
    let input = json!({
        "options": { "timeoutSeconds": 60, "numberOfSolutions": 1, "penalties": zero_penalties() },
        "commonDetails": { "dollarRate": 1.0 },
        "jobs": [ duplex_job ],
        "machines": [ {
            "id": "m1",
            "name": "Press m1",
            "printingBodies": 4,
            "maxSheetSize": { "width": 720, "length": 1020 },
            "overage": { "amount": 50, "perInk": false },
            "minImpressionsCharge": 500,
            "setupCost": { "price": 30.0, "perInk": false },
            "washCost": { "price": 10.0, "perInk": false },
            "impressionCost": { "pricePerThousand": 20.0 }
        } ],
        "availableCuts": [ {
            "forPaperSize": { "width": 720, "length": 1020 },
            "sheetSizes": [ { "width": 720, "length": 1020 } ]
        } ]
    });
    let request = parse(input);
    let outcome = GangingOptimizer::new().optimize(&request).unwrap();

    let layout = &outcome.baseline.layouts[0];
    assert_eq!(layout.print_needs.total_plates, 4);
    assert_eq!(layout.print_needs.passes, 2);
    // Twice the simplex impression charge of the E1 scenario.
    assert!((layout.breakdown.printing_cost.impression_cost - 20.0).abs() < 1e-9);
}

// E4: a job that exceeds every printing sheet is a hard error.
#[test]
fn oversized_job_is_a_hard_error() {
    let input = json!({
        "options": { "timeoutSeconds": 60, "numberOfSolutions": 1, "penalties": zero_penalties() },
        "commonDetails": { "dollarRate": 1.0 },
        "jobs": [ job("huge", 800, 800, 10) ],
        "machines": [ machine("m1", 100.0) ],
        "availableCuts": [ {
            "forPaperSize": { "width": 720, "length": 1020 },
            "sheetSizes": [ { "width": 720, "length": 1020 } ]
        } ]
    });
    let request = parse(input);
    let err = GangingOptimizer::new().optimize(&request).unwrap_err();
    assert!(matches!(
        err,
        OptimizeError::JobCannotBePlaced { job_id } if job_id == "huge"
    ));
}

// E5: top-K returns strictly increasing costs, all below the baseline, and
// never more than requested.
#[test]
fn top_k_solutions_are_ascending_and_beat_baseline() {
    let request = parse(two_job_input(zero_penalties(), 3));
    let outcome = GangingOptimizer::new().optimize(&request).unwrap();

    assert!(!outcome.ganged.is_empty());
    assert!(outcome.ganged.len() <= 3);
    for pair in outcome.ganged.windows(2) {
        assert!(pair[0].cost_cents < pair[1].cost_cents);
    }
    for solution in &outcome.ganged {
        assert!(solution.cost_cents < outcome.baseline.total_cents);
    }
    // The same packing priced on the pricier second press is the runner-up.
    assert_eq!(outcome.ganged.len(), 2);
    assert!(outcome.ganged[0].production_plan[0].layout_id.ends_with("_m1"));
    assert!(outcome.ganged[1].production_plan[0].layout_id.ends_with("_m2"));
}

#[test]
fn number_of_solutions_one_returns_at_most_one_plan() {
    let request = parse(two_job_input(zero_penalties(), 1));
    let outcome = GangingOptimizer::new().optimize(&request).unwrap();
    assert!(outcome.ganged.len() <= 1);
}

// Invariant 4: penalties never change the baseline.
#[test]
fn baseline_is_independent_of_penalties() {
    let plain = GangingOptimizer::new()
        .optimize(&parse(two_job_input(zero_penalties(), 1)))
        .unwrap();
    let penalized = GangingOptimizer::new()
        .optimize(&parse(two_job_input(
            json!({
                "differentPressSheetPenalty": 30,
                "differentFactorySheetPenalty": 20,
                "differentMachinePenalty": 40
            }),
            1,
        )))
        .unwrap();

    assert_eq!(plain.baseline.total_cents, penalized.baseline.total_cents);
    assert_eq!(
        plain.baseline.layouts.len(),
        penalized.baseline.layouts.len()
    );
}

// Invariant 6: zero penalties never report a worse best plan than positive
// penalties on the same input.
#[test]
fn zero_penalties_are_never_worse() {
    let plain = GangingOptimizer::new()
        .optimize(&parse(two_job_input(zero_penalties(), 1)))
        .unwrap();
    let penalized = GangingOptimizer::new()
        .optimize(&parse(two_job_input(
            json!({
                "differentPressSheetPenalty": 10,
                "differentFactorySheetPenalty": 10,
                "differentMachinePenalty": 10
            }),
            1,
        )))
        .unwrap();

    if let (Some(a), Some(b)) = (plain.ganged.first(), penalized.ganged.first()) {
        assert!(a.cost_cents <= b.cost_cents);
    }
}

// Same input, ample budget: byte-identical output.
#[test]
fn repeated_runs_render_identically() {
    let request = parse(two_job_input(zero_penalties(), 2));
    let optimizer = GangingOptimizer::new();

    let first = serde_json::to_string(&mappers::output_from_outcome(
        &optimizer.optimize(&request).unwrap(),
    ))
    .unwrap();
    let second = serde_json::to_string(&mappers::output_from_outcome(
        &optimizer.optimize(&request).unwrap(),
    ))
    .unwrap();
    assert_eq!(first, second);
}

// Permuting the jobs array does not change the economics of the result.
#[test]
fn job_order_does_not_change_costs() {
    let mut swapped = two_job_input(zero_penalties(), 2);
    swapped["jobs"].as_array_mut().unwrap().reverse();

    let forward = GangingOptimizer::new()
        .optimize(&parse(two_job_input(zero_penalties(), 2)))
        .unwrap();
    let backward = GangingOptimizer::new().optimize(&parse(swapped)).unwrap();

    assert_eq!(forward.baseline.total_cents, backward.baseline.total_cents);
    assert_eq!(forward.ganged.len(), backward.ganged.len());
    for (a, b) in forward.ganged.iter().zip(&backward.ganged) {
        assert_eq!(a.cost_cents, b.cost_cents);
    }
}

// Two identical jobs: ganging can only match or beat printing them apart.
#[test]
fn identical_jobs_never_lose_to_baseline() {
    let input = json!({
        "options": { "timeoutSeconds": 60, "numberOfSolutions": 1, "penalties": zero_penalties() },
        "commonDetails": { "dollarRate": 1.0 },
        "jobs": [ job("a", 100, 150, 500), job("b", 100, 150, 500) ],
        "machines": [ machine("m1", 100.0) ],
        "availableCuts": [ {
            "forPaperSize": { "width": 720, "length": 1020 },
            "sheetSizes": [ { "width": 720, "length": 1020 } ]
        } ]
    });
    let request = parse(input);
    let outcome = GangingOptimizer::new().optimize(&request).unwrap();
    if let Some(best) = outcome.ganged.first() {
        assert!(best.cost_cents < outcome.baseline.total_cents);
    }
}
