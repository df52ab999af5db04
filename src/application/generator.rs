// Phase 2: enumerate profitable multi-job packings. Jobs are grouped by
// material, every subset of a group is tried against every reachable
// printing sheet, and for each pair the count tuple with the smallest print
// run that actually packs wins.

use super::Deadline;
use crate::domain::{CutCatalog, Job, Material, Placement, Size};
use crate::geometry::pack;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Per-job cap on copies per sheet, keeping tuple enumeration tractable.
const MAX_COPIES_PER_SHEET: u64 = 30;

/// A packing that fits a set of jobs on one printing sheet. Not yet bound to
/// a machine or priced.
#[derive(Debug, Clone)]
pub struct CandidateLayout {
    pub jobs: BTreeMap<String, u64>,
    pub printing_sheet: Size,
    pub placements: Vec<Placement>,
}

/// Enumerates ganging candidates until done or the deadline expires, in
/// which case the candidates found so far are returned.
pub fn generate_candidates(
    request: &crate::domain::SolveRequest,
    deadline: &Deadline,
) -> Vec<CandidateLayout> {
    info!("phase 2: generating ganging candidates");

    let mut groups: BTreeMap<i64, Vec<&Job>> = BTreeMap::new();
    for job in &request.jobs {
        groups.entry(job.material.id).or_default().push(job);
    }

    let mut candidates = Vec::new();
    for (material_id, group) in &mut groups {
        if group.len() < 2 {
            continue;
        }
        group.sort_by(|a, b| a.id.cmp(&b.id));
        let sheets = reachable_sheets(&group[0].material, &request.cuts);
        debug!(
            material = material_id,
            jobs = group.len(),
            sheets = sheets.len(),
            "exploring material group"
        );

        for subset_size in 2..=group.len() {
            for subset_indices in Combinations::new(group.len(), subset_size) {
                let subset: Vec<&Job> = subset_indices.iter().map(|&i| group[i]).collect();
                for sheet in &sheets {
                    if deadline.expired() {
                        info!(
                            found = candidates.len(),
                            "deadline reached during candidate generation"
                        );
                        return candidates;
                    }
                    if let Some(candidate) = best_packing_for(&subset, *sheet) {
                        debug!(
                            sheet = %sheet,
                            jobs = ?candidate.jobs,
                            "candidate packed"
                        );
                        candidates.push(candidate);
                    }
                }
            }
        }
    }

    info!(found = candidates.len(), "candidate generation finished");
    candidates
}

/// Printing sheets reachable from any factory size of the material, first
/// occurrence wins.
fn reachable_sheets(material: &Material, cuts: &CutCatalog) -> Vec<Size> {
    let mut seen = HashSet::new();
    let mut sheets = Vec::new();
    for factory_size in &material.factory_sizes {
        for sheet in cuts.cuts_for(&factory_size.size) {
            if seen.insert((sheet.width, sheet.length)) {
                sheets.push(*sheet);
            }
        }
    }
    sheets
}

/// Tries count tuples for the subset on the sheet in ascending order of
/// print run (`tiraje`), returning the first one the packer accepts.
fn best_packing_for(subset: &[&Job], sheet: Size) -> Option<CandidateLayout> {
    let sheet_area = sheet.area();

    let mut max_counts = Vec::with_capacity(subset.len());
    for job in subset {
        let area = job.area();
        if area == 0 {
            return None;
        }
        let max_qty = (sheet_area / area).min(MAX_COPIES_PER_SHEET);
        if max_qty == 0 {
            return None;
        }
        max_counts.push(max_qty);
    }

    // Every tuple that passes the area filter, tagged with its run length.
    let mut tuples: Vec<(u64, Vec<u64>)> = Vec::new();
    let mut counts = vec![1u64; subset.len()];
    loop {
        let used_area: u64 = subset
            .iter()
            .zip(&counts)
            .map(|(job, &count)| job.area() * count)
            .sum();
        if used_area <= sheet_area {
            let tiraje = subset
                .iter()
                .zip(&counts)
                .map(|(job, &count)| job.quantity.div_ceil(count))
                .max()
                .unwrap_or(0);
            tuples.push((tiraje, counts.clone()));
        }
        if !advance(&mut counts, &max_counts) {
            break;
        }
    }

    // Stable sort keeps lexicographic tuple order among equal runs.
    tuples.sort_by_key(|(tiraje, _)| *tiraje);

    for (_, counts) in &tuples {
        let mut pieces: Vec<(&str, Size)> = Vec::new();
        for (job, &count) in subset.iter().zip(counts) {
            for _ in 0..count {
                pieces.push((job.id.as_str(), job.size()));
            }
        }
        pieces.sort_by(|a, b| {
            b.1.longer_side()
                .cmp(&a.1.longer_side())
                .then(b.1.area().cmp(&a.1.area()))
        });

        if let Some(placements) = pack(sheet, &pieces) {
            let jobs_in_layout = subset
                .iter()
                .zip(counts)
                .map(|(job, &count)| (job.id.clone(), count))
                .collect();
            return Some(CandidateLayout {
                jobs: jobs_in_layout,
                printing_sheet: sheet,
                placements,
            });
        }
    }

    None
}

/// Mixed-radix increment over `1..=max`, rightmost digit fastest. Returns
/// false once the whole range is exhausted.
fn advance(counts: &mut [u64], max_counts: &[u64]) -> bool {
    for i in (0..counts.len()).rev() {
        if counts[i] < max_counts[i] {
            counts[i] += 1;
            return true;
        }
        counts[i] = 1;
    }
    false
}

/// Lexicographic k-combinations of `0..n`.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - (k - i) {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(current)
    }
}
