// Maximal-rectangles bin packing with best-short-side-fit placement.
// Rotation is deliberately not attempted: ganged pieces keep the orientation
// the job was ordered in.

use super::Rect;
use crate::domain::{Placement, Size};

/// Packs every piece onto a single sheet, or reports failure.
///
/// Pieces are placed in the order given; the caller is responsible for
/// pre-sorting (descending longer side, ties by descending area). Placement
/// is deterministic: among free rectangles the one with the smallest
/// short-side leftover wins, ties broken by long-side leftover, then by
/// position (top-most, then left-most).
///
/// Returns `None` unless all pieces fit without overlap.
pub fn pack(sheet: Size, pieces: &[(&str, Size)]) -> Option<Vec<Placement>> {
    let mut free = vec![Rect {
        x: 0,
        y: 0,
        width: sheet.width,
        length: sheet.length,
    }];
    let mut placements = Vec::with_capacity(pieces.len());

    for &(job_id, size) in pieces {
        if size.width == 0 || size.length == 0 {
            return None;
        }
        let slot = best_slot(&free, size)?;
        let placed = Rect {
            x: slot.x,
            y: slot.y,
            width: size.width,
            length: size.length,
        };
        placements.push(Placement {
            job_id: job_id.to_string(),
            x: placed.x,
            y: placed.y,
            width: placed.width,
            length: placed.length,
        });
        free = carve(free, &placed);
    }

    Some(placements)
}

/// Best-short-side-fit over the free list.
fn best_slot(free: &[Rect], size: Size) -> Option<Rect> {
    let mut best: Option<(u32, u32, u32, u32, Rect)> = None;
    for rect in free {
        if size.width > rect.width || size.length > rect.length {
            continue;
        }
        let leftover_w = rect.width - size.width;
        let leftover_l = rect.length - size.length;
        let key = (
            leftover_w.min(leftover_l),
            leftover_w.max(leftover_l),
            rect.y,
            rect.x,
        );
        if best
            .as_ref()
            .map(|(a, b, c, d, _)| key < (*a, *b, *c, *d))
            .unwrap_or(true)
        {
            best = Some((key.0, key.1, key.2, key.3, *rect));
        }
    }
    best.map(|(_, _, _, _, rect)| rect)
}

/// Subtracts `placed` from every overlapping free rectangle and drops free
/// rectangles contained in another.
fn carve(free: Vec<Rect>, placed: &Rect) -> Vec<Rect> {
    let mut next = Vec::with_capacity(free.len() + 3);
    for rect in free {
        if !rect.overlaps(placed) {
            next.push(rect);
            continue;
        }
        if placed.x > rect.x {
            next.push(Rect {
                width: placed.x - rect.x,
                ..rect
            });
        }
        if placed.right() < rect.right() {
            next.push(Rect {
                x: placed.right(),
                width: rect.right() - placed.right(),
                ..rect
            });
        }
        if placed.y > rect.y {
            next.push(Rect {
                length: placed.y - rect.y,
                ..rect
            });
        }
        if placed.bottom() < rect.bottom() {
            next.push(Rect {
                y: placed.bottom(),
                length: rect.bottom() - placed.bottom(),
                ..rect
            });
        }
    }
    prune(next)
}

fn prune(rects: Vec<Rect>) -> Vec<Rect> {
    let mut kept: Vec<Rect> = Vec::with_capacity(rects.len());
    'outer: for (i, rect) in rects.iter().enumerate() {
        for (j, other) in rects.iter().enumerate() {
            if i != j && other.contains(rect) && !(rect.contains(other) && i < j) {
                continue 'outer;
            }
        }
        kept.push(*rect);
    }
    kept
}
