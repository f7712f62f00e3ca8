//! Legalization: projects an annealed, possibly-overlapping placement onto
//! the manifold of overlap-free placements.
//!
//! Movable cells are reinserted one at a time, largest first, each snapped
//! to the nearest conflict-free position found by a spiral perimeter scan
//! around its current location. A cell with no free position within the
//! search radius stays where it is and a warning is reported; the pipeline
//! continues with that cell possibly still overlapping.

use crate::data::{Cell, Grid, Placement};
use mosaic_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// Removes overlaps by snapping movable cells to free grid positions.
///
/// Returns the number of cells successfully legalized.
pub fn legalize(pl: &mut Placement, sink: &DiagnosticSink) -> usize {
    // Larger cells first; equal areas keep their original order.
    let mut order = pl.movable_indices();
    order.sort_by_key(|&i| std::cmp::Reverse(pl.cells[i].rect().area()));

    pl.refresh_grid();

    let mut legalized = 0;
    for &i in &order {
        let id = pl.cells[i].id;
        pl.grid.clear_cell(id);

        if let Some((x, y)) = find_free_position(&pl.grid, &pl.cells[i]) {
            pl.cells[i].x = x;
            pl.cells[i].y = y;
            legalized += 1;
        } else {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Legalize, 101),
                    format!("could not legalize cell {id}"),
                )
                .with_note("no conflict-free position within the search radius")
                .with_note("the cell keeps its current position and may overlap"),
            );
        }

        let cell = &pl.cells[i];
        pl.grid.fill(cell.rect(), cell.id);
    }

    legalized
}

/// Returns `true` if `cell` can sit at `(x, y)`: the footprint is fully
/// in-bounds and every covered position is empty or already carries the
/// cell's own id.
fn can_place(grid: &Grid, cell: &Cell, x: i32, y: i32) -> bool {
    if !mosaic_common::Rect::new(x, y, cell.w, cell.h).fits_within(grid.width, grid.height) {
        return false;
    }
    for dy in 0..cell.h {
        for dx in 0..cell.w {
            if let Some(occupant) = grid.occupant(x + dx, y + dy) {
                if occupant != cell.id {
                    return false;
                }
            }
        }
    }
    true
}

/// Searches for the nearest free position for `cell`, spiraling outwards
/// from its current location.
///
/// Tries the current position first, then every offset on the square
/// perimeter at Chebyshev radius 1, 2, … up to `max(W, H) − 1`, scanning
/// each perimeter bottom-to-top and left-to-right.
fn find_free_position(grid: &Grid, cell: &Cell) -> Option<(i32, i32)> {
    if can_place(grid, cell, cell.x, cell.y) {
        return Some((cell.x, cell.y));
    }

    let max_radius = grid.width.max(grid.height);
    for radius in 1..max_radius {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let x = cell.x + dx;
                let y = cell.y + dy;
                if can_place(grid, cell, x, y) {
                    return Some((x, y));
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;
    use crate::ids::CellId;
    use crate::placement::overlap_penalty;

    #[test]
    fn already_legal_placement_is_untouched() {
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::new(CellId::from_raw(0), 0, 0, 2, 2));
        pl.add_cell(Cell::new(CellId::from_raw(1), 5, 5, 2, 2));
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        let count = legalize(&mut pl, &sink);

        assert_eq!(count, 2);
        assert_eq!((pl.cells[0].x, pl.cells[0].y), (0, 0));
        assert_eq!((pl.cells[1].x, pl.cells[1].y), (5, 5));
        assert!(!sink.has_warnings());
    }

    #[test]
    fn overlapping_cells_are_separated() {
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::new(CellId::from_raw(0), 4, 4, 2, 2));
        pl.add_cell(Cell::new(CellId::from_raw(1), 4, 4, 2, 2));
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        let count = legalize(&mut pl, &sink);

        assert_eq!(count, 2);
        assert_eq!(overlap_penalty(&pl), 0.0);
        for cell in &pl.cells {
            assert!(cell.rect().fits_within(10, 10));
        }
    }

    #[test]
    fn larger_cells_place_first() {
        // Added in ascending area order so the largest is the last grid
        // writer; it then wins its original spot and the others spiral out.
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::new(CellId::from_raw(2), 0, 0, 1, 1));
        pl.add_cell(Cell::new(CellId::from_raw(1), 0, 0, 2, 2));
        pl.add_cell(Cell::new(CellId::from_raw(0), 0, 0, 3, 3));
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        let count = legalize(&mut pl, &sink);

        assert_eq!(count, 3);
        let big = pl.find_cell(CellId::from_raw(0)).unwrap();
        assert_eq!((big.x, big.y), (0, 0));
        assert_eq!(overlap_penalty(&pl), 0.0);

        // The smaller cells settle at minimum Chebyshev distance from
        // their original spot: radius 3 (the big cell blocks 0..2).
        let mid = pl.find_cell(CellId::from_raw(1)).unwrap();
        assert_eq!(mid.x.max(mid.y), 3);
        let small = pl.find_cell(CellId::from_raw(2)).unwrap();
        assert_eq!(small.x.max(small.y), 3);
    }

    #[test]
    fn fixed_cells_are_never_moved() {
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::fixed(CellId::from_raw(0), 4, 4, 2, 2));
        pl.add_cell(Cell::new(CellId::from_raw(1), 4, 4, 2, 2));
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        legalize(&mut pl, &sink);

        assert_eq!((pl.cells[0].x, pl.cells[0].y), (4, 4));
        assert_eq!(overlap_penalty(&pl), 0.0);
    }

    #[test]
    fn impossible_legalization_warns_and_continues() {
        // Two 3x3 cells on a 3x3 grid: no room for both.
        let mut pl = Placement::new(3, 3);
        pl.add_cell(Cell::new(CellId::from_raw(0), 0, 0, 3, 3));
        pl.add_cell(Cell::new(CellId::from_raw(1), 0, 0, 3, 3));
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        let count = legalize(&mut pl, &sink);

        assert!(count < 2);
        assert!(sink.has_warnings());
        assert!(!sink.has_errors());
    }

    #[test]
    fn grid_matches_footprints_after_legalization() {
        let mut pl = Placement::new(10, 10);
        for i in 0..5 {
            pl.add_cell(Cell::new(CellId::from_raw(i), 2, 2, 2, 2));
        }
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        legalize(&mut pl, &sink);

        let mut check = pl.clone();
        check.refresh_grid();
        assert_eq!(check.grid, pl.grid);
    }

    #[test]
    fn spiral_prefers_current_position() {
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::new(CellId::from_raw(0), 7, 3, 2, 2));
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        legalize(&mut pl, &sink);

        assert_eq!((pl.cells[0].x, pl.cells[0].y), (7, 3));
    }

    #[test]
    fn can_place_rejects_out_of_bounds() {
        let grid = Grid::new(5, 5);
        let cell = Cell::new(CellId::from_raw(0), 0, 0, 2, 2);
        assert!(can_place(&grid, &cell, 3, 3));
        assert!(!can_place(&grid, &cell, 4, 3));
        assert!(!can_place(&grid, &cell, -1, 0));
    }

    #[test]
    fn can_place_tolerates_own_footprint() {
        let mut grid = Grid::new(5, 5);
        let cell = Cell::new(CellId::from_raw(0), 1, 1, 2, 2);
        grid.fill(cell.rect(), cell.id);
        assert!(can_place(&grid, &cell, 1, 1));
        assert!(can_place(&grid, &cell, 2, 1));
    }
}
