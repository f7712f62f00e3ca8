//! Placement cost functions.
//!
//! Evaluates the quality of a placement as a weighted sum of total
//! half-perimeter wirelength (HPWL), pairwise overlap area, and binned
//! density variance. All functions are pure over a placement snapshot and
//! never consult the occupancy grid, so they remain correct while the
//! annealer lets cells overlap.

use crate::data::{Net, Placement};

/// Number of density bins along each axis.
const NUM_BINS: i32 = 10;

/// Weights for the placement cost function components.
#[derive(Debug, Clone)]
pub struct CostModel {
    /// Weight for the pairwise overlap area component.
    pub lambda_overlap: f64,
    /// Weight for the density variance component.
    pub lambda_density: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            lambda_overlap: 1.0,
            lambda_density: 0.1,
        }
    }
}

impl CostModel {
    /// Computes the total placement cost:
    /// `HPWL + λ_overlap · overlap + λ_density · density`.
    pub fn total_cost(&self, pl: &Placement) -> f64 {
        total_hpwl(pl)
            + self.lambda_overlap * overlap_penalty(pl)
            + self.lambda_density * density_penalty(pl)
    }
}

/// Returns the absolute position of a pin.
///
/// A pin referring to an unknown cell contributes `(0, 0)`.
fn pin_position(pl: &Placement, pin: &crate::data::Pin) -> (i32, i32) {
    match pl.find_cell(pin.cell_id) {
        Some(cell) => (cell.x + pin.offset_x, cell.y + pin.offset_y),
        None => (0, 0),
    }
}

/// Computes the half-perimeter wirelength of a single net.
///
/// HPWL is the semi-perimeter of the axis-aligned bounding box of the
/// net's pin positions. Empty nets and single-pin nets yield 0.
pub fn net_hpwl(pl: &Placement, net: &Net) -> f64 {
    let mut pins = net.pins.iter();
    let Some(first) = pins.next() else {
        return 0.0;
    };

    let (x0, y0) = pin_position(pl, first);
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (x0, x0, y0, y0);
    for pin in pins {
        let (x, y) = pin_position(pl, pin);
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    ((max_x - min_x) + (max_y - min_y)) as f64
}

/// Computes the total half-perimeter wirelength across all nets.
///
/// HPWL is the standard placement metric; minimizing it tends to produce
/// short, routable interconnect.
pub fn total_hpwl(pl: &Placement) -> f64 {
    pl.nets.iter().map(|net| net_hpwl(pl, net)).sum()
}

/// Computes the overlap penalty: the sum over all unordered cell pairs of
/// the area of intersection of their rectangles.
///
/// O(n²) in the cell count, which is acceptable at this engine's target
/// scale.
pub fn overlap_penalty(pl: &Placement) -> f64 {
    let mut penalty = 0i64;
    for i in 0..pl.cells.len() {
        let a = pl.cells[i].rect();
        for b in &pl.cells[i + 1..] {
            penalty += a.intersection_area(&b.rect());
        }
    }
    penalty as f64
}

/// Computes the density penalty: the population variance of cell area
/// across a fixed 10×10 binning of the grid.
///
/// Each cell contributes its full area to the bin containing its
/// lower-left corner; cells past the coarse range clamp into the last
/// bin. Returns 0 for a zero-area grid.
pub fn density_penalty(pl: &Placement) -> f64 {
    if pl.grid.width == 0 || pl.grid.height == 0 {
        return 0.0;
    }

    let bin_w = pl.grid.width / NUM_BINS;
    let bin_h = pl.grid.height / NUM_BINS;

    let mut bins = [[0i64; NUM_BINS as usize]; NUM_BINS as usize];
    for cell in &pl.cells {
        let bx = bin_index(cell.x, bin_w);
        let by = bin_index(cell.y, bin_h);
        bins[by][bx] += cell.rect().area();
    }

    let count = (NUM_BINS * NUM_BINS) as f64;
    let total: i64 = bins.iter().flatten().sum();
    let mean = total as f64 / count;

    let variance: f64 = bins
        .iter()
        .flatten()
        .map(|&b| {
            let diff = b as f64 - mean;
            diff * diff
        })
        .sum();
    variance / count
}

/// Maps a coordinate to its bin index, clamping into the last bin.
///
/// A zero bin extent (grid smaller than the bin count) degenerates to the
/// last bin, the same clamping the in-range formula applies.
fn bin_index(coord: i32, bin_extent: i32) -> usize {
    if bin_extent <= 0 {
        return (NUM_BINS - 1) as usize;
    }
    (coord / bin_extent).clamp(0, NUM_BINS - 1) as usize
}
