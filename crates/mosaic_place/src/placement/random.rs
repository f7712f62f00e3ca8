//! Random initial placement.
//!
//! Scatters every movable cell uniformly over its legal in-bounds range,
//! giving the annealer an unbiased starting point. Fixed cells are left
//! untouched.

use crate::data::Placement;
use rand::Rng;

/// Assigns each movable cell a uniform random in-bounds position and
/// refreshes the grid.
pub(crate) fn random_placement(pl: &mut Placement, rng: &mut impl Rng) {
    let width = pl.grid.width;
    let height = pl.grid.height;

    for cell in &mut pl.cells {
        if cell.fixed {
            continue;
        }
        let max_x = (width - cell.w).max(0);
        let max_y = (height - cell.h).max(0);
        cell.x = rng.gen_range(0..=max_x);
        cell.y = rng.gen_range(0..=max_y);
    }

    pl.refresh_grid();
}
