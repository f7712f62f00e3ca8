//! Detailed placement: windowed local refinement.
//!
//! Sweeps a regular array of square windows over the grid; cells near each
//! window's center get one small random perturbation, kept only when it
//! strictly lowers the total cost. Moves onto positions occupied by other
//! cells are rejected outright, so a legal placement stays legal and the
//! stage cost is monotonically non-increasing.

use crate::data::Placement;
use crate::placement::CostModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for the detail placement stage.
#[derive(Debug, Clone)]
pub struct DetailConfig {
    /// Side length of the sweep windows.
    pub window_size: i32,
    /// Maximum number of full sweeps.
    pub max_iterations: usize,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            max_iterations: 10,
            seed: None,
        }
    }
}

/// Refines the placement with windowed greedy perturbations.
///
/// Runs up to `max_iterations` sweeps; a sweep that improves the cost by
/// less than 0.1% over its own starting cost ends the run early.
pub fn refine(pl: &mut Placement, config: &DetailConfig, weights: &CostModel) {
    let ws = config.window_size;
    if ws <= 0 {
        return;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let windows_x = (pl.grid.width + ws - 1) / ws;
    let windows_y = (pl.grid.height + ws - 1) / ws;

    for _ in 0..config.max_iterations {
        let sweep_start = weights.total_cost(pl);

        for wy in 0..windows_y {
            for wx in 0..windows_x {
                let center_x = wx * ws + ws / 2;
                let center_y = wy * ws + ws / 2;
                optimize_window(pl, center_x, center_y, ws, weights, &mut rng);
            }
        }

        let current = weights.total_cost(pl);
        if current >= sweep_start * 0.999 {
            break;
        }
    }
}

/// Attempts one local perturbation for every movable cell whose center
/// lies within Chebyshev distance `window_size` of the window center.
fn optimize_window(
    pl: &mut Placement,
    center_x: i32,
    center_y: i32,
    window_size: i32,
    weights: &CostModel,
    rng: &mut StdRng,
) {
    let members: Vec<usize> = pl
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| {
            if cell.fixed {
                return false;
            }
            let (cx, cy) = cell.center();
            (cx - center_x).abs() <= window_size && (cy - center_y).abs() <= window_size
        })
        .map(|(i, _)| i)
        .collect();

    for i in members {
        try_local_move(pl, i, window_size / 2, weights, rng);
    }
}

/// Tries one random perturbation of the cell at index `i` within the
/// given radius. Keeps the move iff it strictly lowers the total cost.
fn try_local_move(
    pl: &mut Placement,
    i: usize,
    radius: i32,
    weights: &CostModel,
    rng: &mut StdRng,
) -> bool {
    let old_x = pl.cells[i].x;
    let old_y = pl.cells[i].y;
    let old_cost = weights.total_cost(pl);

    let dx = rng.gen_range(-radius..=radius);
    let dy = rng.gen_range(-radius..=radius);

    let (w, h) = (pl.cells[i].w, pl.cells[i].h);
    let new_x = (old_x + dx).clamp(0, (pl.grid.width - w).max(0));
    let new_y = (old_y + dy).clamp(0, (pl.grid.height - h).max(0));

    // Reject moves onto positions held by another cell. Under residual
    // overlap the grid is lossy, which makes this check advisory; the
    // cost comparison below is what actually decides.
    let id = pl.cells[i].id;
    for fy in 0..h {
        for fx in 0..w {
            let gx = new_x + fx;
            let gy = new_y + fy;
            if pl.grid.is_occupied(gx, gy) && pl.grid.occupant(gx, gy) != Some(id) {
                return false;
            }
        }
    }

    pl.cells[i].x = new_x;
    pl.cells[i].y = new_y;
    pl.refresh_grid();

    let new_cost = weights.total_cost(pl);
    if new_cost < old_cost {
        true
    } else {
        pl.cells[i].x = old_x;
        pl.cells[i].y = old_y;
        pl.refresh_grid();
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cell, Net, Pin};
    use crate::ids::{CellId, NetId};
    use crate::placement::{overlap_penalty, total_hpwl};

    fn connected_pair() -> Placement {
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::new(CellId::from_raw(0), 0, 0, 2, 2));
        pl.add_cell(Cell::new(CellId::from_raw(1), 8, 8, 2, 2));
        pl.add_net(Net::new(
            NetId::from_raw(0),
            vec![
                Pin::new(CellId::from_raw(0), 0, 0),
                Pin::new(CellId::from_raw(1), 0, 0),
            ],
        ));
        pl.refresh_grid();
        pl
    }

    #[test]
    fn refinement_never_increases_cost() {
        let weights = CostModel::default();
        let mut pl = connected_pair();
        let before = weights.total_cost(&pl);

        let config = DetailConfig {
            seed: Some(21),
            ..DetailConfig::default()
        };
        refine(&mut pl, &config, &weights);

        assert!(weights.total_cost(&pl) <= before);
    }

    #[test]
    fn refinement_preserves_legality() {
        let weights = CostModel::default();
        let mut pl = connected_pair();

        let config = DetailConfig {
            seed: Some(22),
            max_iterations: 20,
            ..DetailConfig::default()
        };
        refine(&mut pl, &config, &weights);

        assert_eq!(overlap_penalty(&pl), 0.0);
        for cell in &pl.cells {
            assert!(cell.rect().fits_within(10, 10));
        }
    }

    #[test]
    fn refinement_preserves_fixed_cells() {
        let weights = CostModel::default();
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::fixed(CellId::from_raw(0), 4, 4, 2, 2));
        pl.add_cell(Cell::new(CellId::from_raw(1), 0, 0, 2, 2));
        pl.add_net(Net::new(
            NetId::from_raw(0),
            vec![
                Pin::new(CellId::from_raw(0), 0, 0),
                Pin::new(CellId::from_raw(1), 0, 0),
            ],
        ));
        pl.refresh_grid();

        let config = DetailConfig {
            seed: Some(23),
            ..DetailConfig::default()
        };
        refine(&mut pl, &config, &weights);

        assert_eq!((pl.cells[0].x, pl.cells[0].y), (4, 4));
    }

    #[test]
    fn grid_consistent_after_refinement() {
        let weights = CostModel::default();
        let mut pl = connected_pair();

        let config = DetailConfig {
            seed: Some(24),
            ..DetailConfig::default()
        };
        refine(&mut pl, &config, &weights);

        let mut check = pl.clone();
        check.refresh_grid();
        assert_eq!(check.grid, pl.grid);
    }

    #[test]
    fn zero_size_grid_is_a_no_op() {
        let weights = CostModel::default();
        let mut pl = Placement::new(0, 0);
        pl.add_cell(Cell::new(CellId::from_raw(0), 0, 0, 1, 1));
        pl.refresh_grid();

        let config = DetailConfig {
            seed: Some(25),
            ..DetailConfig::default()
        };
        refine(&mut pl, &config, &weights);
        assert_eq!((pl.cells[0].x, pl.cells[0].y), (0, 0));
    }

    #[test]
    fn local_move_rejects_occupied_targets() {
        let weights = CostModel::default();
        let mut pl = Placement::new(6, 6);
        // Wall of fixed cells around the movable one: every distinct
        // target is occupied, so no accepted move can introduce overlap.
        pl.add_cell(Cell::new(CellId::from_raw(0), 2, 2, 2, 2));
        pl.add_cell(Cell::fixed(CellId::from_raw(1), 0, 0, 2, 6));
        pl.add_cell(Cell::fixed(CellId::from_raw(2), 4, 0, 2, 6));
        pl.add_cell(Cell::fixed(CellId::from_raw(3), 2, 0, 2, 2));
        pl.add_cell(Cell::fixed(CellId::from_raw(4), 2, 4, 2, 2));
        pl.refresh_grid();

        let config = DetailConfig {
            seed: Some(26),
            max_iterations: 5,
            ..DetailConfig::default()
        };
        refine(&mut pl, &config, &weights);

        assert_eq!((pl.cells[0].x, pl.cells[0].y), (2, 2));
        assert_eq!(overlap_penalty(&pl), 0.0);
    }

    #[test]
    fn seeded_refinement_is_reproducible() {
        let weights = CostModel::default();
        let config = DetailConfig {
            seed: Some(27),
            ..DetailConfig::default()
        };

        let mut a = connected_pair();
        refine(&mut a, &config, &weights);
        let mut b = connected_pair();
        refine(&mut b, &config, &weights);

        assert_eq!(a.cells, b.cells);
    }

    #[test]
    fn refinement_can_reduce_wirelength() {
        // Cells 4 apart with a connecting net; plenty of free space, so
        // across enough sweeps some improving move lands.
        let weights = CostModel::default();
        let mut pl = Placement::new(10, 10);
        pl.add_cell(Cell::new(CellId::from_raw(0), 0, 4, 1, 1));
        pl.add_cell(Cell::new(CellId::from_raw(1), 4, 4, 1, 1));
        pl.add_net(Net::new(
            NetId::from_raw(0),
            vec![
                Pin::new(CellId::from_raw(0), 0, 0),
                Pin::new(CellId::from_raw(1), 0, 0),
            ],
        ));
        pl.refresh_grid();

        let before = total_hpwl(&pl);
        let config = DetailConfig {
            seed: Some(28),
            max_iterations: 50,
            ..DetailConfig::default()
        };
        refine(&mut pl, &config, &weights);

        assert!(total_hpwl(&pl) <= before);
    }
}
