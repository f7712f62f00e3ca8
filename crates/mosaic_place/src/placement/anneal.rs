//! Simulated annealing global placement.
//!
//! Starting from the random initial placement, repeatedly proposes cell
//! shifts or swaps and accepts/rejects each move using the Metropolis
//! criterion. The temperature decreases geometrically per epoch, reducing
//! the acceptance probability of cost-increasing moves over time.
//!
//! Overlaps do not invalidate moves; they are priced by the cost function.
//! The occupancy grid is not maintained inside the epoch loop (the cost
//! model never reads it); it is refreshed once when the stage exits so the
//! stage-boundary invariant holds.

use crate::data::Placement;
use crate::placement::cost::CostModel;
use mosaic_common::Rect;
use mosaic_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use rand::Rng;

/// Probability of proposing a shift move (the remainder proposes swaps).
const SHIFT_PROBABILITY: f64 = 0.7;

/// Epochs between progress notes.
const PROGRESS_INTERVAL: usize = 10;

/// Configuration for the simulated annealing stage.
#[derive(Debug, Clone)]
pub struct AnnealConfig {
    /// Initial temperature.
    pub t0: f64,
    /// Geometric cooling factor, in `(0, 1)`.
    pub alpha: f64,
    /// Maximum number of epochs.
    pub max_epochs: usize,
    /// Move proposals per epoch; `None` means `10 × cell count`.
    pub moves_per_epoch: Option<usize>,
    /// Width of the averaging windows used for stall detection.
    pub stall_window: usize,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            t0: 1000.0,
            alpha: 0.90,
            max_epochs: 100,
            moves_per_epoch: None,
            stall_window: 10,
            seed: None,
        }
    }
}

/// A proposed move, carrying enough state to undo itself.
#[derive(Debug, Clone, Copy)]
enum Move {
    Shift {
        cell: usize,
        x: i32,
        y: i32,
        prev_x: i32,
        prev_y: i32,
    },
    Swap {
        a: usize,
        b: usize,
    },
}

/// Runs simulated annealing over the placement. Returns the number of
/// epochs executed.
pub(crate) fn anneal(
    pl: &mut Placement,
    config: &AnnealConfig,
    weights: &CostModel,
    rng: &mut impl Rng,
    sink: &DiagnosticSink,
) -> usize {
    let movable = pl.movable_indices();
    let moves_per_epoch = config.moves_per_epoch.unwrap_or(10 * pl.cells.len());

    let mut temperature = config.t0;
    let mut current_cost = weights.total_cost(pl);
    let mut history = vec![current_cost];
    let mut epochs_run = 0;

    for epoch in 0..config.max_epochs {
        let mut accepted = 0usize;

        for _ in 0..moves_per_epoch {
            let Some(mv) = propose_move(pl, &movable, rng) else {
                continue;
            };

            apply_move(pl, &mv);
            let new_cost = weights.total_cost(pl);
            let delta = new_cost - current_cost;

            // Metropolis criterion
            if delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
                current_cost = new_cost;
                accepted += 1;
            } else {
                undo_move(pl, &mv);
            }
        }

        temperature *= config.alpha;
        history.push(current_cost);
        epochs_run = epoch + 1;

        if epoch % PROGRESS_INTERVAL == 0 {
            sink.emit(Diagnostic::note(
                DiagnosticCode::new(Category::Anneal, 301),
                format!(
                    "epoch {epoch}: cost = {current_cost:.2}, T = {temperature:.3}, \
                     accepted = {accepted}/{moves_per_epoch}"
                ),
            ));
        }

        if has_stalled(&history, config.stall_window) {
            sink.emit(Diagnostic::note(
                DiagnosticCode::new(Category::Anneal, 302),
                format!("converged at epoch {epoch}: cost = {current_cost:.2}"),
            ));
            break;
        }
    }

    pl.refresh_grid();
    epochs_run
}

/// Proposes a shift (70%) or swap (30%) move, or `None` when too few
/// movable cells exist for the drawn move type.
fn propose_move(pl: &Placement, movable: &[usize], rng: &mut impl Rng) -> Option<Move> {
    if rng.gen::<f64>() < SHIFT_PROBABILITY {
        if movable.is_empty() {
            return None;
        }
        let cell = movable[rng.gen_range(0..movable.len())];
        let c = &pl.cells[cell];
        let max_x = (pl.grid.width - c.w).max(0);
        let max_y = (pl.grid.height - c.h).max(0);
        Some(Move::Shift {
            cell,
            x: rng.gen_range(0..=max_x),
            y: rng.gen_range(0..=max_y),
            prev_x: c.x,
            prev_y: c.y,
        })
    } else {
        if movable.len() < 2 {
            return None;
        }
        let i = rng.gen_range(0..movable.len());
        let mut j = rng.gen_range(0..movable.len());
        while j == i {
            j = rng.gen_range(0..movable.len());
        }
        let (a, b) = (movable[i], movable[j]);

        // Cells of different sizes can make an exchanged position extend
        // out of bounds even though both were individually legal.
        let ca = &pl.cells[a];
        let cb = &pl.cells[b];
        let a_at_b = Rect::new(cb.x, cb.y, ca.w, ca.h);
        let b_at_a = Rect::new(ca.x, ca.y, cb.w, cb.h);
        if !a_at_b.fits_within(pl.grid.width, pl.grid.height)
            || !b_at_a.fits_within(pl.grid.width, pl.grid.height)
        {
            return None;
        }

        Some(Move::Swap { a, b })
    }
}

fn apply_move(pl: &mut Placement, mv: &Move) {
    match *mv {
        Move::Shift { cell, x, y, .. } => {
            pl.cells[cell].x = x;
            pl.cells[cell].y = y;
        }
        Move::Swap { a, b } => {
            let (ax, ay) = (pl.cells[a].x, pl.cells[a].y);
            let (bx, by) = (pl.cells[b].x, pl.cells[b].y);
            pl.cells[a].x = bx;
            pl.cells[a].y = by;
            pl.cells[b].x = ax;
            pl.cells[b].y = ay;
        }
    }
}

fn undo_move(pl: &mut Placement, mv: &Move) {
    match *mv {
        Move::Shift {
            cell,
            prev_x,
            prev_y,
            ..
        } => {
            pl.cells[cell].x = prev_x;
            pl.cells[cell].y = prev_y;
        }
        // A swap is its own inverse.
        Move::Swap { .. } => apply_move(pl, mv),
    }
}

/// Returns `true` when the cost history shows less than 1% relative
/// improvement between the last two averaging windows.
///
/// Requires at least `2 × window` samples. A zero older mean counts as
/// stalled (the cost cannot improve below zero).
fn has_stalled(history: &[f64], window: usize) -> bool {
    if window == 0 || history.len() < 2 * window {
        return false;
    }
    let n = history.len();
    let recent: f64 = history[n - window..].iter().sum::<f64>() / window as f64;
    let older: f64 = history[n - 2 * window..n - window].iter().sum::<f64>() / window as f64;
    if older == 0.0 {
        return true;
    }
    (older - recent) / older < 0.01
}
