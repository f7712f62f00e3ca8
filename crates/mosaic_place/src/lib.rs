//! Placement engine for the Mosaic toolchain.
//!
//! This crate takes a populated [`Placement`] (from `mosaic_io`) and
//! assigns every movable cell a legal grid position minimizing a weighted
//! sum of wirelength, overlap, and density imbalance.
//!
//! # Pipeline
//!
//! 1. **Global place** — random initial placement + simulated annealing
//!    under a soft-constraint cost model (overlaps priced, not forbidden)
//! 2. **Legalize** — greedy spiral-search projection onto overlap-free
//!    placements
//! 3. **Detail place** — windowed greedy refinement to recover wirelength
//!    lost to legalization
//!
//! # Usage
//!
//! ```ignore
//! use mosaic_place::{place_design, PlaceConfig};
//!
//! let summary = place_design(&mut placement, &PlaceConfig::default(), &sink)?;
//! assert!(summary.final_cost <= summary.initial_cost);
//! ```

#![warn(missing_docs)]

pub mod data;
pub mod detail;
pub mod ids;
pub mod legalize;
pub mod placement;

pub use data::{Cell, Grid, Net, Pin, Placement};
pub use detail::DetailConfig;
pub use ids::{CellId, NetId};
pub use placement::{density_penalty, net_hpwl, overlap_penalty, total_hpwl};
pub use placement::{AnnealConfig, CostModel};

use mosaic_common::MosaicResult;
use mosaic_diagnostics::DiagnosticSink;

/// Configuration for the full placement pipeline.
#[derive(Debug, Clone, Default)]
pub struct PlaceConfig {
    /// Cost component weights shared by all stages.
    pub weights: CostModel,
    /// Annealing stage configuration.
    pub anneal: AnnealConfig,
    /// Detail placement stage configuration.
    pub detail: DetailConfig,
}

/// Cost figures and stage statistics from a pipeline run.
#[derive(Debug, Clone)]
pub struct PlaceSummary {
    /// Total cost of the placement as loaded.
    pub initial_cost: f64,
    /// Total cost after simulated annealing.
    pub after_anneal_cost: f64,
    /// Total cost after legalization.
    pub after_legalize_cost: f64,
    /// Total cost after detail placement.
    pub final_cost: f64,
    /// Number of cells the legalizer placed conflict-free.
    pub legalized_cells: usize,
    /// Number of annealing epochs executed.
    pub epochs_run: usize,
}

/// Runs the complete placement pipeline on a placement.
///
/// Executes global placement, legalization, and detail refinement in that
/// fixed order, each stage borrowing the placement mutably and leaving the
/// occupancy grid consistent with cell positions at its boundary.
/// Per-cell anomalies (an unlegalizable cell) are reported through the
/// sink; the error arm is reserved for internal invariant violations and
/// is not produced by any defined input.
pub fn place_design(
    pl: &mut Placement,
    config: &PlaceConfig,
    sink: &DiagnosticSink,
) -> MosaicResult<PlaceSummary> {
    let initial_cost = config.weights.total_cost(pl);

    let epochs_run = placement::place(pl, &config.anneal, &config.weights, sink);
    let after_anneal_cost = config.weights.total_cost(pl);

    let legalized_cells = legalize::legalize(pl, sink);
    let after_legalize_cost = config.weights.total_cost(pl);

    detail::refine(pl, &config.detail, &config.weights);
    let final_cost = config.weights.total_cost(pl);

    Ok(PlaceSummary {
        initial_cost,
        after_anneal_cost,
        after_legalize_cost,
        final_cost,
        legalized_cells,
        epochs_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config(seed: u64) -> PlaceConfig {
        PlaceConfig {
            anneal: AnnealConfig {
                seed: Some(seed),
                ..AnnealConfig::default()
            },
            detail: DetailConfig {
                seed: Some(seed),
                ..DetailConfig::default()
            },
            ..PlaceConfig::default()
        }
    }

    #[test]
    fn pipeline_produces_legal_placement() {
        let mut pl = Placement::new(16, 16);
        for i in 0..6 {
            pl.add_cell(Cell::new(CellId::from_raw(i), 0, 0, 2, 2));
        }
        pl.add_net(Net::new(
            NetId::from_raw(0),
            vec![
                Pin::new(CellId::from_raw(0), 0, 0),
                Pin::new(CellId::from_raw(5), 1, 1),
            ],
        ));
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        let summary = place_design(&mut pl, &seeded_config(1), &sink).unwrap();

        assert_eq!(summary.legalized_cells, 6);
        assert_eq!(overlap_penalty(&pl), 0.0);
        for cell in &pl.cells {
            assert!(cell.rect().fits_within(16, 16));
        }
    }

    #[test]
    fn pipeline_on_empty_placement() {
        let mut pl = Placement::new(8, 8);
        let sink = DiagnosticSink::new();
        let summary = place_design(&mut pl, &seeded_config(2), &sink).unwrap();
        assert_eq!(summary.legalized_cells, 0);
        assert_eq!(summary.final_cost, 0.0);
    }

    #[test]
    fn detail_stage_is_monotone() {
        let mut pl = Placement::new(12, 12);
        for i in 0..4 {
            pl.add_cell(Cell::new(CellId::from_raw(i), 0, 0, 2, 2));
        }
        pl.refresh_grid();

        let sink = DiagnosticSink::new();
        let summary = place_design(&mut pl, &seeded_config(3), &sink).unwrap();
        assert!(summary.final_cost <= summary.after_legalize_cost);
    }

    #[test]
    fn reexports_available() {
        let _ = Placement::new(1, 1);
        let _ = CellId::from_raw(0);
        let _ = NetId::from_raw(0);
        let _ = CostModel::default();
        let _ = AnnealConfig::default();
        let _ = DetailConfig::default();
        let _ = PlaceConfig::default();
    }
}
