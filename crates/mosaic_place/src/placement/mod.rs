//! Global placement: random initialization + simulated annealing.
//!
//! Explores the search space under a soft-constraint cost model in which
//! overlaps are penalized rather than forbidden. The legalizer and detail
//! placer downstream restore and polish legality.

mod anneal;
mod cost;
mod random;

use crate::data::Placement;
use mosaic_diagnostics::DiagnosticSink;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use anneal::AnnealConfig;
pub use cost::{density_penalty, net_hpwl, overlap_penalty, total_hpwl, CostModel};

/// Runs global placement: scatters movable cells at random, then refines
/// with simulated annealing. Returns the number of annealing epochs run.
pub fn place(
    pl: &mut Placement,
    config: &AnnealConfig,
    weights: &CostModel,
    sink: &DiagnosticSink,
) -> usize {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    random::random_placement(pl, &mut rng);
    anneal::anneal(pl, config, weights, &mut rng, sink)
}
