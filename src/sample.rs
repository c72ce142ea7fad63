//! Subject-node sampling.
//!
//! The experiment subjects are a fixed-size uniform random subset of the
//! graph, drawn once before anything else runs. Only nodes with at least one
//! neighbor are eligible: a degree-0 node cannot start a walk, and catching
//! that here beats failing deep inside the walk engine.

use crate::graph::{NodeId, SocialGraph};
use rand::Rng;
use std::collections::BTreeSet;

/// Sampling failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("requested a sample of {requested} nodes but only {available} have degree >= 1")]
    NotEnoughWalkableNodes { requested: usize, available: usize },
}

/// Draw a uniform random sample of `size` distinct nodes with degree >= 1.
///
/// Rejection-drawn: duplicates are re-rolled until the sample is full, which
/// keeps every eligible node equally likely.
pub fn draw_sample<R: Rng>(
    graph: &SocialGraph,
    size: usize,
    rng: &mut R,
) -> Result<BTreeSet<NodeId>, SampleError> {
    let walkable: Vec<NodeId> = graph.node_ids().filter(|&n| graph.degree(n) >= 1).collect();
    if size > walkable.len() {
        return Err(SampleError::NotEnoughWalkableNodes {
            requested: size,
            available: walkable.len(),
        });
    }

    let mut sample = BTreeSet::new();
    while sample.len() < size {
        sample.insert(walkable[rng.gen_range(0..walkable.len())]);
    }
    Ok(sample)
}
