//! Experiment drivers.
//!
//! Both experiments run the same R-round loop: rebuild every node's routing
//! table, then walk once from every sampled node. R scales with the square
//! root of the edge count, as the random-route scheme prescribes.
//!
//! The utility run collects tail fingerprints and counts served pairs; the
//! escape run injects attacker clusters first, counts walks that reach them,
//! and rolls the graph back before returning. Injection, rounds and rollback
//! are strictly sequential; the graph is never mutated mid-round.

use crate::attack::{inject_attackers, AttackError, RegionMap};
use crate::graph::{NodeId, SocialGraph};
use crate::tails::{count_served, TailRegistry, UtilityOutcome};
use crate::walk::{escape_walk, tail_walk, RoutingTables, WalkError};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// Round-count constant of the reference configuration.
pub const DEFAULT_R0: u32 = 4;

/// Attacker-injection parameters of one escape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackConfig {
    /// Number of independent attacker cliques.
    pub clusters: usize,
    /// Nodes per clique.
    pub cluster_size: usize,
    /// Attack edges attached from each clique's first node to the honest graph.
    pub attack_edges_per_cluster: usize,
}

/// Result of one escape run.
#[derive(Debug, Clone, PartialEq)]
pub struct EscapeOutcome {
    /// Walks that touched the attacker region within the bound.
    pub escape_count: u64,
    /// Total walks performed: rounds x sample size.
    pub walk_count: u64,
    /// `escape_count / walk_count`, in [0, 1]. Zero when no walks ran.
    pub escape_percent: f64,
}

impl EscapeOutcome {
    /// Escape rate as a percentage (0-100).
    pub fn percentage(&self) -> f64 {
        self.escape_percent * 100.0
    }
}

/// Experiment failures.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Attack(#[from] AttackError),
}

/// Number of rounds for a graph with `edge_count` edges: `ceil(r0 * sqrt(m))`.
pub fn rounds_for(edge_count: usize, r0: u32) -> usize {
    (f64::from(r0) * (edge_count as f64).sqrt()).ceil() as usize
}

/// Run the utility experiment: R rounds of tail collection over `sample`,
/// then the all-ordered-pairs acceptance count.
pub fn run_utility<R: Rng>(
    graph: &SocialGraph,
    sample: &BTreeSet<NodeId>,
    hop_bound: usize,
    r0: u32,
    rng: &mut R,
) -> Result<UtilityOutcome, ExperimentError> {
    let rounds = rounds_for(graph.edge_count(), r0);
    debug!(rounds, hop_bound, sample = sample.len(), "utility run");

    let mut registry = TailRegistry::new();
    for round in 0..rounds {
        let tables = RoutingTables::build(graph, rng);
        for &node in sample {
            let tail = tail_walk(&tables, node, hop_bound, rng)?;
            registry.record(node, tail);
        }
        debug!(round, "tails collected");
    }

    Ok(count_served(&registry))
}

/// Run the escape experiment: inject attackers, run R rounds of escape-mode
/// walks, roll the graph back, and report the escape rate.
///
/// The rollback happens even when a round fails, so the graph is always
/// restored before this returns. Safe to call repeatedly on the same graph
/// across a parameter sweep.
pub fn run_escape<R: Rng>(
    graph: &mut SocialGraph,
    sample: &BTreeSet<NodeId>,
    attack: &AttackConfig,
    hop_bound: usize,
    r0: u32,
    rng: &mut R,
) -> Result<EscapeOutcome, ExperimentError> {
    let injection = inject_attackers(
        graph,
        attack.clusters,
        attack.cluster_size,
        attack.attack_edges_per_cluster,
        rng,
    )?;

    let outcome = escape_rounds(graph, injection.regions(), sample, hop_bound, r0, rng);
    injection.rollback(graph)?;
    outcome
}

fn escape_rounds<R: Rng>(
    graph: &SocialGraph,
    regions: &RegionMap,
    sample: &BTreeSet<NodeId>,
    hop_bound: usize,
    r0: u32,
    rng: &mut R,
) -> Result<EscapeOutcome, ExperimentError> {
    // R is derived from the attacker-augmented graph, which is the graph the
    // walks actually traverse.
    let rounds = rounds_for(graph.edge_count(), r0);
    debug!(
        rounds,
        hop_bound,
        sample = sample.len(),
        attackers = regions.attacker_count(),
        "escape run"
    );

    let mut escape_count = 0u64;
    for round in 0..rounds {
        let tables = RoutingTables::build(graph, rng);
        for &node in sample {
            if escape_walk(&tables, regions, node, hop_bound, rng)? {
                escape_count += 1;
            }
        }
        debug!(round, escape_count, "round complete");
    }

    let walk_count = rounds as u64 * sample.len() as u64;
    let escape_percent = if walk_count == 0 {
        0.0
    } else {
        escape_count as f64 / walk_count as f64
    };

    Ok(EscapeOutcome {
        escape_count,
        walk_count,
        escape_percent,
    })
}
