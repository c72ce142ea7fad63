//! The walk rule shared by both experiments.
//!
//! A walk of bound `h` takes `h` hops. The first hop is a uniform random
//! pick from the start node's routing-table key set and is deliberately not
//! governed by the pairing; every later hop is: the node just arrived at
//! looks up, in its own routing table, the entry keyed by the node it
//! arrived from. Given the tables of a round, the whole trace is determined
//! by that single first pick.

use super::routing::RoutingTables;
use crate::attack::RegionMap;
use crate::graph::NodeId;
use rand::Rng;

/// The last directed edge of a tail-mode walk: the walk sits on `from` and
/// would exit toward `to`. Order matters; `(u, v)` and `(v, u)` are distinct
/// fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tail {
    pub from: NodeId,
    pub to: NodeId,
}

/// Walk failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError {
    /// The start node has no neighbors, so no first hop exists. Samples are
    /// drawn from degree >= 1 nodes, so hitting this means a misconfigured
    /// caller rather than bad luck.
    #[error("node {0} has no neighbors to start a walk from")]
    UnwalkableNode(NodeId),
}

/// Run a walk of `hop_bound` hops and return its tail fingerprint.
pub fn tail_walk<R: Rng>(
    tables: &RoutingTables,
    start: NodeId,
    hop_bound: usize,
    rng: &mut R,
) -> Result<Tail, WalkError> {
    let mut current = start;
    let mut next = first_hop(tables, start, rng)?;

    for _ in 1..hop_bound {
        let prev = current;
        current = next;
        next = paired_exit(tables, current, prev);
    }

    Ok(Tail { from: current, to: next })
}

/// Run a walk of at most `hop_bound` hops and report whether it touched the
/// attacker region. The first-hop target counts; the walk stops at the first
/// attacker contact and never looks past the bound.
pub fn escape_walk<R: Rng>(
    tables: &RoutingTables,
    regions: &RegionMap,
    start: NodeId,
    hop_bound: usize,
    rng: &mut R,
) -> Result<bool, WalkError> {
    let mut current = start;
    let mut next = first_hop(tables, start, rng)?;
    if regions.is_attacker(next) {
        return Ok(true);
    }

    for _ in 1..hop_bound {
        let prev = current;
        current = next;
        next = paired_exit(tables, current, prev);
        if regions.is_attacker(next) {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Uniform random pick from the start node's routing-table key set.
fn first_hop<R: Rng>(
    tables: &RoutingTables,
    start: NodeId,
    rng: &mut R,
) -> Result<NodeId, WalkError> {
    let table = tables
        .table(start)
        .filter(|t| !t.is_empty())
        .ok_or(WalkError::UnwalkableNode(start))?;
    let pick = rng.gen_range(0..table.len());
    // BTreeMap keys iterate in sorted order, so nth(pick) is a uniform draw
    // over the neighbor set.
    Ok(table.keys().nth(pick).copied().unwrap())
}

/// Exit taken at `current` after arriving from `prev`.
fn paired_exit(tables: &RoutingTables, current: NodeId, prev: NodeId) -> NodeId {
    // In a symmetric graph, prev is a neighbor of current, and the routing
    // table is total over the neighbor set.
    tables
        .table(current)
        .and_then(|t| t.get(&prev))
        .copied()
        .unwrap()
}
