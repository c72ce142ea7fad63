//! Attacker-cluster injection and exact rollback.
//!
//! Injection allocates fresh node ids above the current maximum, wires each
//! cluster into a clique, and attaches a bounded number of attack edges from
//! the cluster's first node to distinct randomly drawn honest nodes. Region
//! labels are an explicit tag carried by the [`Injection`] value, not derived
//! from id magnitude. Rollback removes the most recently appended entry from
//! every list an attacker touches, mirroring the append order of injection,
//! and must leave the graph observationally identical to its pre-injection
//! state.

use crate::graph::{NodeId, SocialGraph};
use rand::Rng;
use std::collections::{BTreeSet, HashSet};

/// Which side of the trust cut a node sits on while an injection is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Honest,
    Attacker,
}

/// Region labels for one active injection. Every node not tagged as an
/// attacker is honest.
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    attackers: BTreeSet<NodeId>,
}

impl RegionMap {
    /// Build a region map from the attacker node set.
    pub fn from_attackers<I: IntoIterator<Item = NodeId>>(attackers: I) -> Self {
        Self {
            attackers: attackers.into_iter().collect(),
        }
    }

    /// Region of `node`.
    pub fn region(&self, node: NodeId) -> Region {
        if self.is_attacker(node) {
            Region::Attacker
        } else {
            Region::Honest
        }
    }

    /// Whether `node` is attacker-labeled.
    pub fn is_attacker(&self, node: NodeId) -> bool {
        self.attackers.contains(&node)
    }

    /// Number of attacker-labeled nodes.
    pub fn attacker_count(&self) -> usize {
        self.attackers.len()
    }
}

/// Injection and rollback failures.
#[derive(Debug, thiserror::Error)]
pub enum AttackError {
    #[error("an attacker injection is already active on this graph")]
    InjectionActive,

    #[error("cannot attach {requested} attack edges per cluster: only {available} honest nodes exist")]
    NotEnoughHonestTargets { requested: usize, available: usize },

    #[error("gave up searching for distinct attack-edge targets after {attempts} draws")]
    TargetSearchExhausted { attempts: usize },

    #[error(
        "rollback left {actual} edges where {expected} were expected; \
         the graph was mutated while the injection was active"
    )]
    RollbackMismatch { expected: usize, actual: usize },
}

/// One active attacker injection.
///
/// Rollback consumes the value, so an injection cannot be rolled back twice,
/// and a rollback without a prior injection cannot be expressed at all.
#[derive(Debug)]
pub struct Injection {
    /// Attacker ids in allocation order; rollback walks them in this order.
    attackers: Vec<NodeId>,
    regions: RegionMap,
    pre_injection_edges: usize,
}

impl Injection {
    /// Region labels for this injection.
    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    /// Attacker node ids in allocation order.
    pub fn attackers(&self) -> &[NodeId] {
        &self.attackers
    }

    /// Remove every injected node and edge, restoring the graph to its exact
    /// pre-injection state.
    ///
    /// Attacker-side edges are the most recently appended entries of every
    /// neighbor list they appear in, so each one is removed by popping the
    /// tail of the peer's list. The edge count is re-checked afterwards; a
    /// mismatch means the graph was mutated while the injection was active.
    pub fn rollback(self, graph: &mut SocialGraph) -> Result<(), AttackError> {
        for &attacker in &self.attackers {
            let peers = graph.neighbors(attacker).to_vec();
            for peer in peers {
                graph.pop_neighbor(peer);
            }
        }
        for &attacker in &self.attackers {
            graph.remove_node(attacker);
        }
        graph.set_injection_active(false);

        let actual = graph.edge_count();
        if actual != self.pre_injection_edges {
            return Err(AttackError::RollbackMismatch {
                expected: self.pre_injection_edges,
                actual,
            });
        }
        Ok(())
    }
}

/// Draws tolerated per attack edge before the target search gives up.
const TARGET_RETRY_FACTOR: usize = 64;

/// Inject `clusters` attacker cliques of `cluster_size` nodes each, attaching
/// `attack_edges` edges from every cluster's first node to distinct randomly
/// chosen honest nodes.
///
/// Target selection happens before any mutation, so a failed search leaves
/// the graph untouched.
pub fn inject_attackers<R: Rng>(
    graph: &mut SocialGraph,
    clusters: usize,
    cluster_size: usize,
    attack_edges: usize,
    rng: &mut R,
) -> Result<Injection, AttackError> {
    if graph.injection_active() {
        return Err(AttackError::InjectionActive);
    }

    let honest: Vec<NodeId> = graph.node_ids().collect();
    if attack_edges > honest.len() {
        return Err(AttackError::NotEnoughHonestTargets {
            requested: attack_edges,
            available: honest.len(),
        });
    }
    let pre_injection_edges = graph.edge_count();

    // Pick every cluster's targets up front; the draw only needs the honest
    // node list. Distinctness is per cluster, as in the attack model: one
    // cluster never spends two attack edges on the same honest node.
    let mut cluster_targets: Vec<Vec<NodeId>> = Vec::with_capacity(clusters);
    if cluster_size > 0 {
        let max_draws = TARGET_RETRY_FACTOR * honest.len().max(attack_edges);
        for _ in 0..clusters {
            let mut picked = Vec::with_capacity(attack_edges);
            let mut seen = HashSet::with_capacity(attack_edges);
            let mut attempts = 0;
            while picked.len() < attack_edges {
                attempts += 1;
                if attempts > max_draws {
                    return Err(AttackError::TargetSearchExhausted { attempts });
                }
                let candidate = honest[rng.gen_range(0..honest.len())];
                if seen.insert(candidate) {
                    picked.push(candidate);
                }
            }
            cluster_targets.push(picked);
        }
    }

    let mut next_id = graph.max_node_id().map_or(0, |max| max + 1);
    let mut attackers = Vec::with_capacity(clusters * cluster_size);

    for targets in cluster_targets {
        let base = next_id;
        for offset in 0..cluster_size {
            graph.ensure_node(base + offset as NodeId);
        }
        // Clique first, then the attack edges, so the honest-side entries
        // are the very last appends on every honest list they touch.
        for j in 0..cluster_size {
            for k in (j + 1)..cluster_size {
                graph.add_edge(base + j as NodeId, base + k as NodeId);
            }
        }
        for target in targets {
            graph.add_edge(base, target);
        }
        attackers.extend(base..base + cluster_size as NodeId);
        next_id += cluster_size as NodeId;
    }

    graph.set_injection_active(true);
    let regions = RegionMap::from_attackers(attackers.iter().copied());

    Ok(Injection {
        attackers,
        regions,
        pre_injection_edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn triangle() -> SocialGraph {
        let mut graph = SocialGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);
        graph
    }

    #[test]
    fn test_inject_one_pair_cluster_into_triangle() {
        let mut graph = triangle();
        let mut rng = StdRng::seed_from_u64(1);

        let injection = inject_attackers(&mut graph, 1, 2, 1, &mut rng).unwrap();

        // 3 original + 1 clique-internal + 1 attack edge.
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(injection.attackers(), &[3, 4]);
        assert!(graph.contains(3));
        assert!(graph.contains(4));
        assert!(graph.neighbors(3).contains(&4));

        let regions = injection.regions();
        assert_eq!(regions.region(3), Region::Attacker);
        assert_eq!(regions.region(4), Region::Attacker);
        assert_eq!(regions.region(0), Region::Honest);
        assert_eq!(regions.attacker_count(), 2);

        injection.rollback(&mut graph).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.contains(3));
        assert!(!graph.contains(4));
    }

    #[test]
    fn test_rollback_restores_adjacency_exactly() {
        let mut graph = triangle();
        let snapshot = graph.clone();
        let mut rng = StdRng::seed_from_u64(5);

        let injection = inject_attackers(&mut graph, 2, 3, 2, &mut rng).unwrap();
        assert_ne!(graph, snapshot);

        injection.rollback(&mut graph).unwrap();
        assert_eq!(graph, snapshot);
    }

    #[test]
    fn test_attacker_ids_allocated_above_current_max() {
        let mut graph = SocialGraph::new();
        graph.add_edge(10, 20);
        let mut rng = StdRng::seed_from_u64(2);

        let injection = inject_attackers(&mut graph, 2, 2, 1, &mut rng).unwrap();
        assert_eq!(injection.attackers(), &[21, 22, 23, 24]);

        injection.rollback(&mut graph).unwrap();
    }

    #[test]
    fn test_clusters_are_cliques() {
        let mut graph = triangle();
        let mut rng = StdRng::seed_from_u64(8);

        let injection = inject_attackers(&mut graph, 1, 4, 0, &mut rng).unwrap();
        for &a in injection.attackers() {
            for &b in injection.attackers() {
                if a != b {
                    assert!(graph.neighbors(a).contains(&b), "{a} not wired to {b}");
                }
            }
        }

        injection.rollback(&mut graph).unwrap();
    }

    #[test]
    fn test_attack_edge_targets_are_distinct_honest_nodes() {
        let mut graph = triangle();
        let mut rng = StdRng::seed_from_u64(3);

        // As many attack edges as honest nodes: every honest node must be hit
        // exactly once.
        let injection = inject_attackers(&mut graph, 1, 2, 3, &mut rng).unwrap();
        let entry = injection.attackers()[0];
        let honest_peers: Vec<NodeId> = graph
            .neighbors(entry)
            .iter()
            .copied()
            .filter(|&n| !injection.regions().is_attacker(n))
            .collect();

        let mut sorted = honest_peers.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);

        injection.rollback(&mut graph).unwrap();
    }

    #[test]
    fn test_nested_injection_is_rejected() {
        let mut graph = triangle();
        let mut rng = StdRng::seed_from_u64(4);

        let injection = inject_attackers(&mut graph, 1, 2, 1, &mut rng).unwrap();
        let err = inject_attackers(&mut graph, 1, 2, 1, &mut rng).unwrap_err();
        assert!(matches!(err, AttackError::InjectionActive));

        injection.rollback(&mut graph).unwrap();
        // After rollback a new injection is allowed again.
        let injection = inject_attackers(&mut graph, 1, 2, 1, &mut rng).unwrap();
        injection.rollback(&mut graph).unwrap();
    }

    #[test]
    fn test_too_many_attack_edges_is_a_config_error() {
        let mut graph = triangle();
        let snapshot = graph.clone();
        let mut rng = StdRng::seed_from_u64(6);

        let err = inject_attackers(&mut graph, 1, 2, 4, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            AttackError::NotEnoughHonestTargets {
                requested: 4,
                available: 3,
            }
        ));
        // The failed call must not have touched the graph.
        assert_eq!(graph, snapshot);
    }

    #[test]
    fn test_mutation_during_injection_is_detected() {
        let mut graph = triangle();
        let mut rng = StdRng::seed_from_u64(7);

        let injection = inject_attackers(&mut graph, 1, 2, 1, &mut rng).unwrap();
        graph.add_edge(100, 101);

        let err = injection.rollback(&mut graph).unwrap_err();
        assert!(matches!(err, AttackError::RollbackMismatch { .. }));
    }

    #[test]
    fn test_zero_clusters_is_a_no_op() {
        let mut graph = triangle();
        let snapshot = graph.clone();
        let mut rng = StdRng::seed_from_u64(9);

        let injection = inject_attackers(&mut graph, 0, 2, 1, &mut rng).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(injection.regions().attacker_count(), 0);

        injection.rollback(&mut graph).unwrap();
        assert_eq!(graph, snapshot);
    }
}
