//! Per-round routing-table construction.
//!
//! A routing table is a bijection over a node's neighbor set: one uniformly
//! random permutation of the neighbor list, zipped positionally with the
//! original order. Tables are rebuilt from scratch on every call so that
//! successive rounds are statistically independent instances.

use crate::graph::{NodeId, SocialGraph};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Routing table of a single node: incoming neighbor -> outgoing neighbor.
pub type RoutingTable = BTreeMap<NodeId, NodeId>;

/// One instance of the network: a routing table for every node.
#[derive(Debug, Clone, Default)]
pub struct RoutingTables {
    tables: BTreeMap<NodeId, RoutingTable>,
}

impl RoutingTables {
    /// Build fresh routing tables for every node of the graph.
    ///
    /// Uses `rand`'s Fisher-Yates shuffle, so every permutation of a node's
    /// neighbor list is equally likely. Nodes with zero or one neighbor get
    /// an empty or identity table.
    pub fn build<R: Rng>(graph: &SocialGraph, rng: &mut R) -> Self {
        let mut tables = BTreeMap::new();
        for node in graph.node_ids() {
            let original = graph.neighbors(node);
            let mut shuffled = original.to_vec();
            shuffled.shuffle(rng);
            let table: RoutingTable = original.iter().copied().zip(shuffled).collect();
            tables.insert(node, table);
        }
        Self { tables }
    }

    /// The routing table of `node`, if the node exists.
    pub fn table(&self, node: NodeId) -> Option<&RoutingTable> {
        self.tables.get(&node)
    }

    /// Number of nodes covered.
    pub fn node_count(&self) -> usize {
        self.tables.len()
    }

    /// Whether any tables were built.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
