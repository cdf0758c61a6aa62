// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part connectivity graph.
//!
//! Nodes are part identities; an undirected edge joins two parts whenever a
//! connector on one is joined to a connector on the other. Fittings, couplings
//! and short stubs are ordinary nodes, so "hops" count physical joints.
//!
//! Used to validate geometric candidates: two runs that cross in plan are only
//! a junction if they are also a few joints apart.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::types::{PartId, PartRecord};

/// Undirected adjacency over part identities.
///
/// Symmetric by construction and free of self-loops.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    adjacency: FxHashMap<PartId, FxHashSet<PartId>>,
}

impl AdjacencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from connector join data.
    ///
    /// Every part becomes a node, even with no joins. A join listed on only
    /// one side still produces a symmetric edge.
    pub fn from_parts(parts: &[PartRecord]) -> Self {
        let mut graph = Self::new();

        for part in parts {
            graph.add_node(part.id);
            for connector in &part.connectors {
                for joined in &connector.joined {
                    graph.add_edge(part.id, joined.part);
                }
            }
        }

        graph
    }

    // =========================================================================
    // Graph mutation
    // =========================================================================

    /// Adds a node without neighbors. No-op if present.
    pub fn add_node(&mut self, id: PartId) {
        self.adjacency.entry(id).or_default();
    }

    /// Adds an undirected edge. Self-loops are ignored.
    ///
    /// Returns `true` if the edge was new.
    pub fn add_edge(&mut self, a: PartId, b: PartId) -> bool {
        if a == b {
            self.add_node(a);
            return false;
        }
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        inserted
    }

    // =========================================================================
    // Graph accessors
    // =========================================================================

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Returns the neighbors of a part (empty for unknown parts).
    pub fn neighbors(&self, id: PartId) -> impl Iterator<Item = PartId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// Checks the undirected invariant: every edge is stored both ways.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(a, neighbors)| {
            neighbors.iter().all(|b| {
                a != b && self.adjacency.get(b).is_some_and(|back| back.contains(a))
            })
        })
    }

    // =========================================================================
    // Bounded traversal
    // =========================================================================

    /// BFS hop distances from `source` to every part within `max_hops`.
    ///
    /// The source itself is included at distance 0.
    pub fn reachable_within(&self, source: PartId, max_hops: usize) -> FxHashMap<PartId, usize> {
        let mut dist = FxHashMap::default();
        let mut queue = VecDeque::new();

        dist.insert(source, 0);
        queue.push_back((source, 0));

        while let Some((node, hops)) = queue.pop_front() {
            if hops == max_hops {
                continue;
            }
            for neighbor in self.neighbors(node) {
                if !dist.contains_key(&neighbor) {
                    dist.insert(neighbor, hops + 1);
                    queue.push_back((neighbor, hops + 1));
                }
            }
        }

        dist
    }
}
