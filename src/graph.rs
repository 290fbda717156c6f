// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The weighted graph capability consumed by the community algorithms.
//!
//! Graph storage lives outside this crate. Anything that can enumerate its
//! nodes, list the neighbors of a node and look up the weight between two
//! nodes can be scored and partitioned. An implementation for petgraph's
//! [`Graph`] is provided.

use petgraph::graph::{Graph, IndexType, NodeIndex};
use petgraph::{Direction, EdgeType};
use serde::{Deserialize, Serialize};

/// Whether edge weights are read as directed or undirected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// `weight(u, v) == weight(v, u)`; degrees count self loops twice.
    Undirected,
    /// Edges have a tail and a head; in- and out-degrees are tracked apart.
    Directed,
}

impl Orientation {
    #[inline]
    pub fn is_directed(self) -> bool {
        matches!(self, Orientation::Directed)
    }
}

/// Read-only access to a weighted graph.
///
/// Nodes are opaque `usize` identifiers. [`node_ids`](Self::node_ids) must
/// return every node exactly once and the same set on every call.
/// [`neighbors`](Self::neighbors) and [`in_neighbors`](Self::in_neighbors)
/// never include the node itself; self loops are only visible through
/// `weight(u, u)`.
pub trait WeightedGraph {
    fn orientation(&self) -> Orientation;

    /// All node identifiers of the graph.
    fn node_ids(&self) -> Vec<usize>;

    /// Nodes reachable over one edge. For directed graphs these are the
    /// heads of the node's outgoing edges.
    fn neighbors(&self, node: usize) -> Vec<usize>;

    /// Tails of the node's incoming edges. Undirected graphs do not need to
    /// override this.
    fn in_neighbors(&self, node: usize) -> Vec<usize> {
        self.neighbors(node)
    }

    /// Weight of the edge `from -> to`, or 0 when there is none.
    fn weight(&self, from: usize, to: usize) -> f64;

    /// Weighted degree of an undirected node with its self loop counted
    /// twice. For directed graphs this is `out_degree + in_degree`.
    fn degree(&self, node: usize) -> f64 {
        match self.orientation() {
            Orientation::Undirected => self.out_degree(node) + self.weight(node, node),
            Orientation::Directed => self.out_degree(node) + self.in_degree(node),
        }
    }

    /// Sum of outgoing edge weights, including the self loop once.
    fn out_degree(&self, node: usize) -> f64 {
        let links: f64 = self
            .neighbors(node)
            .into_iter()
            .map(|v| self.weight(node, v))
            .sum();
        links + self.weight(node, node)
    }

    /// Sum of incoming edge weights, including the self loop once.
    fn in_degree(&self, node: usize) -> f64 {
        let links: f64 = self
            .in_neighbors(node)
            .into_iter()
            .map(|u| self.weight(u, node))
            .sum();
        links + self.weight(node, node)
    }

    /// Total edge weight `m`. Every edge and every self loop is counted once.
    fn total_weight(&self) -> f64 {
        let mut links = 0.0;
        let mut loops = 0.0;
        for u in self.node_ids() {
            loops += self.weight(u, u);
            for v in self.neighbors(u) {
                links += self.weight(u, v);
            }
        }
        match self.orientation() {
            Orientation::Undirected => links / 2.0 + loops,
            Orientation::Directed => links + loops,
        }
    }
}

impl<G: WeightedGraph + ?Sized> WeightedGraph for &G {
    fn orientation(&self) -> Orientation {
        (**self).orientation()
    }

    fn node_ids(&self) -> Vec<usize> {
        (**self).node_ids()
    }

    fn neighbors(&self, node: usize) -> Vec<usize> {
        (**self).neighbors(node)
    }

    fn in_neighbors(&self, node: usize) -> Vec<usize> {
        (**self).in_neighbors(node)
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        (**self).weight(from, to)
    }

    fn total_weight(&self) -> f64 {
        (**self).total_weight()
    }
}

// ========================
// petgraph adapter
// ========================

/// Node ids are `NodeIndex::index()`; parallel edges are summed.
impl<N, E, Ty, Ix> WeightedGraph for Graph<N, E, Ty, Ix>
where
    E: Copy + Into<f64>,
    Ty: EdgeType,
    Ix: IndexType,
{
    fn orientation(&self) -> Orientation {
        if self.is_directed() {
            Orientation::Directed
        } else {
            Orientation::Undirected
        }
    }

    fn node_ids(&self) -> Vec<usize> {
        self.node_indices().map(|n| n.index()).collect()
    }

    fn neighbors(&self, node: usize) -> Vec<usize> {
        collect_neighbors(self, node, Direction::Outgoing)
    }

    fn in_neighbors(&self, node: usize) -> Vec<usize> {
        collect_neighbors(self, node, Direction::Incoming)
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        self.edges_connecting(NodeIndex::new(from), NodeIndex::new(to))
            .map(|edge| (*edge.weight()).into())
            .sum()
    }
}

fn collect_neighbors<N, E, Ty, Ix>(
    graph: &Graph<N, E, Ty, Ix>,
    node: usize,
    direction: Direction,
) -> Vec<usize>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    let mut out: Vec<usize> = graph
        .neighbors_directed(NodeIndex::new(node), direction)
        .map(|n| n.index())
        .filter(|&n| n != node)
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}
