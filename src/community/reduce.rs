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

//! Graph aggregation: collapsing a partition into a coarser weighted graph.

use foldhash::{HashMap, HashMapExt};

use crate::error::{Error, Result};
use crate::graph::{Orientation, WeightedGraph};

/// Relative tolerance for total weight conservation across a reduction.
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// A weighted graph whose nodes are the communities of a finer graph.
///
/// Nodes are dense indices `0..node_count()`. Adjacency lists are sorted by
/// neighbor and never contain the node itself; intra-community weight is
/// kept as a self loop. `members(a)` lists the finer nodes aggregate `a` was
/// built from: indices into the previous level, or the original node ids for
/// a graph built with [`ReducedGraph::from_graph`].
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedGraph {
    orientation: Orientation,
    /// Outgoing links (all links when undirected).
    out_edges: Vec<Vec<(usize, f64)>>,
    /// Incoming links. Empty when undirected.
    in_edges: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    members: Vec<Vec<usize>>,
    total_weight: f64,
}

impl ReducedGraph {
    /// Copy an external graph into the dense representation used by the
    /// optimizer. Node `i` of the result is the `i`-th smallest node id.
    ///
    /// # Returns
    /// * `Error::EmptyGraph` if the graph has no nodes
    /// * `Error::InvalidWeight` for a negative or non-finite weight
    /// * `Error::UnknownNode` if a neighbor is not one of the graph's nodes
    pub fn from_graph<G>(graph: &G) -> Result<Self>
    where
        G: WeightedGraph + ?Sized,
    {
        let mut ids = graph.node_ids();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let orientation = graph.orientation();
        let num_nodes = ids.len();
        let mut index: HashMap<usize, usize> = HashMap::with_capacity(num_nodes);
        for (i, &id) in ids.iter().enumerate() {
            index.insert(id, i);
        }

        let mut out_acc = vec![HashMap::new(); num_nodes];
        let mut in_acc = match orientation {
            Orientation::Undirected => Vec::new(),
            Orientation::Directed => vec![HashMap::new(); num_nodes],
        };
        let mut self_loops = vec![0.0; num_nodes];

        for (u, &id) in ids.iter().enumerate() {
            self_loops[u] = checked_weight(id, id, graph.weight(id, id))?;
            for neighbor in graph.neighbors(id) {
                if neighbor == id {
                    continue;
                }
                let Some(&v) = index.get(&neighbor) else {
                    return Err(Error::UnknownNode(neighbor));
                };
                let weight = checked_weight(id, neighbor, graph.weight(id, neighbor))?;
                if weight == 0.0 {
                    continue;
                }
                // Undirected neighbors are symmetric, so both directions of
                // every link are visited here.
                *out_acc[u].entry(v).or_insert(0.0) += weight;
                if orientation.is_directed() {
                    *in_acc[v].entry(u).or_insert(0.0) += weight;
                }
            }
        }

        let members = ids.into_iter().map(|id| vec![id]).collect();
        Ok(Self::assemble(orientation, out_acc, in_acc, self_loops, members))
    }

    /// Generate a new aggregated graph based on partition
    ///
    /// # Arguments
    /// * `node_to_comm` - Community label of every node of this graph. Labels
    ///   do not need to be contiguous.
    ///
    /// # Returns
    /// * A graph with one node per distinct label, numbered in the order the
    ///   labels are first seen while scanning nodes `0..n`
    ///
    /// # Panics
    /// Panics if `node_to_comm` is shorter than the node count, or if the
    /// total edge weight is not conserved.
    pub(crate) fn reduce(&self, node_to_comm: &[usize]) -> Self {
        let num_nodes = self.node_count();
        assert!(node_to_comm.len() >= num_nodes, "partition does not cover the graph");

        // Relabel communities by first appearance.
        let mut comm_to_new_id: HashMap<usize, usize> = HashMap::with_capacity(num_nodes);
        let mut new_id = Vec::with_capacity(num_nodes);
        for &comm in &node_to_comm[..num_nodes] {
            let next = comm_to_new_id.len();
            new_id.push(*comm_to_new_id.entry(comm).or_insert(next));
        }
        let num_communities = comm_to_new_id.len();

        let mut members = vec![Vec::new(); num_communities];
        let mut self_loops = vec![0.0; num_communities];
        let mut out_acc = vec![HashMap::new(); num_communities];
        let mut in_acc = match self.orientation {
            Orientation::Undirected => Vec::new(),
            Orientation::Directed => vec![HashMap::new(); num_communities],
        };

        for u in 0..num_nodes {
            let a = new_id[u];
            members[a].push(u);
            self_loops[a] += self.self_loops[u];

            for &(v, weight) in &self.out_edges[u] {
                let b = new_id[v];
                if a == b {
                    // Undirected links are stored twice; keep one copy.
                    if self.orientation.is_directed() || u < v {
                        self_loops[a] += weight;
                    }
                    continue;
                }
                *out_acc[a].entry(b).or_insert(0.0) += weight;
                if self.orientation.is_directed() {
                    *in_acc[b].entry(a).or_insert(0.0) += weight;
                }
            }
        }

        let reduced = Self::assemble(self.orientation, out_acc, in_acc, self_loops, members);
        assert!(
            weights_match(self.total_weight, reduced.total_weight),
            "aggregation changed the total edge weight from {} to {}",
            self.total_weight,
            reduced.total_weight
        );
        reduced
    }

    /// Sort the accumulated adjacency and compute the total weight.
    fn assemble(
        orientation: Orientation,
        out_acc: Vec<HashMap<usize, f64>>,
        in_acc: Vec<HashMap<usize, f64>>,
        self_loops: Vec<f64>,
        members: Vec<Vec<usize>>,
    ) -> Self {
        let out_edges: Vec<Vec<(usize, f64)>> = out_acc.into_iter().map(sorted_links).collect();
        let in_edges: Vec<Vec<(usize, f64)>> = in_acc.into_iter().map(sorted_links).collect();

        let links: f64 = out_edges
            .iter()
            .flat_map(|links| links.iter().map(|&(_, w)| w))
            .sum();
        let loops: f64 = self_loops.iter().sum();
        let total_weight = match orientation {
            Orientation::Undirected => links / 2.0 + loops,
            Orientation::Directed => links + loops,
        };

        ReducedGraph {
            orientation,
            out_edges,
            in_edges,
            self_loops,
            members,
            total_weight,
        }
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.self_loops.len()
    }

    /// Total edge weight `m`, every link and self loop counted once.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Finer nodes that make up aggregate `node`.
    #[inline]
    pub fn members(&self, node: usize) -> &[usize] {
        &self.members[node]
    }

    #[inline]
    pub fn self_loop(&self, node: usize) -> f64 {
        self.self_loops[node]
    }

    /// Outgoing links of `node` as `(neighbor, weight)`, sorted by neighbor.
    #[inline]
    pub fn out_edges(&self, node: usize) -> &[(usize, f64)] {
        &self.out_edges[node]
    }

    /// Incoming links of `node`. Same as `out_edges` when undirected.
    #[inline]
    pub fn in_edges(&self, node: usize) -> &[(usize, f64)] {
        match self.orientation {
            Orientation::Undirected => &self.out_edges[node],
            Orientation::Directed => &self.in_edges[node],
        }
    }

    /// Weight of the link `from -> to`, the self loop when they are equal.
    pub fn edge_weight(&self, from: usize, to: usize) -> f64 {
        if from == to {
            return self.self_loops[from];
        }
        let links = &self.out_edges[from];
        match links.binary_search_by_key(&to, |&(v, _)| v) {
            Ok(pos) => links[pos].1,
            Err(_) => 0.0,
        }
    }
}

impl WeightedGraph for ReducedGraph {
    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn node_ids(&self) -> Vec<usize> {
        (0..self.node_count()).collect()
    }

    fn neighbors(&self, node: usize) -> Vec<usize> {
        self.out_edges[node].iter().map(|&(v, _)| v).collect()
    }

    fn in_neighbors(&self, node: usize) -> Vec<usize> {
        self.in_edges(node).iter().map(|&(u, _)| u).collect()
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        self.edge_weight(from, to)
    }

    fn out_degree(&self, node: usize) -> f64 {
        let links: f64 = self.out_edges[node].iter().map(|&(_, w)| w).sum();
        links + self.self_loops[node]
    }

    fn in_degree(&self, node: usize) -> f64 {
        let links: f64 = self.in_edges(node).iter().map(|&(_, w)| w).sum();
        links + self.self_loops[node]
    }

    fn total_weight(&self) -> f64 {
        self.total_weight
    }
}

fn sorted_links(acc: HashMap<usize, f64>) -> Vec<(usize, f64)> {
    let mut links: Vec<(usize, f64)> = acc.into_iter().collect();
    links.sort_unstable_by_key(|&(v, _)| v);
    links
}

fn checked_weight(from: usize, to: usize, weight: f64) -> Result<f64> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(Error::InvalidWeight { from, to, weight })
    }
}

#[inline]
fn weights_match(before: f64, after: f64) -> bool {
    let scale = before.abs().max(after.abs()).max(1.0);
    (before - after).abs() <= WEIGHT_TOLERANCE * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::{DiGraph, UnGraph};

    fn bridged_triangles() -> UnGraph<(), f64> {
        UnGraph::from_edges([
            (0, 1, 1.0),
            (1, 2, 2.0),
            (2, 0, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (5, 3, 3.0),
            (2, 3, 0.5),
        ])
    }

    #[test]
    fn from_graph_copies_weights() {
        let g = bridged_triangles();
        let r = ReducedGraph::from_graph(&g).unwrap();
        assert_eq!(r.node_count(), 6);
        assert_eq!(r.total_weight(), 9.5);
        assert_eq!(r.out_edges(2), &[(0, 1.0), (1, 2.0), (3, 0.5)]);
        assert_eq!(r.edge_weight(3, 2), 0.5);
        assert_eq!(r.edge_weight(0, 4), 0.0);
        assert_eq!(r.members(5), &[5]);
    }

    #[test]
    fn undirected_reduction_keeps_internal_weight_once() {
        let r = ReducedGraph::from_graph(&bridged_triangles()).unwrap();
        let coarse = r.reduce(&[7, 7, 7, 2, 2, 2]);
        assert_eq!(coarse.node_count(), 2);
        assert_eq!(coarse.self_loop(0), 4.0);
        assert_eq!(coarse.self_loop(1), 5.0);
        assert_eq!(coarse.edge_weight(0, 1), 0.5);
        assert_eq!(coarse.edge_weight(1, 0), 0.5);
        assert_eq!(coarse.members(0), &[0, 1, 2]);
        assert_eq!(coarse.members(1), &[3, 4, 5]);
        assert_eq!(coarse.total_weight(), r.total_weight());
        assert_eq!(coarse.degree(0), 8.5);
    }

    #[test]
    fn directed_reduction_keeps_both_directions() {
        let g = DiGraph::<(), f64>::from_edges([
            (0, 1, 1.0),
            (1, 0, 1.0),
            (1, 4, 1.0),
            (2, 1, 1.0),
            (3, 0, 1.0),
            (3, 4, 1.0),
            (4, 2, 1.0),
        ]);
        let r = ReducedGraph::from_graph(&g).unwrap();
        let coarse = r.reduce(&[0, 0, 2, 2, 2]);
        assert_eq!(coarse.self_loop(0), 2.0);
        assert_eq!(coarse.self_loop(1), 2.0);
        assert_eq!(coarse.edge_weight(0, 1), 1.0);
        assert_eq!(coarse.edge_weight(1, 0), 2.0);
        assert_eq!(coarse.in_edges(0), &[(1, 2.0)]);
        assert_eq!(coarse.out_degree(1), 4.0);
        assert_eq!(coarse.in_degree(1), 3.0);
        assert_eq!(coarse.total_weight(), 7.0);
    }

    #[test]
    fn labels_are_numbered_by_first_appearance() {
        let r = ReducedGraph::from_graph(&bridged_triangles()).unwrap();
        let coarse = r.reduce(&[5, 3, 5, 9, 3, 9]);
        assert_eq!(coarse.members(0), &[0, 2]);
        assert_eq!(coarse.members(1), &[1, 4]);
        assert_eq!(coarse.members(2), &[3, 5]);
    }

    #[test]
    fn singleton_reduction_is_identity() {
        let r = ReducedGraph::from_graph(&bridged_triangles()).unwrap();
        let same = r.reduce(&(0..6).collect::<Vec<_>>());
        for u in 0..6 {
            assert_eq!(same.out_edges(u), r.out_edges(u));
            assert_eq!(same.self_loop(u), r.self_loop(u));
            assert_eq!(same.members(u), &[u]);
        }
        assert_eq!(same.total_weight(), r.total_weight());
    }

    #[test]
    fn pre_existing_self_loops_survive() {
        let mut g = UnGraph::<(), f64>::new_undirected();
        let a = g.add_node(());
        let b = g.add_node(());
        g.add_edge(a, a, 2.0);
        g.add_edge(a, b, 1.0);
        let r = ReducedGraph::from_graph(&g).unwrap();
        let coarse = r.reduce(&[0, 0]);
        assert_eq!(coarse.self_loop(0), 3.0);
        assert_eq!(coarse.total_weight(), 3.0);
    }

    #[test]
    fn rejects_negative_weights() {
        let g = DiGraph::<(), f64>::from_edges([(0, 1, -1.0)]);
        assert_eq!(
            ReducedGraph::from_graph(&g),
            Err(Error::InvalidWeight {
                from: 0,
                to: 1,
                weight: -1.0
            })
        );
    }

    #[test]
    fn rejects_empty_graph() {
        let g = DiGraph::<(), f64>::new();
        assert_eq!(ReducedGraph::from_graph(&g), Err(Error::EmptyGraph));
    }
}
