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

//! Phase one of Louvain: greedy single-node moves on one level.

use indexmap::IndexMap;
use rand::Rng;

use super::common::{choose_random, shuffle_nodes};
use super::reduce::ReducedGraph;
use crate::graph::Orientation;

/// Gains at or below this are treated as no improvement.
const GAIN_TOLERANCE: f64 = 1e-15;

/// Outcome of local moving on one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LocalMoves {
    /// Community label per node. Labels are node indices of the level and
    /// are not contiguous after moves.
    pub(crate) membership: Vec<usize>,
    /// Whether any node left its starting singleton community.
    pub(crate) changed: bool,
    /// Number of sweeps run, including the final sweep without moves.
    pub(crate) sweeps: usize,
}

/// Moves nodes of one level between communities while modularity improves.
///
/// Community totals are kept per label so a candidate gain costs O(1) after
/// the node's links have been bucketed by community.
pub(crate) struct LocalMover<'g> {
    graph: &'g ReducedGraph,
    resolution: f64,
    /// Total edge weight of the level.
    m: f64,
    node_to_comm: Vec<usize>,
    /// Out-degree per node; the degree when undirected.
    k_out: Vec<f64>,
    /// In-degree per node; unused when undirected.
    k_in: Vec<f64>,
    sigma_out: Vec<f64>,
    sigma_in: Vec<f64>,
    order: Vec<usize>,
}

impl<'g> LocalMover<'g> {
    /// Start from one community per node.
    pub(crate) fn new(graph: &'g ReducedGraph, resolution: f64) -> Self {
        let n = graph.node_count();
        let (k_out, k_in): (Vec<f64>, Vec<f64>) = match graph.orientation() {
            Orientation::Undirected => {
                // Self loops count twice towards an undirected degree.
                let degrees = (0..n)
                    .map(|u| link_sum(graph.out_edges(u)) + 2.0 * graph.self_loop(u))
                    .collect();
                (degrees, vec![0.0; n])
            }
            Orientation::Directed => (0..n)
                .map(|u| {
                    (
                        link_sum(graph.out_edges(u)) + graph.self_loop(u),
                        link_sum(graph.in_edges(u)) + graph.self_loop(u),
                    )
                })
                .unzip(),
        };

        LocalMover {
            graph,
            resolution,
            m: graph.total_weight(),
            node_to_comm: (0..n).collect(),
            sigma_out: k_out.clone(),
            sigma_in: k_in.clone(),
            k_out,
            k_in,
            order: (0..n).collect(),
        }
    }

    /// Sweep until a full pass moves no node.
    ///
    /// A level without edge weight has no modularity to improve and is
    /// returned untouched.
    pub(crate) fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> LocalMoves {
        let mut changed = false;
        let mut sweeps = 0;
        if self.m > 0.0 {
            loop {
                let moves = self.sweep(rng);
                sweeps += 1;
                log::trace!("sweep {sweeps}: {moves} moves");
                if moves == 0 {
                    break;
                }
                changed = true;
            }
        }
        LocalMoves {
            membership: self.node_to_comm,
            changed,
            sweeps,
        }
    }

    /// Visit every node once in a fresh random order; returns the number of
    /// nodes that changed community.
    fn sweep<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut order = std::mem::take(&mut self.order);
        shuffle_nodes(rng, &mut order);
        let mut moves = 0;
        for &node in &order {
            if self.move_node(node, rng) {
                moves += 1;
            }
        }
        self.order = order;
        moves
    }

    /// Move `node` into the neighboring community with the largest strictly
    /// positive gain. Returns whether it moved.
    fn move_node<R: Rng + ?Sized>(&mut self, node: usize, rng: &mut R) -> bool {
        let current_comm = self.node_to_comm[node];

        // Link weight from the node to each neighboring community, in the
        // order communities are first reached. In- and out-links add up.
        let mut links: IndexMap<usize, f64> = IndexMap::new();
        for &(neighbor, weight) in self.graph.out_edges(node) {
            *links.entry(self.node_to_comm[neighbor]).or_insert(0.0) += weight;
        }
        if self.graph.orientation().is_directed() {
            for &(neighbor, weight) in self.graph.in_edges(node) {
                *links.entry(self.node_to_comm[neighbor]).or_insert(0.0) += weight;
            }
        }

        // Remove node from its current community
        self.sigma_out[current_comm] -= self.k_out[node];
        self.sigma_in[current_comm] -= self.k_in[node];
        let weight_to_current = links.get(&current_comm).copied().unwrap_or(0.0);

        let mut best_gain = f64::NEG_INFINITY;
        let mut best_comms: Vec<usize> = Vec::new();
        for (&candidate_comm, &weight_to_comm) in &links {
            if candidate_comm == current_comm {
                continue;
            }
            let gain = self.gain(
                node,
                current_comm,
                candidate_comm,
                weight_to_current,
                weight_to_comm,
            );
            if gain > best_gain {
                best_gain = gain;
                best_comms.clear();
                best_comms.push(candidate_comm);
            } else if gain == best_gain {
                best_comms.push(candidate_comm);
            }
        }

        let best_comm = if best_gain > GAIN_TOLERANCE {
            choose_random(rng, &best_comms)
        } else {
            current_comm
        };

        // Add node back to the best community found
        self.sigma_out[best_comm] += self.k_out[node];
        self.sigma_in[best_comm] += self.k_in[node];
        self.node_to_comm[node] = best_comm;
        best_comm != current_comm
    }

    /// Modularity change of moving `node` from `from` (already removed from
    /// its totals) into `to`.
    #[inline]
    fn gain(&self, node: usize, from: usize, to: usize, weight_from: f64, weight_to: f64) -> f64 {
        let m = self.m;
        match self.graph.orientation() {
            Orientation::Undirected => {
                let k = self.k_out[node];
                (weight_to - weight_from) / m
                    - self.resolution * k * (self.sigma_out[to] - self.sigma_out[from])
                        / (2.0 * m * m)
            }
            Orientation::Directed => {
                let null = self.k_in[node] * (self.sigma_out[to] - self.sigma_out[from])
                    + self.k_out[node] * (self.sigma_in[to] - self.sigma_in[from]);
                (weight_to - weight_from - self.resolution * null / m) / m
            }
        }
    }
}

#[inline]
fn link_sum(links: &[(usize, f64)]) -> f64 {
    links.iter().map(|&(_, w)| w).sum()
}
