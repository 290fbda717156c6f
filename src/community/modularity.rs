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

//! Modularity of a partition.
//!
//! Undirected graphs use the Newman-Girvan form
//!
//! ```text
//! Q = Σ_c [ W_c / m - γ (K_c / 2m)² ]
//! ```
//!
//! where `m` is the total edge weight, `W_c` the weight inside community `c`
//! (self loops once) and `K_c` the summed degree of its members (self loops
//! twice). Directed graphs split degrees into in and out parts:
//!
//! ```text
//! Q = (1/m) Σ_c [ W_c - γ K_c^out K_c^in / m ]
//! ```
//!
//! Both forms are normalised by `m`. A graph without edge weight has no
//! defined modularity and scores [`Score::Undefined`].

use std::cmp::Ordering;
use std::fmt;

use fixedbitset::FixedBitSet;
use foldhash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};

use crate::error::{check_resolution, Error, Result};
use crate::graph::{Orientation, WeightedGraph};

/// A modularity value, or the marker for graphs whose modularity does not
/// exist because their total edge weight is zero.
///
/// `Undefined` orders below every defined value, so a best-score search
/// only settles on it when nothing else is available.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Score {
    Defined(f64),
    Undefined,
}

impl Score {
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Score::Defined(q) => Some(q),
            Score::Undefined => None,
        }
    }

    #[inline]
    pub fn is_defined(self) -> bool {
        matches!(self, Score::Defined(_))
    }

    /// Strict improvement: a defined score beats `Undefined` and any smaller
    /// defined score. Equal scores are not an improvement.
    #[inline]
    pub fn is_better_than(self, other: Score) -> bool {
        match (self, other) {
            (Score::Defined(a), Score::Defined(b)) => a > b,
            (Score::Defined(_), Score::Undefined) => true,
            (Score::Undefined, _) => false,
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Score::Defined(a), Score::Defined(b)) => a.partial_cmp(b),
            (Score::Defined(_), Score::Undefined) => Some(Ordering::Greater),
            (Score::Undefined, Score::Defined(_)) => Some(Ordering::Less),
            (Score::Undefined, Score::Undefined) => Some(Ordering::Equal),
        }
    }
}

impl From<Score> for Option<f64> {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Defined(q) => write!(f, "{q}"),
            Score::Undefined => f.write_str("undefined"),
        }
    }
}

/// Calculate the modularity of a graph given a partition.
///
/// # Arguments
/// * `graph` - The graph to score
/// * `partition` - Communities as lists of node ids. `None` places every node
///   in its own community, which for a level of a Louvain hierarchy is the
///   grouping that level represents.
/// * `resolution` - Resolution parameter γ, must be finite and positive
///
/// # Returns
/// * `Score::Undefined` if the graph has no edge weight
/// * `Error::EmptyGraph` if the graph has no nodes
/// * `Error::InvalidPartition` if a community names an unknown node, a node
///   appears twice, or a node is left out
pub fn modularity<G>(graph: &G, partition: Option<&[Vec<usize>]>, resolution: f64) -> Result<Score>
where
    G: WeightedGraph + ?Sized,
{
    check_resolution(resolution)?;
    if graph.node_ids().is_empty() {
        return Err(Error::EmptyGraph);
    }

    match partition {
        None => Ok(singleton_score(graph, resolution)),
        Some(communities) => {
            let mut nodes = graph.node_ids();
            nodes.sort_unstable();
            let labels = label_partition(&nodes, communities)?;
            Ok(score_labels(graph, &nodes, &labels, communities.len(), resolution))
        }
    }
}

/// Score every node as its own community, skipping argument checks. Used for
/// levels of a hierarchy whose resolution was validated on construction.
pub(crate) fn singleton_score<G>(graph: &G, resolution: f64) -> Score
where
    G: WeightedGraph + ?Sized,
{
    let mut nodes = graph.node_ids();
    nodes.sort_unstable();
    let labels = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    score_labels(graph, &nodes, &labels, nodes.len(), resolution)
}

/// Map every node id to its community, checking the partition covers the
/// graph exactly once.
fn label_partition(nodes: &[usize], communities: &[Vec<usize>]) -> Result<HashMap<usize, usize>> {
    let mut position: HashMap<usize, usize> = HashMap::with_capacity(nodes.len());
    for (i, &n) in nodes.iter().enumerate() {
        position.insert(n, i);
    }

    let mut seen = FixedBitSet::with_capacity(nodes.len());
    let mut labels = HashMap::with_capacity(nodes.len());
    for (cid, comm) in communities.iter().enumerate() {
        for &node in comm {
            let Some(&idx) = position.get(&node) else {
                return Err(Error::InvalidPartition(format!(
                    "node {node} is not part of the graph"
                )));
            };
            if seen.put(idx) {
                return Err(Error::InvalidPartition(format!(
                    "node {node} belongs to more than one community"
                )));
            }
            labels.insert(node, cid);
        }
    }

    if seen.count_ones(..) != nodes.len() {
        let missing = seen.zeroes().next().map_or(0, |idx| nodes[idx]);
        return Err(Error::InvalidPartition(format!(
            "node {missing} is not assigned to a community"
        )));
    }
    Ok(labels)
}

/// Accumulate internal weight and degree totals per community and fold them
/// into Q.
fn score_labels<G>(
    graph: &G,
    nodes: &[usize],
    labels: &HashMap<usize, usize>,
    count: usize,
    resolution: f64,
) -> Score
where
    G: WeightedGraph + ?Sized,
{
    let m = graph.total_weight();
    if m == 0.0 {
        return Score::Undefined;
    }

    let orientation = graph.orientation();
    let mut internal = vec![0.0; count];
    let mut k_out = vec![0.0; count];
    let mut k_in = vec![0.0; count];

    for &u in nodes {
        let Some(&c) = labels.get(&u) else {
            continue;
        };
        internal[c] += graph.weight(u, u);
        for v in graph.neighbors(u) {
            if labels.get(&v) != Some(&c) {
                continue;
            }
            match orientation {
                // Each undirected edge is seen from both ends.
                Orientation::Undirected if u < v => internal[c] += graph.weight(u, v),
                Orientation::Undirected => {}
                Orientation::Directed => internal[c] += graph.weight(u, v),
            }
        }
        match orientation {
            Orientation::Undirected => k_out[c] += graph.degree(u),
            Orientation::Directed => {
                k_out[c] += graph.out_degree(u);
                k_in[c] += graph.in_degree(u);
            }
        }
    }

    let q = match orientation {
        Orientation::Undirected => internal
            .iter()
            .zip(&k_out)
            .map(|(&w, &k)| {
                let share = k / (2.0 * m);
                w / m - resolution * share * share
            })
            .sum::<f64>(),
        Orientation::Directed => {
            let q: f64 = internal
                .iter()
                .zip(k_out.iter().zip(&k_in))
                .map(|(&w, (&out, &inn))| w - resolution * out * inn / m)
                .sum();
            q / m
        }
    };
    Score::Defined(q)
}
