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

//! Graph fixtures shared by the integration tests.

#![allow(dead_code)]

use louvain_hierarchy::Score;
use petgraph::graph::{DiGraph, UnGraph};

pub const TOLERANCE: f64 = 1e-12;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_score(score: Score, want: f64) {
    match score {
        Score::Defined(got) => assert!(
            (got - want).abs() < TOLERANCE,
            "score {got} differs from {want}"
        ),
        Score::Undefined => panic!("expected score {want}, got undefined"),
    }
}

/// Members sorted, communities ordered by smallest member.
pub fn canonical(mut communities: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    for comm in &mut communities {
        comm.sort_unstable();
    }
    communities.sort();
    communities
}

/// Five nodes, seven unit arcs.
pub fn small_directed() -> DiGraph<(), f64> {
    DiGraph::from_edges([
        (0, 1, 1.0),
        (1, 0, 1.0),
        (1, 4, 1.0),
        (2, 1, 1.0),
        (3, 0, 1.0),
        (3, 4, 1.0),
        (4, 2, 1.0),
    ])
}

/// Out-neighbors of the directed Zachary karate club. Every friendship
/// points from the less to the more central member; the 5-6 tie keeps
/// both arcs.
const ZACHARY_DIRECTED: [&[u32]; 34] = [
    &[],
    &[0, 2],
    &[0, 32],
    &[0, 1, 2],
    &[0, 6, 10],
    &[0, 6],
    &[0, 5],
    &[0, 1, 2, 3],
    &[0, 2, 32, 33],
    &[2, 33],
    &[0, 5],
    &[0],
    &[0, 3],
    &[0, 1, 2, 3, 33],
    &[32, 33],
    &[32, 33],
    &[5, 6],
    &[0, 1],
    &[32, 33],
    &[0, 1, 33],
    &[32, 33],
    &[0, 1],
    &[32, 33],
    &[32, 33],
    &[27, 31],
    &[23, 24, 31],
    &[29, 33],
    &[2, 23, 33],
    &[2, 31, 33],
    &[23, 32, 33],
    &[1, 8, 32, 33],
    &[0, 32, 33],
    &[33],
    &[],
];

pub fn zachary_directed() -> DiGraph<(), f64> {
    let mut g = DiGraph::with_capacity(34, 79);
    let nodes: Vec<_> = (0..34).map(|_| g.add_node(())).collect();
    for (u, heads) in ZACHARY_DIRECTED.iter().enumerate() {
        for &v in heads.iter() {
            g.add_edge(nodes[u], nodes[v as usize], 1.0);
        }
    }
    g
}

/// Best known four-way split of the karate club, directed or not.
pub fn zachary_four_groups() -> Vec<Vec<usize>> {
    vec![
        vec![0, 1, 2, 3, 7, 11, 12, 13, 17, 19, 21],
        vec![4, 5, 6, 10, 16],
        vec![8, 9, 14, 15, 18, 20, 22, 26, 29, 30, 32, 33],
        vec![23, 24, 25, 27, 28, 31],
    ]
}

/// Out-neighbors in the sixteen node example of Blondel et al. (2008),
/// every link pointing from the lower id.
const BLONDEL: [&[u32]; 16] = [
    &[2, 3, 4, 5],
    &[2, 4, 7],
    &[4, 5, 6],
    &[7],
    &[10],
    &[7, 11],
    &[7, 11],
    &[],
    &[9, 10, 11, 14, 15],
    &[12, 14],
    &[11, 12, 13, 14],
    &[13],
    &[],
    &[],
    &[],
    &[],
];

pub fn blondel_directed() -> DiGraph<(), f64> {
    let mut g = DiGraph::with_capacity(16, 28);
    let nodes: Vec<_> = (0..16).map(|_| g.add_node(())).collect();
    for (u, heads) in BLONDEL.iter().enumerate() {
        for &v in heads.iter() {
            g.add_edge(nodes[u], nodes[v as usize], 1.0);
        }
    }
    g
}

/// Zachary's karate club, each friendship listed once from the lower id.
const ZACHARY: [&[u32]; 33] = [
    &[1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13, 17, 19, 21, 31],
    &[2, 3, 7, 13, 17, 19, 21, 30],
    &[3, 7, 8, 9, 13, 27, 28, 32],
    &[7, 12, 13],
    &[6, 10],
    &[6, 10, 16],
    &[16],
    &[],
    &[30, 32, 33],
    &[33],
    &[],
    &[],
    &[],
    &[33],
    &[32, 33],
    &[32, 33],
    &[],
    &[],
    &[32, 33],
    &[33],
    &[32, 33],
    &[],
    &[32, 33],
    &[25, 27, 29, 32, 33],
    &[25, 27, 31],
    &[31],
    &[29, 33],
    &[33],
    &[31, 33],
    &[32, 33],
    &[32, 33],
    &[32, 33],
    &[33],
];

pub fn zachary() -> UnGraph<(), f64> {
    let mut g = UnGraph::with_capacity(34, 78);
    let nodes: Vec<_> = (0..34).map(|_| g.add_node(())).collect();
    for (u, others) in ZACHARY.iter().enumerate() {
        for &v in others.iter() {
            g.add_edge(nodes[u], nodes[v as usize], 1.0);
        }
    }
    g
}
