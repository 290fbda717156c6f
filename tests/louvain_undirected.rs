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

mod common;

use common::*;
use louvain_hierarchy::community::{build_rng, modularity, run_louvain, run_louvain_par};
use louvain_hierarchy::{Error, LouvainConfig, ProfileConfig, Score};
use petgraph::graph::UnGraph;

#[test]
fn zachary_known_partition() {
    let g = zachary();
    assert_score(
        modularity(&g, Some(&zachary_four_groups()), 1.0).unwrap(),
        0.41978961209730437,
    );
    assert_score(modularity(&g, None, 1.0).unwrap(), -0.04980276134122286);
}

#[test]
fn zachary_restarts_reach_high_modularity() {
    init_logging();
    let g = zachary();
    let mut rng = build_rng(Some(2024));
    let h = run_louvain(&g, 1.0, &mut rng, 20).unwrap();
    let q = h.score(h.root()).value().unwrap();
    assert!(q > 0.415, "root score {q}");
    assert!(q < 0.41979, "root score {q}");

    let mut seen: Vec<usize> = h.communities(h.root()).into_iter().flatten().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..34).collect::<Vec<_>>());

    // Every level scores what its grouping of the original graph scores.
    for level in h.levels() {
        let direct = modularity(&g, Some(&h.communities(level)), 1.0).unwrap();
        let q_level = h.score(level).value().unwrap();
        assert!((direct.value().unwrap() - q_level).abs() < TOLERANCE);
    }
}

#[test]
fn higher_resolution_gives_more_communities() {
    let g = zachary();
    let coarse = run_louvain_par(&g, 0.5, 1, 10).unwrap();
    let fine = run_louvain_par(&g, 2.0, 1, 10).unwrap();
    assert!(
        coarse.communities(coarse.root()).len() < fine.communities(fine.root()).len()
    );
    assert_eq!(coarse.resolution(), 0.5);
}

#[test]
fn score_at_rescores_a_level() {
    let g = zachary();
    let h = LouvainConfig::default()
        .with_iterations(5)
        .with_seed(8)
        .run(&g)
        .unwrap();
    let root = h.root();
    let at_one = h.score_at(root, 1.0).unwrap();
    assert_eq!(at_one, h.score(root));
    let direct = modularity(&g, Some(&h.communities(root)), 1.5).unwrap();
    let rescored = h.score_at(root, 1.5).unwrap();
    assert!((direct.value().unwrap() - rescored.value().unwrap()).abs() < TOLERANCE);
}

#[test]
fn weighted_edges_pull_nodes_together() {
    // A 4-cycle where one pair of opposite edges is much heavier.
    let g = UnGraph::<(), f64>::from_edges([
        (0, 1, 10.0),
        (1, 2, 1.0),
        (2, 3, 10.0),
        (3, 0, 1.0),
    ]);
    let h = run_louvain(&g, 1.0, &mut build_rng(Some(6)), 5).unwrap();
    assert_eq!(
        canonical(h.communities(h.root())),
        vec![vec![0, 1], vec![2, 3]]
    );
}

#[test]
fn self_loops_survive_reduction() {
    let mut g = UnGraph::<(), f64>::from_edges([(0, 1, 1.0), (2, 3, 1.0), (1, 2, 0.1)]);
    let a = g.node_indices().next().unwrap();
    g.add_edge(a, a, 2.0);
    let h = run_louvain(&g, 1.0, &mut build_rng(Some(1)), 5).unwrap();
    for level in h.levels() {
        assert!((h.level(level).total_weight() - 4.1).abs() < 1e-9);
    }
}

#[test]
fn edgeless_graph_is_undefined() {
    let mut g = UnGraph::<(), f64>::new_undirected();
    g.add_node(());
    g.add_node(());
    let h = LouvainConfig::default().with_iterations(3).run(&g).unwrap();
    assert_eq!(h.len(), 1);
    assert_eq!(h.score(h.root()), Score::Undefined);
    assert_eq!(h.communities(h.root()), vec![vec![0], vec![1]]);
}

#[test]
fn invalid_inputs_are_errors() {
    let g = zachary();
    assert_eq!(
        run_louvain(&g, 0.0, &mut build_rng(Some(1)), 1).unwrap_err(),
        Error::InvalidResolution(0.0)
    );
    assert_eq!(
        LouvainConfig::default().with_iterations(0).run(&g).unwrap_err(),
        Error::InvalidIterations
    );

    let negative = UnGraph::<(), f64>::from_edges([(0, 1, -1.0)]);
    assert!(matches!(
        run_louvain(&negative, 1.0, &mut build_rng(Some(1)), 1),
        Err(Error::InvalidWeight { weight, .. }) if weight == -1.0
    ));

    let empty = UnGraph::<(), f64>::new_undirected();
    assert_eq!(
        LouvainConfig::default().run(&empty).unwrap_err(),
        Error::EmptyGraph
    );
}

#[test]
fn profile_covers_the_range() {
    init_logging();
    let g = zachary();
    let profile = ProfileConfig::default()
        .with_range(0.2, 5.0)
        .with_grain(0.1)
        .with_effort(3)
        .with_seed(4)
        .run(&g)
        .unwrap();
    assert_eq!(profile[0].low, 0.2);
    assert_eq!(profile[profile.len() - 1].high, 5.0);
    for pair in profile.windows(2) {
        assert_eq!(pair[0].high, pair[1].low);
    }
    assert!(profile[0].communities.len() <= profile[profile.len() - 1].communities.len());
}
